//! Marker Processor. Locates, validates and rewrites the editable zones of a
//! LaTeX template.
//!
//! A zone is delimited by two literal comment lines:
//!
//! ```text
//! % MARKER_BEGIN_SKILLS
//! ...anything...
//! % MARKER_END_SKILLS
//! ```
//!
//! Markers are plain text landmarks. Nothing here parses LaTeX: every
//! operation is a first-occurrence substring search over the template, and
//! every operation is a pure function returning a new `String`.

pub mod extractor;
pub mod replacer;
pub mod validator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use extractor::extract_sections;
pub use replacer::{merge_sections, MergeOutcome};
pub use validator::{validate_required_markers, MarkerValidation};

/// Prefix shared by every marker line. The space after `%` is significant.
pub const MARKER_PREFIX: &str = "% ";

/// Sections whose markers a template must carry to be accepted.
/// `Experience` is recognised but optional.
pub const REQUIRED_SECTIONS: [Section; 3] = [Section::Summary, Section::Skills, Section::Projects];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    /// The caller named a section outside the known set. Always surfaced.
    #[error("Unknown section name: '{0}'")]
    InvalidSectionName(String),
}

/// A named, user-editable zone of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Summary,
    Skills,
    Projects,
    Experience,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Summary,
        Section::Skills,
        Section::Projects,
        Section::Experience,
    ];

    /// Upper-case name used inside marker tokens.
    pub fn name(&self) -> &'static str {
        match self {
            Section::Summary => "SUMMARY",
            Section::Skills => "SKILLS",
            Section::Projects => "PROJECTS",
            Section::Experience => "EXPERIENCE",
        }
    }

    /// Lower-case key used in content maps.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Experience => "experience",
        }
    }

    /// Bare begin token, e.g. `MARKER_BEGIN_SKILLS`.
    pub fn begin_token(&self) -> &'static str {
        match self {
            Section::Summary => "MARKER_BEGIN_SUMMARY",
            Section::Skills => "MARKER_BEGIN_SKILLS",
            Section::Projects => "MARKER_BEGIN_PROJECTS",
            Section::Experience => "MARKER_BEGIN_EXPERIENCE",
        }
    }

    /// Bare end token, e.g. `MARKER_END_SKILLS`.
    pub fn end_token(&self) -> &'static str {
        match self {
            Section::Summary => "MARKER_END_SUMMARY",
            Section::Skills => "MARKER_END_SKILLS",
            Section::Projects => "MARKER_END_PROJECTS",
            Section::Experience => "MARKER_END_EXPERIENCE",
        }
    }

    /// Full begin marker as it appears in a template: `% MARKER_BEGIN_SKILLS`.
    pub fn begin_marker(&self) -> String {
        marker_line(self.begin_token())
    }

    /// Full end marker as it appears in a template: `% MARKER_END_SKILLS`.
    pub fn end_marker(&self) -> String {
        marker_line(self.end_token())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = MarkerError;

    /// Accepts `summary`, `SUMMARY` or any other casing of a known name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SUMMARY" => Ok(Section::Summary),
            "SKILLS" => Ok(Section::Skills),
            "PROJECTS" => Ok(Section::Projects),
            "EXPERIENCE" => Ok(Section::Experience),
            _ => Err(MarkerError::InvalidSectionName(s.to_string())),
        }
    }
}

/// Renders a bare token as the comment line a template must contain.
pub fn marker_line(token: &str) -> String {
    format!("{MARKER_PREFIX}{token}")
}

/// Bare tokens for the required sections, begin before end, in section order.
pub fn required_tokens() -> Vec<&'static str> {
    REQUIRED_SECTIONS
        .iter()
        .flat_map(|s| [s.begin_token(), s.end_token()])
        .collect()
}

/// Plain-text instructions showing users the exact marker lines to add.
pub fn marker_guide() -> String {
    let mut guide = String::from(
        "HOW TO ADD MARKERS TO YOUR RESUME TEMPLATE\n\n\
         Add these exact comment lines around the sections you want to customize:\n",
    );

    for (i, section) in Section::ALL.iter().enumerate() {
        let optional = if REQUIRED_SECTIONS.contains(section) {
            ""
        } else {
            " (optional)"
        };
        let title = capitalize(section.key());
        guide.push_str(&format!(
            "\n{}. {} SECTION{}:\n{}\n\\section{{{}}}\nYour current {} here...\n{}\n",
            i + 1,
            section.name(),
            optional,
            section.begin_marker(),
            title,
            section.key(),
            section.end_marker(),
        ));
    }

    guide.push_str(
        "\nMarkers are case-sensitive and must be written exactly as shown, \
         including the space after '%'.\n",
    );
    guide
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_parses_any_case() {
        assert_eq!("summary".parse::<Section>().unwrap(), Section::Summary);
        assert_eq!("SKILLS".parse::<Section>().unwrap(), Section::Skills);
        assert_eq!("Projects".parse::<Section>().unwrap(), Section::Projects);
        assert_eq!("experience".parse::<Section>().unwrap(), Section::Experience);
    }

    #[test]
    fn test_unknown_section_name_is_rejected() {
        let err = "FOOTER".parse::<Section>().unwrap_err();
        assert_eq!(err, MarkerError::InvalidSectionName("FOOTER".to_string()));
    }

    #[test]
    fn test_marker_lines() {
        assert_eq!(Section::Summary.begin_marker(), "% MARKER_BEGIN_SUMMARY");
        assert_eq!(Section::Skills.end_marker(), "% MARKER_END_SKILLS");
    }

    #[test]
    fn test_required_tokens_order() {
        assert_eq!(
            required_tokens(),
            vec![
                "MARKER_BEGIN_SUMMARY",
                "MARKER_END_SUMMARY",
                "MARKER_BEGIN_SKILLS",
                "MARKER_END_SKILLS",
                "MARKER_BEGIN_PROJECTS",
                "MARKER_END_PROJECTS",
            ]
        );
    }

    #[test]
    fn test_section_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Section::Skills).unwrap(), "\"skills\"");
        let s: Section = serde_json::from_str("\"projects\"").unwrap();
        assert_eq!(s, Section::Projects);
    }

    #[test]
    fn test_marker_guide_lists_every_marker() {
        let guide = marker_guide();
        for section in Section::ALL {
            assert!(guide.contains(&section.begin_marker()));
            assert!(guide.contains(&section.end_marker()));
        }
        assert!(guide.contains("EXPERIENCE SECTION (optional)"));
        assert!(guide.contains("\\section{Skills}"));
    }
}
