//! Section Replacer and Section Merger.
//!
//! Replacement rewrites the span strictly between the first begin marker of a
//! section and the nearest end marker after it:
//!
//! ```text
//! % MARKER_BEGIN_SUMMARY          % MARKER_BEGIN_SUMMARY
//! Old text                 ==>    New text
//! % MARKER_END_SUMMARY            % MARKER_END_SUMMARY
//! ```
//!
//! The markers and every byte outside the span are left untouched.

use serde::Serialize;

use crate::markers::{MarkerError, Section};

/// Why a section could not be located. A soft condition: the merge carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionNotFound {
    pub section: Section,
    /// The marker line that could not be found (the end marker when the begin
    /// marker exists but nothing closes it).
    pub missing_marker: String,
}

impl SectionNotFound {
    pub fn message(&self) -> String {
        format!(
            "Section markers for {} not found in template ({} missing); section left unchanged",
            self.section.name(),
            self.missing_marker
        )
    }
}

/// Result of a single replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    Replaced(String),
    /// Marker pair not found; carries the original template unchanged.
    Skipped {
        template: String,
        missing: SectionNotFound,
    },
}

impl Replacement {
    pub fn into_template(self) -> String {
        match self {
            Replacement::Replaced(t) => t,
            Replacement::Skipped { template, .. } => template,
        }
    }

    pub fn warning(&self) -> Option<&SectionNotFound> {
        match self {
            Replacement::Replaced(_) => None,
            Replacement::Skipped { missing, .. } => Some(missing),
        }
    }
}

/// Result of merging a whole content map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub document: String,
    pub warnings: Vec<SectionNotFound>,
}

/// Byte range strictly between a section's begin and end markers.
pub(crate) fn locate_span(
    template: &str,
    section: Section,
) -> Result<(usize, usize), SectionNotFound> {
    let begin = section.begin_marker();
    let end = section.end_marker();

    let begin_at = template.find(&begin).ok_or_else(|| SectionNotFound {
        section,
        missing_marker: begin.clone(),
    })?;
    let inner_start = begin_at + begin.len();

    let end_offset = template[inner_start..]
        .find(&end)
        .ok_or(SectionNotFound {
            section,
            missing_marker: end,
        })?;

    Ok((inner_start, inner_start + end_offset))
}

fn replace_known(template: &str, section: Section, content: &str) -> Replacement {
    match locate_span(template, section) {
        Ok((start, end)) => {
            let mut out = String::with_capacity(template.len() + content.len() + 2);
            out.push_str(&template[..start]);
            out.push('\n');
            out.push_str(content);
            out.push('\n');
            out.push_str(&template[end..]);
            Replacement::Replaced(out)
        }
        Err(missing) => Replacement::Skipped {
            template: template.to_string(),
            missing,
        },
    }
}

/// Replaces the content of one section.
///
/// `name` is matched case-insensitively against the known sections; anything
/// else is an `InvalidSectionName` error. A missing marker pair is not an
/// error and yields `Replacement::Skipped` with the template unchanged.
///
/// Content is not inspected. Content that itself contains the section's end
/// marker closes the span early, so later extraction and re-merging only see
/// the text before it.
pub fn replace_section(
    template: &str,
    name: &str,
    content: &str,
) -> Result<Replacement, MarkerError> {
    let section: Section = name.parse()?;
    Ok(replace_known(template, section, content))
}

/// Applies `replace_section` once per entry, in iteration order.
///
/// Any unknown key aborts the merge with `InvalidSectionName`. Sections whose
/// markers are missing are reported in `warnings` and left as they were.
pub fn merge_sections<I, K, V>(template: &str, entries: I) -> Result<MergeOutcome, MarkerError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut document = template.to_string();
    let mut warnings = Vec::new();

    for (key, content) in entries {
        let replacement = replace_section(&document, key.as_ref(), content.as_ref())?;
        if let Some(missing) = replacement.warning() {
            warnings.push(missing.clone());
        }
        document = replacement.into_template();
    }

    Ok(MergeOutcome { document, warnings })
}
