use serde::{Deserialize, Serialize};

use crate::markers::{marker_line, required_tokens};

/// Outcome of a marker presence check. Returned as data, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerValidation {
    pub valid: bool,
    /// Bare tokens (e.g. `MARKER_END_SKILLS`) absent from the template, in the
    /// order they were required.
    pub missing_markers: Vec<String>,
}

impl MarkerValidation {
    /// Human-readable summary for the intake UI. `None` when valid.
    pub fn error_message(&self) -> Option<String> {
        if self.valid {
            None
        } else {
            Some(format!("Missing markers: {}", self.missing_markers.join(", ")))
        }
    }
}

/// Checks that every required token occurs in `template` as `% TOKEN`.
///
/// Substring based: duplicates, ordering and line boundaries are not checked.
/// An empty template is invalid with every token missing.
pub fn validate_markers<S: AsRef<str>>(template: &str, required: &[S]) -> MarkerValidation {
    let missing_markers: Vec<String> = required
        .iter()
        .map(|token| token.as_ref())
        .filter(|token| !template.contains(&marker_line(token)))
        .map(String::from)
        .collect();

    MarkerValidation {
        valid: missing_markers.is_empty(),
        missing_markers,
    }
}

/// `validate_markers` against the default SUMMARY / SKILLS / PROJECTS set.
pub fn validate_required_markers(template: &str) -> MarkerValidation {
    validate_markers(template, &required_tokens())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\\documentclass{article}\n\
        % MARKER_BEGIN_SUMMARY\nA\n% MARKER_END_SUMMARY\n\
        % MARKER_BEGIN_SKILLS\nB\n% MARKER_END_SKILLS\n\
        % MARKER_BEGIN_PROJECTS\nC\n% MARKER_END_PROJECTS\n";

    #[test]
    fn test_complete_template_is_valid() {
        let r = validate_required_markers(FULL);
        assert!(r.valid);
        assert!(r.missing_markers.is_empty());
        assert_eq!(r.error_message(), None);
    }

    #[test]
    fn test_missing_end_skills_is_reported() {
        let t = FULL.replace("% MARKER_END_SKILLS\n", "");
        let r = validate_required_markers(&t);
        assert!(!r.valid);
        assert_eq!(r.missing_markers, vec!["MARKER_END_SKILLS"]);
        assert_eq!(
            r.error_message().as_deref(),
            Some("Missing markers: MARKER_END_SKILLS")
        );
    }

    #[test]
    fn test_empty_template_misses_everything() {
        let r = validate_required_markers("");
        assert!(!r.valid);
        assert_eq!(r.missing_markers.len(), 6);
        assert_eq!(r.missing_markers[0], "MARKER_BEGIN_SUMMARY");
        assert_eq!(r.missing_markers[5], "MARKER_END_PROJECTS");
    }

    #[test]
    fn test_marker_without_comment_prefix_does_not_count() {
        let t = FULL.replace("% MARKER_BEGIN_PROJECTS", "MARKER_BEGIN_PROJECTS");
        let r = validate_required_markers(&t);
        assert_eq!(r.missing_markers, vec!["MARKER_BEGIN_PROJECTS"]);
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        let t = FULL.replace("% MARKER_BEGIN_SUMMARY", "% marker_begin_summary");
        assert!(!validate_required_markers(&t).valid);
    }

    #[test]
    fn test_duplicate_markers_are_not_an_error() {
        let t = format!("{FULL}% MARKER_BEGIN_SUMMARY\n% MARKER_END_SUMMARY\n");
        assert!(validate_required_markers(&t).valid);
    }

    #[test]
    fn test_substring_inside_larger_token_is_accepted() {
        // Presence is substring based, so a longer token still satisfies it.
        let t = FULL.replace("% MARKER_END_PROJECTS", "% MARKER_END_PROJECTS_OLD");
        assert!(validate_required_markers(&t).valid);
    }

    #[test]
    fn test_custom_required_set() {
        let r = validate_markers(FULL, &["MARKER_BEGIN_EXPERIENCE", "MARKER_BEGIN_SKILLS"]);
        assert!(!r.valid);
        assert_eq!(r.missing_markers, vec!["MARKER_BEGIN_EXPERIENCE"]);
    }

    #[test]
    fn test_validity_matches_substring_presence() {
        let tokens = required_tokens();
        for skip in 0..tokens.len() {
            let template: String = tokens
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, t)| format!("% {t}\n"))
                .collect();
            let r = validate_markers(&template, &tokens);
            assert!(!r.valid);
            assert_eq!(r.missing_markers, vec![tokens[skip].to_string()]);
        }
    }
}
