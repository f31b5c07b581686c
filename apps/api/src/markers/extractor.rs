use std::collections::BTreeMap;

use crate::markers::replacer::locate_span;
use crate::markers::Section;

/// Reads the trimmed text between a section's markers, or `None` if the
/// marker pair is not present.
pub fn extract_section(template: &str, section: Section) -> Option<String> {
    locate_span(template, section)
        .ok()
        .map(|(start, end)| template[start..end].trim().to_string())
}

/// Reads every known section. Missing sections map to `None`.
pub fn extract_sections(template: &str) -> BTreeMap<Section, Option<String>> {
    Section::ALL
        .iter()
        .map(|&section| (section, extract_section(template, section)))
        .collect()
}
