//! Section generation: turns a job description into a Content Map.
//!
//! Flow: resolve system prompt → LLM call → parse output.
//!
//! Output parsing is tolerant, in order:
//! 1. a JSON object keyed by section name (fences stripped),
//! 2. LaTeX text split on `\section{...}` / `\section*{...}` headings,
//! 3. the raw text dumped into `summary` with a warning for manual editing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::generation::prompts::build_generation_prompt;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, LATEX_FRAGMENT_INSTRUCTION};
use crate::llm_client::{strip_code_fences, LlmClient, LlmError};
use crate::markers::{Section, REQUIRED_SECTIONS};

pub const UNPARSED_WARNING: &str = "Could not strictly parse sections. Check the output manually.";

/// Inputs for one generation call. `system_prompt` is already resolved.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub job_description: String,
    pub system_prompt: String,
    /// Caller-supplied LLM key; the server key is used when absent.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedSections {
    pub sections: BTreeMap<Section, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Content-generation backend. Carried in `AppState` as `Arc<dyn SectionGenerator>`.
#[async_trait]
pub trait SectionGenerator: Send + Sync {
    async fn generate(&self, input: &GenerationInput) -> Result<GeneratedSections, AppError>;
}

/// Default backend: one LLM call through `LlmClient`.
pub struct LlmSectionGenerator {
    llm: LlmClient,
}

impl LlmSectionGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SectionGenerator for LlmSectionGenerator {
    async fn generate(&self, input: &GenerationInput) -> Result<GeneratedSections, AppError> {
        let client = match input.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => self.llm.with_api_key(key),
            _ => self.llm.clone(),
        };
        if !client.has_api_key() {
            return Err(LlmError::MissingApiKey.into());
        }

        let system = format!(
            "{}\n\n{}\n\n{}",
            input.system_prompt, LATEX_FRAGMENT_INSTRUCTION, JSON_ONLY_SYSTEM
        );
        let prompt = build_generation_prompt(&input.job_description);

        let text = client.call_text(&prompt, &system).await?;
        let generated = parse_generated_sections(&text);

        info!(
            "Generated {} sections{}",
            generated.sections.len(),
            if generated.warning.is_some() { " (unparsed fallback)" } else { "" }
        );
        Ok(generated)
    }
}

/// Parses raw LLM output into sections. Never fails.
pub fn parse_generated_sections(raw: &str) -> GeneratedSections {
    let text = strip_code_fences(raw);

    if let Some(sections) = parse_json_sections(text) {
        return GeneratedSections {
            sections,
            warning: None,
        };
    }

    if let Some(sections) = split_latex_sections(text) {
        debug!("LLM output was not JSON; split on \\section headings");
        return GeneratedSections {
            sections,
            warning: None,
        };
    }

    warn!("LLM output could not be split into sections");
    let mut sections = BTreeMap::new();
    sections.insert(Section::Summary, text.to_string());
    sections.insert(Section::Skills, String::new());
    sections.insert(Section::Projects, String::new());
    GeneratedSections {
        sections,
        warning: Some(UNPARSED_WARNING.to_string()),
    }
}

/// Accepts a JSON object with at least one known section holding a string.
/// Unknown keys and non-string values are ignored.
fn parse_json_sections(text: &str) -> Option<BTreeMap<Section, String>> {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) else {
        return None;
    };

    let mut sections = BTreeMap::new();
    for (key, value) in object {
        match (key.parse::<Section>(), value) {
            (Ok(section), Value::String(content)) => {
                sections.insert(section, content.trim().to_string());
            }
            (Err(_), _) => debug!("Ignoring unknown key '{key}' in LLM output"),
            (Ok(section), other) => debug!("Ignoring non-string value for {section}: {other}"),
        }
    }

    (!sections.is_empty()).then_some(sections)
}

/// A `\section{Title}` or `\section*{Title}` heading found in text.
#[derive(Debug, PartialEq)]
struct Heading<'a> {
    start: usize,
    end: usize,
    title: &'a str,
}

fn find_headings(text: &str) -> Vec<Heading<'_>> {
    const COMMAND: &str = "\\section";

    let mut headings = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(COMMAND) {
        let start = cursor + offset;
        let mut pos = start + COMMAND.len();
        cursor = pos;

        let rest = &text[pos..];
        let rest = rest.strip_prefix('*').unwrap_or(rest);
        pos = text.len() - rest.len();

        let Some(after_brace) = rest.strip_prefix('{') else {
            continue;
        };
        let Some(close) = after_brace.find('}') else {
            continue;
        };
        let title = &after_brace[..close];
        let end = pos + 1 + close + 1;
        headings.push(Heading { start, end, title });
        cursor = end;
    }
    headings
}

/// Splits LaTeX on section headings. Each known section keeps its heading.
/// Returns `None` unless every required section is found.
pub fn split_latex_sections(text: &str) -> Option<BTreeMap<Section, String>> {
    let headings = find_headings(text);
    let mut sections = BTreeMap::new();

    for (i, heading) in headings.iter().enumerate() {
        let Ok(section) = heading.title.trim().parse::<Section>() else {
            continue;
        };
        let body_end = headings.get(i + 1).map_or(text.len(), |next| next.start);
        let heading_text = &text[heading.start..heading.end];
        let body = text[heading.end..body_end].trim();
        let content = if body.is_empty() {
            heading_text.to_string()
        } else {
            format!("{heading_text}\n{body}")
        };
        sections.entry(section).or_insert(content);
    }

    REQUIRED_SECTIONS
        .iter()
        .all(|s| sections.contains_key(s))
        .then_some(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{"summary": "S", "skills": "  K  ", "projects": "P"}"#;
        let g = parse_generated_sections(raw);
        assert!(g.warning.is_none());
        assert_eq!(g.sections[&Section::Summary], "S");
        assert_eq!(g.sections[&Section::Skills], "K");
        assert_eq!(g.sections[&Section::Projects], "P");
    }

    #[test]
    fn test_parse_fenced_json_with_unknown_keys() {
        let raw = "```json\n{\"skills\": \"\\\\textbf{Rust}\", \"notes\": \"x\", \"projects\": 3}\n```";
        let g = parse_generated_sections(raw);
        assert!(g.warning.is_none());
        assert_eq!(g.sections.len(), 1);
        assert_eq!(g.sections[&Section::Skills], "\\textbf{Rust}");
    }

    #[test]
    fn test_parse_latex_sections() {
        let raw = "```latex\n\\section*{Summary}\nBuilder of systems.\n\n\
                   \\section{Skills}\nRust, Go\n\n\
                   \\section{Projects}\n\\item Tailor\n```";
        let g = parse_generated_sections(raw);
        assert!(g.warning.is_none());
        assert_eq!(
            g.sections[&Section::Summary],
            "\\section*{Summary}\nBuilder of systems."
        );
        assert_eq!(g.sections[&Section::Skills], "\\section{Skills}\nRust, Go");
        assert_eq!(g.sections[&Section::Projects], "\\section{Projects}\n\\item Tailor");
    }

    #[test]
    fn test_latex_split_requires_all_sections() {
        assert!(split_latex_sections("\\section{Skills}\nRust").is_none());
    }

    #[test]
    fn test_latex_split_ignores_unknown_headings() {
        let text = "\\section{Summary}A\n\\section{Education}B\n\
                    \\section{Skills}C\n\\section{Projects}D";
        let sections = split_latex_sections(text).unwrap();
        assert_eq!(sections[&Section::Summary], "\\section{Summary}\nA");
        assert_eq!(sections[&Section::Skills], "\\section{Skills}\nC");
        assert!(!sections.values().any(|v| v.contains("Education")));
    }

    #[test]
    fn test_unparseable_output_falls_back_to_summary() {
        let g = parse_generated_sections("Here is your resume, enjoy!");
        assert_eq!(g.warning.as_deref(), Some(UNPARSED_WARNING));
        assert_eq!(g.sections[&Section::Summary], "Here is your resume, enjoy!");
        assert_eq!(g.sections[&Section::Skills], "");
        assert_eq!(g.sections[&Section::Projects], "");
    }

    #[test]
    fn test_json_without_known_keys_falls_back() {
        let g = parse_generated_sections(r#"{"footer": "x"}"#);
        assert!(g.warning.is_some());
    }

    #[test]
    fn test_find_headings_skips_malformed() {
        let text = "\\sectionmark \\section{Skills} \\section*{Projects}";
        let headings = find_headings(text);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].title, "Skills");
        assert_eq!(&text[headings[1].start..headings[1].end], "\\section*{Projects}");
    }

    #[test]
    fn test_generated_sections_serialize_lowercase_keys() {
        let g = parse_generated_sections(r#"{"summary": "S"}"#);
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json, serde_json::json!({"sections": {"summary": "S"}}));
    }

    #[tokio::test]
    async fn test_generate_without_any_key_is_unauthorized() {
        let generator = LlmSectionGenerator::new(LlmClient::new(None, 1).unwrap());
        let input = GenerationInput {
            job_description: "Rust engineer".into(),
            system_prompt: "Be brief.".into(),
            api_key: Some("   ".into()),
        };
        let err = generator.generate(&input).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
