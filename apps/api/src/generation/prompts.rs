// Prompt configuration for section generation.
//
// Prompts are configuration, not logic: the built-in default below can be
// replaced at startup (SYSTEM_PROMPT_FILE) and per request (`system_prompt`).

/// Built-in system prompt used when neither the deployment nor the request
/// supplies one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert resume writer and career coach.
Your task is to rewrite the \"Summary\", \"Skills\", and \"Projects\" sections of a resume to perfectly match the provided Job Description.

GUIDELINES:
1. SUMMARY: Write a compelling 3-4 line professional summary. Highlight years of experience and key achievements relevant to the JD.
2. SKILLS: List technical skills in categories (e.g., Languages, Tools, Frameworks). Prioritize skills mentioned in the JD.
3. PROJECTS: select 2-3 relevant projects. For each, write 3 bullet points focusing on impact, metrics, and technologies used.

TONE:
Professional, action-oriented, and quantifiable. Use strong action verbs.";

/// User message template. Replace `{job_description}` before sending.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"JOB DESCRIPTION:
{job_description}

Please generate the following LaTeX sections based on the above Job Description and the System Instructions.
Return the output as a JSON object with EXACTLY these keys:
{
  "summary": "LaTeX for the summary section",
  "skills": "LaTeX for the skills section",
  "projects": "LaTeX for the projects section"
}
The values are the raw LaTeX code for each section, including its \section heading.
Do not include markdown formatting like ```json. Just return raw JSON."#;

/// Effective system prompt resolution: request override, then the configured
/// default.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    default_system_prompt: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            default_system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl PromptConfig {
    /// Uses `custom` as the default when it is non-blank.
    pub fn with_default(custom: Option<String>) -> Self {
        match custom {
            Some(p) if !p.trim().is_empty() => Self {
                default_system_prompt: p.trim().to_string(),
            },
            _ => Self::default(),
        }
    }

    pub fn default_system_prompt(&self) -> &str {
        &self.default_system_prompt
    }

    /// A blank request override falls back to the default.
    pub fn resolve<'a>(&'a self, request_override: Option<&'a str>) -> &'a str {
        request_override
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.default_system_prompt)
    }
}

pub fn build_generation_prompt(job_description: &str) -> String {
    GENERATION_PROMPT_TEMPLATE.replace("{job_description}", job_description.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_default() {
        let p = PromptConfig::default();
        assert_eq!(p.default_system_prompt(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(p.resolve(None), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_configured_default_replaces_builtin() {
        let p = PromptConfig::with_default(Some("Be brief.\n".into()));
        assert_eq!(p.resolve(None), "Be brief.");
    }

    #[test]
    fn test_blank_configured_default_is_ignored() {
        let p = PromptConfig::with_default(Some("   ".into()));
        assert_eq!(p.default_system_prompt(), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_request_override_wins() {
        let p = PromptConfig::with_default(Some("Be brief.".into()));
        assert_eq!(p.resolve(Some("Be bold.")), "Be bold.");
        assert_eq!(p.resolve(Some("  ")), "Be brief.");
    }

    #[test]
    fn test_generation_prompt_embeds_jd() {
        let prompt = build_generation_prompt("  Senior Rust Engineer  ");
        assert!(prompt.starts_with("JOB DESCRIPTION:\nSenior Rust Engineer\n"));
        assert!(prompt.contains("\"skills\""));
        assert!(!prompt.contains("{job_description}"));
    }
}
