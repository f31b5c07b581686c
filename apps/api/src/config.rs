use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_COMPILE_URL: &str = "https://latexonline.cc/compile";
/// Upper bound for `LLM_MAX_ATTEMPTS`.
pub const MAX_LLM_ATTEMPTS: u32 = 5;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server-side LLM key. Requests may supply their own instead.
    pub anthropic_api_key: Option<String>,
    pub latex_compile_url: String,
    pub compile_timeout_secs: u64,
    /// Attempts per LLM call; 1 means no retry.
    pub llm_max_attempts: u32,
    /// Replaces the built-in default system prompt when set.
    pub system_prompt_file: Option<PathBuf>,
    pub max_template_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm_max_attempts = parse_or(&lookup, "LLM_MAX_ATTEMPTS", 1u32)?;
        if !(1..=MAX_LLM_ATTEMPTS).contains(&llm_max_attempts) {
            anyhow::bail!(
                "LLM_MAX_ATTEMPTS must be between 1 and {MAX_LLM_ATTEMPTS}, got {llm_max_attempts}"
            );
        }

        Ok(Config {
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            latex_compile_url: non_empty("LATEX_COMPILE_URL")
                .unwrap_or_else(|| DEFAULT_COMPILE_URL.to_string()),
            compile_timeout_secs: parse_or(&lookup, "COMPILE_TIMEOUT_SECS", 30u64)?,
            llm_max_attempts,
            system_prompt_file: non_empty("SYSTEM_PROMPT_FILE").map(PathBuf::from),
            max_template_bytes: parse_or(&lookup, "MAX_TEMPLATE_BYTES", 1024 * 1024usize)?,
            port: parse_or(&lookup, "PORT", 8080u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Reads the configured system prompt override, if any.
    pub fn load_system_prompt(&self) -> Result<Option<String>> {
        let Some(path) = &self.system_prompt_file else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SYSTEM_PROMPT_FILE '{}'", path.display()))?;
        Ok(Some(text))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config_from(&[]).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.latex_compile_url, DEFAULT_COMPILE_URL);
        assert_eq!(c.compile_timeout_secs, 30);
        assert_eq!(c.llm_max_attempts, 1);
        assert_eq!(c.max_template_bytes, 1024 * 1024);
        assert_eq!(c.rust_log, "info");
        assert!(c.anthropic_api_key.is_none());
        assert!(c.system_prompt_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let c = config_from(&[
            ("PORT", "3000"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("LATEX_COMPILE_URL", "http://localhost:2700/compile"),
            ("LLM_MAX_ATTEMPTS", "3"),
        ])
        .unwrap();
        assert_eq!(c.port, 3000);
        assert_eq!(c.anthropic_api_key.as_deref(), Some("sk-test"));
        assert_eq!(c.latex_compile_url, "http://localhost:2700/compile");
        assert_eq!(c.llm_max_attempts, 3);
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let c = config_from(&[("ANTHROPIC_API_KEY", "  ")]).unwrap();
        assert!(c.anthropic_api_key.is_none());
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_attempts_fails() {
        assert!(config_from(&[("LLM_MAX_ATTEMPTS", "0")]).is_err());
    }

    #[test]
    fn test_attempts_above_ceiling_fail() {
        let ceiling = MAX_LLM_ATTEMPTS.to_string();
        let c = config_from(&[("LLM_MAX_ATTEMPTS", ceiling.as_str())]).unwrap();
        assert_eq!(c.llm_max_attempts, MAX_LLM_ATTEMPTS);

        let err = config_from(&[("LLM_MAX_ATTEMPTS", "100")]).unwrap_err();
        assert!(err.to_string().contains("LLM_MAX_ATTEMPTS must be between 1 and"));
    }

    #[test]
    fn test_load_system_prompt_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "You write terse resumes.").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let c = config_from(&[("SYSTEM_PROMPT_FILE", path.as_str())]).unwrap();
        assert_eq!(
            c.load_system_prompt().unwrap().as_deref(),
            Some("You write terse resumes.")
        );
    }

    #[test]
    fn test_missing_system_prompt_file_fails() {
        let c = config_from(&[("SYSTEM_PROMPT_FILE", "/nonexistent/prompt.txt")]).unwrap();
        assert!(c.load_system_prompt().is_err());
    }
}
