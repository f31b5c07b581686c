use std::sync::Arc;

use crate::config::Config;
use crate::generation::prompts::PromptConfig;
use crate::generation::sections::SectionGenerator;
use crate::render::PdfCompiler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Default system prompt and its override rules.
    pub prompts: Arc<PromptConfig>,
    /// Pluggable content generator. Default: LlmSectionGenerator.
    pub generator: Arc<dyn SectionGenerator>,
    /// Pluggable LaTeX compiler. Default: LatexOnlineCompiler.
    pub compiler: Arc<dyn PdfCompiler>,
}
