mod config;
mod errors;
mod generation;
mod llm_client;
mod markers;
mod render;
mod routes;
mod state;
mod template;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::prompts::PromptConfig;
use crate::generation::sections::LlmSectionGenerator;
use crate::llm_client::LlmClient;
use crate::render::LatexOnlineCompiler;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (the server key is optional; requests may bring their own)
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_max_attempts)?;
    info!(
        "LLM client initialized (model: {}, server key: {})",
        llm_client::MODEL,
        if llm.has_api_key() { "set" } else { "not set" }
    );

    // Initialize system prompt configuration
    let prompts = PromptConfig::with_default(config.load_system_prompt()?);
    if config.system_prompt_file.is_some() {
        info!("Default system prompt loaded from SYSTEM_PROMPT_FILE");
    }

    // Initialize LaTeX compiler
    let compiler = LatexOnlineCompiler::new(
        config.latex_compile_url.clone(),
        Duration::from_secs(config.compile_timeout_secs),
    )?;
    info!("LaTeX compiler endpoint: {}", config.latex_compile_url);

    // Build app state
    let state = AppState {
        config: config.clone(),
        prompts: Arc::new(prompts),
        generator: Arc::new(LlmSectionGenerator::new(llm)),
        compiler: Arc::new(compiler),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
