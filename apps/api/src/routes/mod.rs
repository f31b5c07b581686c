pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::template::handlers as template;

/// JSON bodies carry a template plus its sections, so allow headroom over the
/// template limit itself.
const BODY_LIMIT_FACTOR: usize = 4;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_template_bytes
        .saturating_mul(BODY_LIMIT_FACTOR);

    Router::new()
        .route("/health", get(health::health_handler))
        // Template intake and marker processing
        .route(
            "/api/v1/templates/marker-guide",
            get(template::handle_marker_guide),
        )
        .route("/api/v1/templates/validate", post(template::handle_validate))
        .route("/api/v1/templates/upload", post(template::handle_upload))
        .route("/api/v1/templates/merge", post(template::handle_merge))
        .route("/api/v1/templates/extract", post(template::handle_extract))
        // Section generation
        .route(
            "/api/v1/prompts/default",
            get(generation::handle_default_prompt),
        )
        .route(
            "/api/v1/sections/generate",
            post(generation::handle_generate_sections),
        )
        // Rendering
        .route("/api/v1/render", post(render::handle_render))
        .route("/api/v1/render/compile", post(render::handle_compile))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
