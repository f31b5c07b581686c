//! Axum route handlers for the Generation API.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::sections::GenerationInput;
use crate::markers::Section;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateSectionsRequest {
    pub job_description: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateSectionsResponse {
    pub success: bool,
    pub sections: BTreeMap<Section, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DefaultPromptResponse {
    pub system_prompt: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sections/generate
///
/// Generates LaTeX for the summary, skills and projects sections from a job
/// description. The request's `system_prompt` overrides the configured default.
pub async fn handle_generate_sections(
    State(state): State<AppState>,
    Json(request): Json<GenerateSectionsRequest>,
) -> Result<Json<GenerateSectionsResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let input = GenerationInput {
        system_prompt: state
            .prompts
            .resolve(request.system_prompt.as_deref())
            .to_string(),
        job_description: request.job_description,
        api_key: request.api_key,
    };

    let generated = state.generator.generate(&input).await?;

    Ok(Json(GenerateSectionsResponse {
        success: true,
        sections: generated.sections,
        warning: generated.warning,
    }))
}

/// GET /api/v1/prompts/default
///
/// Returns the effective default system prompt so the editor can reset to it.
pub async fn handle_default_prompt(State(state): State<AppState>) -> Json<DefaultPromptResponse> {
    Json(DefaultPromptResponse {
        system_prompt: state.prompts.default_system_prompt().to_string(),
    })
}
