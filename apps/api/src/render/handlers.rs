//! Axum route handlers for PDF compilation.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::check_brace_balance;
use crate::state::AppState;
use crate::template::handlers::{ensure_template_size, merge_payload, SectionsPayload};

#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    #[serde(default)]
    pub latex: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub template: String,
    pub sections: SectionsPayload,
}

#[derive(Debug, Serialize)]
pub struct CompileResponse {
    pub success: bool,
    pub job_id: Uuid,
    /// Base64-encoded PDF.
    pub pdf: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub success: bool,
    pub job_id: Uuid,
    pub pdf: String,
    /// The merged document, so clients can offer the `.tex` as a download.
    pub latex: String,
    pub warnings: Vec<String>,
}

/// Prechecks and compiles `latex`, returning the base64 PDF.
async fn compile_document(
    state: &AppState,
    job_id: Uuid,
    latex: &str,
    warnings: &mut Vec<String>,
) -> Result<String, AppError> {
    if latex.trim().is_empty() {
        return Err(AppError::Validation("Missing LaTeX content".to_string()));
    }
    if let Some(w) = check_brace_balance(latex) {
        tracing::warn!(%job_id, "{w}");
        warnings.push(w);
    }

    info!(%job_id, "Compiling {} bytes of LaTeX", latex.len());
    let pdf = state.compiler.compile(latex).await?;
    info!(%job_id, "Compiled PDF ({} bytes)", pdf.len());

    Ok(STANDARD.encode(&pdf))
}

/// POST /api/v1/render/compile
///
/// Compiles an already merged document.
pub async fn handle_compile(
    State(state): State<AppState>,
    Json(request): Json<CompileRequest>,
) -> Result<Json<CompileResponse>, AppError> {
    ensure_template_size(&request.latex, state.config.max_template_bytes)?;

    let job_id = Uuid::new_v4();
    let mut warnings = Vec::new();
    let pdf = compile_document(&state, job_id, &request.latex, &mut warnings).await?;

    Ok(Json(CompileResponse {
        success: true,
        job_id,
        pdf,
        warnings,
    }))
}

/// POST /api/v1/render
///
/// Merges the sections into the template, then compiles the result.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    ensure_template_size(&request.template, state.config.max_template_bytes)?;

    let job_id = Uuid::new_v4();
    let outcome = merge_payload(&request.template, &request.sections)?;
    let mut warnings: Vec<String> = outcome.warnings.iter().map(|w| w.message()).collect();

    let pdf = compile_document(&state, job_id, &outcome.document, &mut warnings).await?;

    Ok(Json(RenderResponse {
        success: true,
        job_id,
        pdf,
        latex: outcome.document,
        warnings,
    }))
}
