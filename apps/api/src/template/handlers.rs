//! Axum route handlers for template intake and marker processing.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::markers::{
    extract_sections, marker_guide, merge_sections, validate_required_markers, MarkerValidation,
    MergeOutcome, Section,
};
use crate::state::AppState;

const MARKER_INSTRUCTIONS: &str =
    "Add markers to your template. See GET /api/v1/templates/marker-guide.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template: String,
}

/// Content Map as sent by clients. `null` values are skipped.
pub type SectionsPayload = BTreeMap<String, Option<String>>;

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub template: String,
    pub sections: SectionsPayload,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub validation: MarkerValidation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl From<MarkerValidation> for ValidationReport {
    fn from(validation: MarkerValidation) -> Self {
        let error = validation.error_message();
        let instructions = error.as_ref().map(|_| MARKER_INSTRUCTIONS.to_string());
        Self {
            validation,
            error,
            instructions,
        }
    }
}

impl ValidationReport {
    fn status(&self) -> StatusCode {
        if self.validation.valid {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub template: String,
    pub validation: ValidationReport,
}

#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub latex: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub sections: BTreeMap<Section, Option<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn ensure_template_size(template: &str, max_bytes: usize) -> Result<(), AppError> {
    if template.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "template exceeds the {max_bytes}-byte limit"
        )));
    }
    Ok(())
}

/// Merges the non-null entries of `sections` into `template`, logging every
/// section that had to be skipped.
pub(crate) fn merge_payload(
    template: &str,
    sections: &SectionsPayload,
) -> Result<MergeOutcome, AppError> {
    let entries = sections
        .iter()
        .filter_map(|(key, content)| content.as_deref().map(|c| (key.as_str(), c)));

    let outcome = merge_sections(template, entries)?;
    for missing in &outcome.warnings {
        warn!("{}", missing.message());
    }
    Ok(outcome)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/templates/validate
///
/// 200 when every required marker is present, 422 with the missing list otherwise.
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(request): Json<TemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_template_size(&request.template, state.config.max_template_bytes)?;

    let report = ValidationReport::from(validate_required_markers(&request.template));
    Ok((report.status(), Json(report)))
}

/// POST /api/v1/templates/upload
///
/// Multipart intake of a `.tex` file in the `template` field. Returns the
/// template text with its validation report.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("template") {
            continue;
        }

        if let Some(file_name) = field.file_name() {
            if !file_name.to_ascii_lowercase().ends_with(".tex") {
                return Err(AppError::UnprocessableEntity(format!(
                    "'{file_name}' is not a .tex file"
                )));
            }
        }

        let template = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("could not read template: {e}")))?;
        ensure_template_size(&template, state.config.max_template_bytes)?;

        let validation = ValidationReport::from(validate_required_markers(&template));
        info!(
            "Template uploaded: {} bytes, valid={}",
            template.len(),
            validation.validation.valid
        );
        return Ok((
            validation.status(),
            Json(UploadResponse {
                template,
                validation,
            }),
        ));
    }

    Err(AppError::Validation(
        "multipart field 'template' is required".to_string(),
    ))
}

/// POST /api/v1/templates/merge
///
/// Substitutes the supplied sections into the template. Missing marker pairs
/// are reported as warnings; unknown section names are rejected.
pub async fn handle_merge(
    State(state): State<AppState>,
    Json(request): Json<MergeRequest>,
) -> Result<Json<MergeResponse>, AppError> {
    ensure_template_size(&request.template, state.config.max_template_bytes)?;

    let outcome = merge_payload(&request.template, &request.sections)?;
    Ok(Json(MergeResponse {
        latex: outcome.document,
        warnings: outcome.warnings.iter().map(|w| w.message()).collect(),
    }))
}

/// POST /api/v1/templates/extract
///
/// Reads back the current content of every known section.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<TemplateRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    ensure_template_size(&request.template, state.config.max_template_bytes)?;

    Ok(Json(ExtractResponse {
        sections: extract_sections(&request.template),
    }))
}

/// GET /api/v1/templates/marker-guide
pub async fn handle_marker_guide() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"marker-guide.txt\"",
            ),
        ],
        marker_guide(),
    )
}
