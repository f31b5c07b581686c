use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::markers::MarkerError;
use crate::render::CompileError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    InvalidSection(#[from] MarkerError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Compilation failed: {0}")]
    Compile(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => AppError::Unauthorized(e.to_string()),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<CompileError> for AppError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::EmptyDocument => AppError::Validation(e.to_string()),
            CompileError::Compiler { log, .. } => AppError::Compile(log),
            other => AppError::Compile(other.to_string()),
        }
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::UnprocessableEntity(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE_ENTITY")
            }
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidSection(_) => (StatusCode::BAD_REQUEST, "INVALID_SECTION"),
            AppError::Llm(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR"),
            AppError::Compile(_) => (StatusCode::BAD_GATEWAY, "COMPILE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Validation(msg)
            | AppError::UnprocessableEntity(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
            AppError::InvalidSection(e) => e.to_string(),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                "An AI processing error occurred".to_string()
            }
            // The compiler log is what the user needs to fix the template.
            AppError::Compile(log) => {
                tracing::error!("LaTeX compilation error: {log}");
                log.clone()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_section_maps_to_bad_request() {
        let e: AppError = MarkerError::InvalidSectionName("FOOTER".into()).into();
        assert_eq!(e.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_SECTION"));
        assert_eq!(e.to_string(), "Unknown section name: 'FOOTER'");
    }

    #[test]
    fn test_missing_api_key_maps_to_unauthorized() {
        let e: AppError = LlmError::MissingApiKey.into();
        assert_eq!(e.status_and_code().0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_compiler_log_is_kept() {
        let e: AppError = CompileError::Compiler {
            status: 400,
            log: "! Undefined control sequence.".into(),
        }
        .into();
        assert_eq!(e.status_and_code().0, StatusCode::BAD_GATEWAY);
        assert!(matches!(e, AppError::Compile(log) if log.contains("Undefined control")));
    }

    #[test]
    fn test_empty_document_is_validation_error() {
        let e: AppError = CompileError::EmptyDocument.into();
        assert_eq!(e.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_response_status() {
        let resp = AppError::Llm("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
