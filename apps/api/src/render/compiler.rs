//! LaTeX → PDF compilation through an external service.
//!
//! One canonical contract (latexonline.cc style):
//! `GET {base_url}?text=<document>&force=true` returns the PDF bytes on 2xx
//! and the compiler log as the body otherwise.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Compiler returned status {status}: {log}")]
    Compiler { status: u16, log: String },

    #[error("Compiler returned an empty PDF")]
    EmptyPdf,

    #[error("Missing LaTeX content")]
    EmptyDocument,
}

/// Compilation backend. Carried in `AppState` as `Arc<dyn PdfCompiler>`.
#[async_trait]
pub trait PdfCompiler: Send + Sync {
    async fn compile(&self, latex: &str) -> Result<Bytes, CompileError>;
}

#[derive(Clone)]
pub struct LatexOnlineCompiler {
    client: Client,
    base_url: String,
}

impl LatexOnlineCompiler {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CompileError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PdfCompiler for LatexOnlineCompiler {
    async fn compile(&self, latex: &str) -> Result<Bytes, CompileError> {
        if latex.trim().is_empty() {
            return Err(CompileError::EmptyDocument);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("text", latex), ("force", "true")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read compiler error body: {e}");
                    Bytes::new()
                }
            };
            let log = String::from_utf8_lossy(&body).trim().to_string();
            warn!("Compiler returned {status} ({} bytes of log)", log.len());
            return Err(CompileError::Compiler {
                status: status.as_u16(),
                log: if log.is_empty() {
                    format!("Compilation failed with status {status}")
                } else {
                    log
                },
            });
        }

        let pdf = response.bytes().await?;
        if pdf.is_empty() {
            return Err(CompileError::EmptyPdf);
        }

        debug!("Compiled {} bytes of LaTeX into {} bytes of PDF", latex.len(), pdf.len());
        Ok(pdf)
    }
}
