//! Request errors and their JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdfmarkup::PdfError;
use serde::{Deserialize, Serialize};

pub const NO_PDF_MESSAGE: &str =
    "No PDF provided (send as application/pdf, or multipart with field 'file')";

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No PDF provided (send as application/pdf, or multipart with field 'file')")]
    NoPdf,
    #[error("Empty request body")]
    EmptyBody,
    #[error("Failed to read request body: {0}")]
    Body(String),
    #[error("Failed to open PDF: {0}")]
    Open(PdfError),
    /// Any fault after the document was opened.
    #[error("{kind}: {detail}")]
    Internal {
        kind: &'static str,
        detail: String,
        debug: bool,
    },
}

impl AppError {
    pub fn extraction(err: PdfError, debug: bool) -> Self {
        AppError::Internal {
            kind: error_kind(&err),
            detail: err.to_string(),
            debug,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoPdf | AppError::EmptyBody | AppError::Body(_) | AppError::Open(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Variant name of a [`PdfError`].
pub fn error_kind(err: &PdfError) -> &'static str {
    match err {
        PdfError::ParseError(_) => "ParseError",
        PdfError::IoError(_) => "IoError",
        PdfError::InterpreterError(_) => "InterpreterError",
        PdfError::ResourceLimitExceeded { .. } => "ResourceLimitExceeded",
        PdfError::PageOutOfRange { .. } => "PageOutOfRange",
        PdfError::Other(_) => "Other",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            AppError::Internal { debug: false, .. } => {
                tracing::error!(error = %self, "request failed");
                "Internal Server Error".to_string()
            }
            AppError::Internal { debug: true, .. } => {
                tracing::error!(error = %self, "request failed");
                self.to_string()
            }
            AppError::Open(e) => {
                tracing::warn!(error = %e, "failed to open PDF");
                self.to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
