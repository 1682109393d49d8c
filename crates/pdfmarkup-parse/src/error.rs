//! Error types for the parsing and interpreter layers.
//!
//! Uses [`thiserror`] for error derivation. Provides [`BackendError`]
//! that wraps backend-specific errors and converts them to [`PdfError`].

use pdfmarkup_core::PdfError;
use thiserror::Error;

/// Error type for PDF parsing backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A configured limit was exceeded.
    #[error("resource limit exceeded: {name} (limit: {limit}, actual: {actual})")]
    ResourceLimit {
        name: &'static str,
        limit: usize,
        actual: usize,
    },

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::ParseError(format!("font: {msg}")),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::ResourceLimit {
                name,
                limit,
                actual,
            } => PdfError::ResourceLimitExceeded {
                limit_name: name.to_string(),
                limit_value: limit,
                actual_value: actual,
            },
            BackendError::Core(e) => e,
        }
    }
}
