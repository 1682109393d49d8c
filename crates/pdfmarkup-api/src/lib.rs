//! # pdfmarkup-api
//!
//! HTTP service exposing pdfmarkup extraction.
//!
//! | route | body | response |
//! |---|---|---|
//! | `GET /` | none | health status |
//! | `POST /parse` | PDF | per-page text with markup (`compact`, `pages`, `truncate_span`, `debug` query flags) |
//! | `POST /extract` | PDF | text under every highlight annotation |
//! | `POST /fulltext` | PDF | plain text per page |
//!
//! The PDF is sent either as a raw `application/pdf` body or as a multipart
//! field named `file`.

mod api;
mod body;
pub mod config;
mod error;

pub use api::{
    AppState, DebugQuery, ParseQuery, SERVICE_NAME, SERVICE_VERSION, app, extract_highlights,
    fulltext, health_check, parse_pdf,
};
pub use body::{FILE_FIELD, read_pdf};
pub use config::Config;
pub use error::{AppError, ErrorResponse, NO_PDF_MESSAGE, error_kind};
