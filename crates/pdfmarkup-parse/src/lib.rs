//! pdfmarkup-parse: the PDF document provider and content stream interpreter.
//!
//! This crate opens PDF bytes through a pluggable [`PdfBackend`] and reports,
//! per page, structured text spans, plain text, annotations, vector drawings
//! and a fill-operation log. It depends on pdfmarkup-core for shared types.

pub mod backend;
pub mod error;
pub mod font_metrics;
pub mod handler;
mod inline_image;
mod interpreter;
pub mod interpreter_state;
pub mod lopdf_backend;
pub mod matrix;
pub mod page_collector;
pub mod page_geometry;
pub mod text_state;

pub use backend::{ParseOptions, PdfBackend};
pub use error::BackendError;
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use matrix::Matrix;
pub use page_geometry::PageGeometry;
pub use pdfmarkup_core;
