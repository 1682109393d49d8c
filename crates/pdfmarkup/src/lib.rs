//! pdfmarkup: Extract highlighted and marked-up text from PDF documents.
//!
//! This is the public API facade crate. It re-exports types from
//! pdfmarkup-core and uses pdfmarkup-parse for PDF reading and interpretation.
//!
//! # Architecture
//!
//! - **pdfmarkup-core**: Backend-independent data types and algorithms
//! - **pdfmarkup-parse**: PDF document provider and content stream interpreter
//! - **pdfmarkup** (this crate): Page extraction pipeline and the [`Pdf`] type
//!
//! Each text span is matched against two independent kinds of markup:
//! annotation rectangles (highlight, underline, strike-out, squiggly) and
//! filled vector shapes drawn in the page content.

pub mod annotations;
pub mod budget;
pub mod compact;
pub mod full;
pub mod highlights;
mod pdf;
pub mod visual;

pub use pdf::Pdf;
pub use pdfmarkup_core;
pub use pdfmarkup_core::{
    AnnotationMarks, AnnotationSummary, CompactPage, ExtractOptions, ExtractWarning, FullPage,
    FullTextReport, Highlight, HighlightReport, Meta, PageResult, PageText, PdfError, Rect, Rgb,
    ResponseEnvelope, TextSpan, VisualMarks,
};
pub use pdfmarkup_parse;
pub use pdfmarkup_parse::{LopdfBackend, ParseOptions, PdfBackend};
