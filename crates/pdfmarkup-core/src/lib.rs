//! pdfmarkup-core: Backend-independent data types and algorithms.
//!
//! This crate provides the geometry (rectangles, quads, vertex encodings),
//! the overlap metric, the color classifier, markup correlation, page-range
//! parsing and the result types used by pdfmarkup. It does no PDF parsing.

pub mod annotation;
pub mod color;
pub mod drawing;
pub mod error;
pub mod geometry;
pub mod markup;
pub mod options;
pub mod overlap;
pub mod page_range;
pub mod result;
pub mod text;

pub use annotation::AnnotationRecord;
pub use color::{GREEN_FLOOR, GREEN_MARGIN, Rgb, is_green};
pub use drawing::{Drawing, FillLogEntry, LogOp, PathItem, PathItemKind};
pub use error::{ExtractWarning, ExtractWarningCode, PdfError};
pub use geometry::{GeometryError, Point, Quad, Rect, Vertices};
pub use markup::{
    AnnotationMarks, AnnotationSample, DEFAULT_MAX_SAMPLES, MarkupKind, MarkupRect, VisualFill,
    VisualMarks, VisualSample,
};
pub use options::{DEFAULT_BYTE_BUDGET, ExtractOptions};
pub use overlap::{DEFAULT_MIN_OVERLAP, IOU_EPSILON, iou, overlaps};
pub use page_range::{parse_page_range, select_pages};
pub use result::{
    AnnotationSummary, CompactPage, FullPage, FullTextReport, Highlight, HighlightReport, Meta,
    PageResult, PageText, ResponseEnvelope,
};
pub use text::{
    BlockKind, FLAG_BOLD, FLAG_ITALIC, FLAG_MONOSPACE, FLAG_SERIF, FLAG_SUPERSCRIPT, RawChar,
    RawSpan, TextBlock, TextLine, TextPage, TextSpan, is_bold, truncate_chars,
};
