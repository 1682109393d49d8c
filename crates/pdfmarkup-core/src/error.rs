//! Error and warning types for pdfmarkup.
//!
//! Provides [`PdfError`] for fatal errors that stop processing a request and
//! [`ExtractWarning`] for per-object faults that are recovered locally
//! (skipped annotation, unusable drawing) and only counted or logged.

use std::fmt;

/// Fatal error types for PDF processing.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading PDF data.
    IoError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_drawing_segments").
        limit_name: String,
        limit_value: usize,
        actual_value: usize,
    },
    /// A page number outside `1..=page_count` was requested.
    PageOutOfRange { page: usize, page_count: usize },
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::PageOutOfRange { page, page_count } => {
                write!(f, "page {page} out of range (document has {page_count} pages)")
            }
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Machine-readable warning code.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractWarningCode {
    /// Annotation geometry could not be normalized.
    MalformedGeometry,
    /// An annotation or drawing carries an unreadable color.
    MissingColor,
    /// A markup annotation had neither usable geometry nor a `/Rect`.
    MissingGeometry,
    /// A filled drawing had no usable points.
    UnusableDrawing,
    /// Detailed drawing enumeration failed.
    DrawingsUnavailable,
    /// The fill-operation log could not be produced either.
    FillLogUnavailable,
    /// A content stream could not be decoded or interpreted.
    ContentStreamError,
    /// A font could not be loaded; defaults were used.
    FontError,
    Other(String),
}

impl ExtractWarningCode {
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MalformedGeometry => "MALFORMED_GEOMETRY",
            ExtractWarningCode::MissingColor => "MISSING_COLOR",
            ExtractWarningCode::MissingGeometry => "MISSING_GEOMETRY",
            ExtractWarningCode::UnusableDrawing => "UNUSABLE_DRAWING",
            ExtractWarningCode::DrawingsUnavailable => "DRAWINGS_UNAVAILABLE",
            ExtractWarningCode::FillLogUnavailable => "FILL_LOG_UNAVAILABLE",
            ExtractWarningCode::ContentStreamError => "CONTENT_STREAM_ERROR",
            ExtractWarningCode::FontError => "FONT_ERROR",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal fault recovered during extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractWarning {
    pub code: ExtractWarningCode,
    pub description: String,
    /// 1-based page number, if known.
    pub page: Option<usize>,
    /// Object context (e.g. "annotation 3").
    pub element: Option<String>,
}

impl ExtractWarning {
    pub fn new(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            element: None,
        }
    }

    /// Attach a page number (builder pattern).
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach an element description (builder pattern).
    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref element) = self.element {
            write!(f, " [{element}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_error_parse_error_display() {
        let err = PdfError::ParseError("invalid xref".to_string());
        assert_eq!(err.to_string(), "parse error: invalid xref");
    }

    #[test]
    fn pdf_error_resource_limit_display() {
        let err = PdfError::ResourceLimitExceeded {
            limit_name: "max_drawing_segments".to_string(),
            limit_value: 10,
            actual_value: 11,
        };
        assert_eq!(
            err.to_string(),
            "resource limit exceeded: max_drawing_segments (limit: 10, actual: 11)"
        );
    }

    #[test]
    fn pdf_error_page_out_of_range_display() {
        let err = PdfError::PageOutOfRange {
            page: 4,
            page_count: 3,
        };
        assert_eq!(err.to_string(), "page 4 out of range (document has 3 pages)");
    }

    #[test]
    fn pdf_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(PdfError::from(io), PdfError::IoError("gone".to_string()));
    }

    #[test]
    fn pdf_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(PdfError::Other("boom".into()));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn warning_display_with_context() {
        let w = ExtractWarning::new(ExtractWarningCode::MalformedGeometry, "9 quad points")
            .on_page(2)
            .element("annotation 0");
        assert_eq!(
            w.to_string(),
            "[MALFORMED_GEOMETRY] 9 quad points (page 2) [annotation 0]"
        );
    }

    #[test]
    fn warning_display_minimal() {
        let w = ExtractWarning::new(ExtractWarningCode::DrawingsUnavailable, "limit hit");
        assert_eq!(w.to_string(), "[DRAWINGS_UNAVAILABLE] limit hit");
    }
}
