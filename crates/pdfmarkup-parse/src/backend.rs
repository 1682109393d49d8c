//! PDF parsing backend trait.
//!
//! Defines the [`PdfBackend`] trait: the document provider the correlation
//! engine reads from. A backend opens a document, loads pages, and reports
//! per page its structured text, plain text, annotations, vector drawings
//! and fill-operation log.

use pdfmarkup_core::{
    AnnotationRecord, Drawing, ExtractWarning, FillLogEntry, PdfError, Rect, TextPage,
};

/// Default cap on path segments collected as detailed drawings per page.
pub const DEFAULT_MAX_DRAWING_SEGMENTS: usize = 500_000;
/// Default nesting limit for Form XObjects.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 10;

/// Resource limits applied while interpreting pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Above this many segments on one page, detailed drawings are reported
    /// unavailable; the fill log is still produced.
    pub max_drawing_segments: usize,
    pub max_recursion_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_drawing_segments: DEFAULT_MAX_DRAWING_SEGMENTS,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

/// Trait abstracting the document provider.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes, &ParseOptions::default())?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let text = MyBackend::text_page(&doc, &page)?;
/// let annots = MyBackend::annotations(&doc, &page)?;
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// A loaded page.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable, unencrypted PDF.
    fn open(bytes: &[u8], options: &ParseOptions) -> Result<Self::Document, Self::Error>;

    fn page_count(doc: &Self::Document) -> usize;

    /// Load a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page cannot be
    /// loaded.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// Structured text: blocks, lines, spans and characters.
    fn text_page(doc: &Self::Document, page: &Self::Page) -> Result<TextPage, Self::Error>;

    /// Plain text, optionally restricted to characters inside `clip`.
    fn plain_text(
        doc: &Self::Document,
        page: &Self::Page,
        clip: Option<&Rect>,
    ) -> Result<String, Self::Error>;

    /// Annotations, excluding links and form widgets.
    fn annotations(
        doc: &Self::Document,
        page: &Self::Page,
    ) -> Result<Vec<AnnotationRecord>, Self::Error>;

    /// Detailed vector drawings with colors.
    fn drawings(doc: &Self::Document, page: &Self::Page) -> Result<Vec<Drawing>, Self::Error>;

    /// Coarse log of painting operations; carries no color.
    fn fill_log(doc: &Self::Document, page: &Self::Page)
    -> Result<Vec<FillLogEntry>, Self::Error>;

    /// Faults recovered while loading the page.
    fn warnings(_doc: &Self::Document, _page: &Self::Page) -> Vec<ExtractWarning> {
        Vec::new()
    }
}
