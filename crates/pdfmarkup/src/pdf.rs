//! Top-level PDF document type for markup extraction.

use pdfmarkup_core::{
    CompactPage, ExtractOptions, FullPage, FullTextReport, HighlightReport, Meta, PageResult,
    PageText, PdfError, Rect, ResponseEnvelope, TextPage, select_pages,
};
use pdfmarkup_parse::{LopdfBackend, ParseOptions, PdfBackend};

use crate::annotations::collect_markup;
use crate::budget::ByteBudget;
use crate::compact::compact_spans;
use crate::full::full_page;
use crate::highlights::page_highlights;
use crate::visual::collect_visual;

/// A PDF document opened for markup extraction.
///
/// The document handle lives as long as this value; every extraction call
/// reads from it without mutating it.
///
/// # Example
///
/// ```ignore
/// use pdfmarkup::{ExtractOptions, Pdf};
///
/// let pdf = Pdf::open(&bytes)?;
/// let response = pdf.extract(&ExtractOptions::compact())?;
/// for page in &response.pages {
///     println!("page {}", page.number());
/// }
/// ```
pub struct Pdf<B: PdfBackend = LopdfBackend> {
    doc: B::Document,
}

impl Pdf<LopdfBackend> {
    /// Open a PDF from bytes with default parse options.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the bytes are not a readable, unencrypted PDF.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        Self::open_with(bytes, &ParseOptions::default())
    }

    /// Read a file and open it as a PDF.
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes)
    }
}

impl<B: PdfBackend> Pdf<B> {
    /// Open a PDF from bytes with explicit parse options.
    pub fn open_with(bytes: &[u8], options: &ParseOptions) -> Result<Self, PdfError> {
        let doc = B::open(bytes, options).map_err(Into::into)?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        B::page_count(&self.doc)
    }

    /// Load a page by 1-based number.
    fn load_page(&self, number: usize) -> Result<B::Page, PdfError> {
        let page_count = self.page_count();
        if number == 0 || number > page_count {
            return Err(PdfError::PageOutOfRange {
                page: number,
                page_count,
            });
        }
        B::get_page(&self.doc, number - 1).map_err(Into::into)
    }

    /// Text inside `rect`, or empty when the page text is unreadable.
    fn clip_text(&self, page: &B::Page, number: usize, rect: &Rect) -> String {
        B::plain_text(&self.doc, page, Some(rect)).unwrap_or_else(|e| {
            tracing::debug!(page = number, error = %e, "clipped text unavailable");
            String::new()
        })
    }

    fn annotations_or_empty(
        &self,
        page: &B::Page,
        number: usize,
    ) -> Vec<pdfmarkup_core::AnnotationRecord> {
        B::annotations(&self.doc, page).unwrap_or_else(|e| {
            tracing::warn!(page = number, error = %e, "annotations unreadable");
            Vec::new()
        })
    }

    /// Compact spans with markup attachments for one page.
    ///
    /// # Errors
    ///
    /// Fails when the page's text cannot be extracted.
    pub fn compact_page(
        &self,
        number: usize,
        options: &ExtractOptions,
    ) -> Result<CompactPage, PdfError> {
        let page = self.load_page(number)?;
        let text = B::text_page(&self.doc, &page).map_err(Into::into)?;
        let has_text = text.blocks.iter().any(|b| {
            b.lines
                .iter()
                .flat_map(|l| l.spans.iter())
                .any(|s| !s.text.trim().is_empty())
        });
        if !has_text {
            return Ok(CompactPage {
                number,
                spans: Vec::new(),
            });
        }

        let records = self.annotations_or_empty(&page, number);
        let markup = collect_markup(&records, number);
        let visual = collect_visual(
            B::drawings(&self.doc, &page).map_err(Into::into),
            || B::fill_log(&self.doc, &page).map_err(Into::into),
            number,
        );
        let spans = compact_spans(number, &text, &markup.rects, &visual.fills, options);

        let backend_warnings = B::warnings(&self.doc, &page);
        tracing::debug!(
            page = number,
            spans = spans.len(),
            annotation_rects = markup.rects.len(),
            visual_fills = visual.fills.len(),
            visual_source = ?visual.source,
            skipped = markup.warnings.len() + visual.warnings.len() + backend_warnings.len(),
            "compact page done"
        );
        Ok(CompactPage { number, spans })
    }

    /// Raw structured text and annotations for one page.
    ///
    /// Unreadable text degrades to an empty text page.
    pub fn full_page(&self, number: usize, options: &ExtractOptions) -> Result<FullPage, PdfError> {
        let page = self.load_page(number)?;
        let text = B::text_page(&self.doc, &page).unwrap_or_else(|e| {
            tracing::warn!(page = number, error = %e, "structured text unavailable");
            TextPage {
                width: 0.0,
                height: 0.0,
                blocks: Vec::new(),
            }
        });
        let records = self.annotations_or_empty(&page, number);
        let clip = |rect: &Rect| self.clip_text(&page, number, rect);
        let result = full_page(number, text, &records, options, &clip);
        tracing::debug!(
            page = number,
            blocks = result.text_raw.blocks.len(),
            annotations = result.annotations.len(),
            "full page done"
        );
        Ok(result)
    }

    /// One page in the mode `options` selects.
    pub fn page_result(
        &self,
        number: usize,
        options: &ExtractOptions,
    ) -> Result<PageResult, PdfError> {
        if options.compact {
            self.compact_page(number, options).map(PageResult::Compact)
        } else {
            self.full_page(number, options).map(PageResult::Full)
        }
    }

    /// Extract the selected pages in ascending order until the byte budget
    /// is exceeded.
    ///
    /// # Errors
    ///
    /// Fails on the first page whose extraction fails.
    pub fn extract(&self, options: &ExtractOptions) -> Result<ResponseEnvelope, PdfError> {
        let page_count = self.page_count();
        let selected = select_pages(options.pages.as_deref(), page_count);
        let mut budget = ByteBudget::new(options.byte_budget);
        let mut pages = Vec::with_capacity(selected.len());

        for number in selected {
            let page = self.page_result(number, options)?;
            let more = budget.commit(&page);
            pages.push(page);
            if !more {
                tracing::info!(
                    page = number,
                    bytes = budget.used(),
                    budget = options.byte_budget,
                    "byte budget exceeded, stopping"
                );
                break;
            }
        }

        Ok(envelope(page_count, options.compact, pages))
    }

    /// The text under every highlight annotation in the document.
    pub fn highlights(&self) -> Result<HighlightReport, PdfError> {
        let mut highlights = Vec::new();
        for number in 1..=self.page_count() {
            let page = self.load_page(number)?;
            let records = B::annotations(&self.doc, &page).map_err(Into::into)?;
            if records.is_empty() {
                continue;
            }
            let clip = |rect: &Rect| self.clip_text(&page, number, rect);
            highlights.extend(page_highlights(&records, number, &clip));
        }
        Ok(HighlightReport::new(highlights))
    }

    /// Plain text of every page.
    pub fn fulltext(&self) -> Result<FullTextReport, PdfError> {
        let mut pages = Vec::with_capacity(self.page_count());
        for number in 1..=self.page_count() {
            let page = self.load_page(number)?;
            let text = B::plain_text(&self.doc, &page, None).map_err(Into::into)?;
            pages.push(PageText { page: number, text });
        }
        let page_count = pages.len();
        Ok(FullTextReport { pages, page_count })
    }
}

#[cfg(feature = "parallel")]
impl<B> Pdf<B>
where
    B: PdfBackend,
    B::Document: Sync,
{
    /// [`Pdf::extract`] with pages processed on the rayon pool.
    ///
    /// Pages are computed in chunks and committed in ascending order, so the
    /// budget cut-off and the output are identical to the sequential path.
    pub fn extract_parallel(&self, options: &ExtractOptions) -> Result<ResponseEnvelope, PdfError> {
        use rayon::prelude::*;

        let page_count = self.page_count();
        let selected = select_pages(options.pages.as_deref(), page_count);
        let chunk_size = rayon::current_num_threads().max(1);
        let mut budget = ByteBudget::new(options.byte_budget);
        let mut pages = Vec::with_capacity(selected.len());

        'chunks: for chunk in selected.chunks(chunk_size) {
            let results: Vec<Result<PageResult, PdfError>> = chunk
                .par_iter()
                .map(|&number| self.page_result(number, options))
                .collect();
            for result in results {
                let page = result?;
                let more = budget.commit(&page);
                let number = page.number();
                pages.push(page);
                if !more {
                    tracing::info!(
                        page = number,
                        bytes = budget.used(),
                        budget = options.byte_budget,
                        "byte budget exceeded, stopping"
                    );
                    break 'chunks;
                }
            }
        }

        Ok(envelope(page_count, options.compact, pages))
    }
}

fn envelope(page_count: usize, compact: bool, pages: Vec<PageResult>) -> ResponseEnvelope {
    ResponseEnvelope {
        meta: Meta {
            page_count,
            returned_pages: pages.len(),
            compact,
        },
        pages,
    }
}
