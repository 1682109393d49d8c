//! Visual-fill collector.
//!
//! Filled vector shapes drawn in page content can act as highlights. Detailed
//! drawings are tried first; when the provider cannot enumerate them, the
//! fill-operation log is scanned instead (no color). If both fail the page
//! simply has no visual fills.

use pdfmarkup_core::{
    Drawing, ExtractWarning, ExtractWarningCode, FillLogEntry, PdfError, VisualFill,
};

/// Where a page's visual fills came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualSource {
    Drawings,
    FillLog,
    /// Both sources failed.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualCollection {
    pub fills: Vec<VisualFill>,
    pub source: VisualSource,
    pub warnings: Vec<ExtractWarning>,
}

/// Fills from detailed drawings: filled shapes only, bounded by their
/// rectangle or by all their points.
pub fn fills_from_drawings(
    drawings: &[Drawing],
    page_number: usize,
) -> (Vec<VisualFill>, Vec<ExtractWarning>) {
    let mut fills = Vec::new();
    let mut warnings = Vec::new();
    for (index, drawing) in drawings.iter().enumerate() {
        let Some(fill) = drawing.fill else {
            continue;
        };
        match drawing.bounds() {
            Some(rect) => fills.push(VisualFill {
                rect,
                fill: Some(fill),
            }),
            None => warnings.push(
                ExtractWarning::new(
                    ExtractWarningCode::UnusableDrawing,
                    "filled drawing has no usable points",
                )
                .on_page(page_number)
                .element(format!("drawing {index}")),
            ),
        }
    }
    (fills, warnings)
}

/// Fills from the operation log: every `fill-*` entry, colorless.
pub fn fills_from_log(log: &[FillLogEntry]) -> Vec<VisualFill> {
    log.iter()
        .filter(|entry| entry.op.is_fill())
        .map(|entry| VisualFill {
            rect: entry.bbox,
            fill: None,
        })
        .collect()
}

/// Collect a page's visual fills with the two-tier fallback.
///
/// `fill_log` is only called when `drawings` failed.
pub fn collect_visual<F>(
    drawings: Result<Vec<Drawing>, PdfError>,
    fill_log: F,
    page_number: usize,
) -> VisualCollection
where
    F: FnOnce() -> Result<Vec<FillLogEntry>, PdfError>,
{
    let drawings_err = match drawings {
        Ok(drawings) => {
            let (fills, warnings) = fills_from_drawings(&drawings, page_number);
            return VisualCollection {
                fills,
                source: VisualSource::Drawings,
                warnings,
            };
        }
        Err(e) => e,
    };

    tracing::debug!(
        page = page_number,
        error = %drawings_err,
        "detailed drawings unavailable, using fill log"
    );
    let mut warnings = vec![
        ExtractWarning::new(
            ExtractWarningCode::DrawingsUnavailable,
            drawings_err.to_string(),
        )
        .on_page(page_number),
    ];

    match fill_log() {
        Ok(log) => VisualCollection {
            fills: fills_from_log(&log),
            source: VisualSource::FillLog,
            warnings,
        },
        Err(log_err) => {
            tracing::warn!(
                page = page_number,
                drawings_error = %drawings_err,
                fill_log_error = %log_err,
                "no visual fill source available"
            );
            warnings.push(
                ExtractWarning::new(ExtractWarningCode::FillLogUnavailable, log_err.to_string())
                    .on_page(page_number),
            );
            VisualCollection {
                fills: Vec::new(),
                source: VisualSource::Unavailable,
                warnings,
            }
        }
    }
}
