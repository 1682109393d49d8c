//! Annotation markup collector.
//!
//! Turns a page's annotation records into markup rectangles. Geometry is
//! normalized once here; an annotation whose vertex list is absent, empty or
//! malformed falls back to its own `/Rect`. Faults never abort the page:
//! they become [`ExtractWarning`]s.

use pdfmarkup_core::{
    AnnotationRecord, ExtractWarning, ExtractWarningCode, MarkupRect, Rect,
};

/// Markup rectangles for one page plus the faults recovered on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupCollection {
    pub rects: Vec<MarkupRect>,
    pub warnings: Vec<ExtractWarning>,
}

impl MarkupCollection {
    /// Annotations dropped for lack of any usable geometry.
    pub fn skipped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.code == ExtractWarningCode::MissingGeometry)
            .count()
    }
}

/// Rectangles of an annotation's vertex list.
///
/// Returns an empty list when the list is absent or empty, and an error
/// warning when it is malformed.
pub fn quad_rects(
    record: &AnnotationRecord,
    page_number: usize,
    index: usize,
) -> Result<Vec<Rect>, ExtractWarning> {
    let Some(vertices) = &record.vertices else {
        return Ok(Vec::new());
    };
    vertices.normalize().map_err(|e| {
        ExtractWarning::new(ExtractWarningCode::MalformedGeometry, e.to_string())
            .on_page(page_number)
            .element(format!("annotation {index} ({})", record.subtype))
    })
}

/// Collect markup rectangles from a page's annotations.
///
/// Keeps highlight, underline, strikeout and squiggly annotations, in
/// enumeration order. An annotation with several quads yields one rectangle
/// per quad, all sharing its kind and color.
pub fn collect_markup(records: &[AnnotationRecord], page_number: usize) -> MarkupCollection {
    let mut out = MarkupCollection::default();

    for (index, record) in records.iter().enumerate() {
        let Some(kind) = record.markup_kind() else {
            continue;
        };

        let mut rects = match quad_rects(record, page_number, index) {
            Ok(rects) => rects,
            Err(warning) => {
                tracing::debug!(
                    page = page_number,
                    annotation = index,
                    reason = %warning.description,
                    "annotation geometry unreadable, using /Rect"
                );
                out.warnings.push(warning);
                Vec::new()
            }
        };
        if rects.is_empty() {
            match record.rect {
                Some(rect) => rects.push(rect),
                None => {
                    tracing::debug!(
                        page = page_number,
                        annotation = index,
                        "markup annotation without geometry skipped"
                    );
                    out.warnings.push(
                        ExtractWarning::new(
                            ExtractWarningCode::MissingGeometry,
                            "markup annotation has no usable geometry",
                        )
                        .on_page(page_number)
                        .element(format!("annotation {index} ({})", record.subtype)),
                    );
                    continue;
                }
            }
        }

        out.rects.extend(rects.into_iter().map(|rect| MarkupRect {
            kind,
            rect,
            color: record.stroke,
        }));
    }

    out
}
