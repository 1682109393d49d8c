//! Highlight report: the text under every highlight annotation.

use pdfmarkup_core::{AnnotationRecord, Highlight, Rect, is_green};

use crate::full::text_boxes;

/// Whether an annotation counts as a highlight for the report.
fn is_highlight(record: &AnnotationRecord) -> bool {
    record.subtype.contains("Highlight")
}

/// Highlights on one page that have text under them.
pub fn page_highlights<F>(
    records: &[AnnotationRecord],
    page_number: usize,
    clip_text: &F,
) -> Vec<Highlight>
where
    F: Fn(&Rect) -> String,
{
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| is_highlight(record))
        .filter_map(|(index, record)| {
            let (boxes, texts) = text_boxes(record, page_number, index, None, clip_text);
            if texts.is_empty() {
                return None;
            }
            Some(Highlight {
                page: page_number,
                text: texts.join(" ").trim().to_string(),
                color_rgb: record.stroke,
                is_green: is_green(record.stroke.as_ref()),
                boxes,
            })
        })
        .collect()
}
