//! Full (non-compact) page extraction: raw structured text plus every
//! annotation on the page with the text under it.

use pdfmarkup_core::{
    AnnotationRecord, AnnotationSummary, ExtractOptions, FullPage, Rect, TextPage, is_bold,
    truncate_chars,
};

use crate::annotations::quad_rects;

/// Boxes of a markup annotation that have text under them, with that text.
///
/// Each rectangle of the vertex list is tried; if none yields text (or the
/// list is unusable) the annotation's `/Rect` is tried instead.
pub(crate) fn text_boxes<F>(
    record: &AnnotationRecord,
    page_number: usize,
    index: usize,
    truncate: Option<usize>,
    clip_text: &F,
) -> (Vec<Rect>, Vec<String>)
where
    F: Fn(&Rect) -> String,
{
    let mut boxes = Vec::new();
    let mut texts = Vec::new();

    let rects = quad_rects(record, page_number, index).unwrap_or_else(|warning| {
        tracing::debug!(
            page = page_number,
            annotation = index,
            reason = %warning.description,
            "annotation geometry unreadable, using /Rect"
        );
        Vec::new()
    });
    for rect in rects {
        if let Some(text) = text_under(rect, truncate, clip_text) {
            texts.push(text);
            boxes.push(rect);
        }
    }
    if texts.is_empty() {
        if let Some(rect) = record.rect {
            if let Some(text) = text_under(rect, truncate, clip_text) {
                texts.push(text);
                boxes.push(rect);
            }
        }
    }
    (boxes, texts)
}

fn text_under<F>(rect: Rect, truncate: Option<usize>, clip_text: &F) -> Option<String>
where
    F: Fn(&Rect) -> String,
{
    let mut text = clip_text(&rect).trim().to_string();
    if text.is_empty() {
        return None;
    }
    if let Some(max) = truncate {
        truncate_chars(&mut text, max);
    }
    Some(text)
}

/// Summarize every annotation on a page.
pub fn annotation_summaries<F>(
    records: &[AnnotationRecord],
    page_number: usize,
    options: &ExtractOptions,
    clip_text: &F,
) -> Vec<AnnotationSummary>
where
    F: Fn(&Rect) -> String,
{
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            if record.markup_kind().is_some() {
                let (boxes, texts) =
                    text_boxes(record, page_number, index, options.truncate_len(), clip_text);
                AnnotationSummary {
                    kind: record.type_name(),
                    color_rgb: record.stroke,
                    boxes,
                    text: texts.join(" ").trim().to_string(),
                }
            } else {
                AnnotationSummary {
                    kind: record.type_name(),
                    color_rgb: record.stroke,
                    boxes: record.rect.into_iter().collect(),
                    text: String::new(),
                }
            }
        })
        .collect()
}

/// Mark bold spans and apply span truncation to raw structured text.
pub fn prepare_raw_text(text: &mut TextPage, options: &ExtractOptions) {
    let truncate = options.truncate_len();
    for span in text
        .blocks
        .iter_mut()
        .flat_map(|b| b.lines.iter_mut())
        .flat_map(|l| l.spans.iter_mut())
    {
        span.is_bold = is_bold(&span.font, span.flags);
        if let Some(max) = truncate {
            truncate_chars(&mut span.text, max);
        }
    }
}

/// Assemble a full page from its raw text and annotations.
pub fn full_page<F>(
    page_number: usize,
    mut text: TextPage,
    records: &[AnnotationRecord],
    options: &ExtractOptions,
    clip_text: &F,
) -> FullPage
where
    F: Fn(&Rect) -> String,
{
    prepare_raw_text(&mut text, options);
    FullPage {
        number: page_number,
        text_raw: text,
        annotations: annotation_summaries(records, page_number, options, clip_text),
    }
}
