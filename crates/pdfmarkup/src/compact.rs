//! Span compactor.
//!
//! Flattens a page's structured text into spans and attaches, per span, the
//! annotation markup and visual fills that overlap it.

use pdfmarkup_core::{
    AnnotationMarks, BlockKind, ExtractOptions, MarkupRect, Rgb, TextPage, TextSpan, VisualFill,
    VisualMarks, is_bold, truncate_chars,
};

/// Build the compact span list for one page.
///
/// Non-text blocks and spans whose text is blank are skipped, but indices
/// still count them so `(block, line, span)` stays a stable ordering key.
/// Truncation happens after matching.
pub fn compact_spans(
    page_number: usize,
    text: &TextPage,
    markups: &[MarkupRect],
    fills: &[VisualFill],
    options: &ExtractOptions,
) -> Vec<TextSpan> {
    let mut spans = Vec::new();

    for (bi, block) in text.blocks.iter().enumerate() {
        if block.kind != BlockKind::Text {
            continue;
        }
        for (li, line) in block.lines.iter().enumerate() {
            for (si, raw) in line.spans.iter().enumerate() {
                if raw.text.trim().is_empty() {
                    continue;
                }
                let bbox = raw.bbox;
                let mut span = TextSpan {
                    page: page_number,
                    block: bi,
                    line: li,
                    span: si,
                    text: raw.text.clone(),
                    bbox,
                    font: raw.font.clone(),
                    size: raw.size,
                    is_bold: is_bold(&raw.font, raw.flags),
                    color_rgb: raw.color.and_then(Rgb::from_srgb_int),
                    annotation_marks: AnnotationMarks::correlate(
                        &bbox,
                        markups,
                        options.min_overlap,
                        options.max_samples,
                    ),
                    visual_marks: VisualMarks::correlate(
                        &bbox,
                        fills,
                        options.min_overlap,
                        options.max_samples,
                    ),
                };
                if let Some(max) = options.truncate_len() {
                    truncate_chars(&mut span.text, max);
                }
                spans.push(span);
            }
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfmarkup_core::{MarkupKind, Point, RawSpan, Rect, TextBlock, TextLine};

    fn raw(text: &str, x0: f64, font: &str, color: Option<i64>) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            bbox: Rect::new(x0, 100.0, x0 + 50.0, 112.0),
            origin: Point::new(x0, 110.0),
            font: font.to_string(),
            size: 12.0,
            flags: 0,
            color,
            is_bold: false,
            chars: Vec::new(),
        }
    }

    fn page(spans: Vec<RawSpan>) -> TextPage {
        TextPage {
            width: 612.0,
            height: 792.0,
            blocks: vec![
                TextBlock {
                    number: 0,
                    kind: BlockKind::Image,
                    bbox: Rect::new(0.0, 0.0, 10.0, 10.0),
                    lines: Vec::new(),
                },
                TextBlock {
                    number: 1,
                    kind: BlockKind::Text,
                    bbox: Rect::new(0.0, 100.0, 300.0, 112.0),
                    lines: vec![TextLine {
                        bbox: Rect::new(0.0, 100.0, 300.0, 112.0),
                        wmode: 0,
                        dir: Point::new(1.0, 0.0),
                        spans,
                    }],
                },
            ],
        }
    }

    #[test]
    fn indices_count_skipped_entries() {
        let text = page(vec![
            raw("   ", 0.0, "Helvetica", None),
            raw("Hello", 60.0, "Helvetica", None),
        ]);
        let spans = compact_spans(3, &text, &[], &[], &ExtractOptions::compact());
        assert_eq!(spans.len(), 1);
        let s = &spans[0];
        assert_eq!((s.page, s.block, s.line, s.span), (3, 1, 0, 1));
        assert!(!s.annotation_marks.present);
        assert!(!s.visual_marks.present);
    }

    #[test]
    fn bold_and_color_are_derived() {
        let text = page(vec![raw("Bold", 0.0, "Arial-BoldMT", Some(0x00FF00))]);
        let spans = compact_spans(1, &text, &[], &[], &ExtractOptions::compact());
        assert!(spans[0].is_bold);
        assert_eq!(spans[0].color_rgb, Some(Rgb::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn annotation_and_visual_marks_are_independent() {
        let text = page(vec![
            raw("marked", 0.0, "Helvetica", None),
            raw("filled", 100.0, "Helvetica", None),
        ]);
        let markups = vec![MarkupRect {
            kind: MarkupKind::Highlight,
            rect: Rect::new(0.0, 100.0, 50.0, 112.0),
            color: Some(Rgb::new(0.1, 0.8, 0.1)),
        }];
        let fills = vec![VisualFill {
            rect: Rect::new(100.0, 100.0, 115.0, 112.0),
            fill: Some(Rgb::new(1.0, 1.0, 0.0)),
        }];
        let spans = compact_spans(1, &text, &markups, &fills, &ExtractOptions::compact());

        assert!(spans[0].annotation_marks.present);
        assert!(spans[0].annotation_marks.samples[0].is_green);
        assert!(!spans[0].visual_marks.present);

        assert!(!spans[1].annotation_marks.present);
        assert!(spans[1].visual_marks.present);
        assert!(!spans[1].visual_marks.samples[0].is_green);
    }

    #[test]
    fn truncation_does_not_affect_matching() {
        let text = page(vec![raw("a long span of text", 0.0, "Helvetica", None)]);
        let markups = vec![MarkupRect {
            kind: MarkupKind::Underline,
            rect: Rect::new(40.0, 100.0, 50.0, 112.0),
            color: None,
        }];
        let options = ExtractOptions {
            truncate_span: Some(3),
            ..ExtractOptions::compact()
        };
        let spans = compact_spans(1, &text, &markups, &[], &options);
        assert_eq!(spans[0].text, "a l");
        assert!(spans[0].annotation_marks.present);
    }

    #[test]
    fn zero_truncation_is_ignored() {
        let text = page(vec![raw("keep", 0.0, "Helvetica", None)]);
        let options = ExtractOptions {
            truncate_span: Some(0),
            ..ExtractOptions::compact()
        };
        let spans = compact_spans(1, &text, &[], &[], &options);
        assert_eq!(spans[0].text, "keep");
    }
}
