//! Structured page text as reported by the document provider, and the
//! compact span form produced by the correlation engine.

use crate::color::Rgb;
use crate::geometry::{Point, Rect};
use crate::markup::{AnnotationMarks, VisualMarks};

/// Span flag bit: superscript.
pub const FLAG_SUPERSCRIPT: u32 = 1;
/// Span flag bit: italic.
pub const FLAG_ITALIC: u32 = 2;
/// Span flag bit: serif font.
pub const FLAG_SERIF: u32 = 4;
/// Span flag bit: monospaced font.
pub const FLAG_MONOSPACE: u32 = 8;
/// Span flag bit: bold.
pub const FLAG_BOLD: u32 = 16;

/// Boldness as reported for spans: the font name mentions "bold", or any
/// style flag is set.
pub fn is_bold(font: &str, flags: u32) -> bool {
    font.to_ascii_lowercase().contains("bold") || flags != 0
}

/// Structured text of one page.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPage {
    pub width: f64,
    pub height: f64,
    pub blocks: Vec<TextBlock>,
}

impl TextPage {
    /// Plain text of the page, one output line per non-empty text line.
    ///
    /// With a clip rectangle, only characters whose box center falls inside
    /// it are kept.
    pub fn plain_text(&self, clip: Option<&Rect>) -> String {
        let mut out = String::new();
        for block in self.blocks.iter().filter(|b| b.kind == BlockKind::Text) {
            for line in &block.lines {
                let text: String = match clip {
                    None => line.spans.iter().map(|s| s.text.as_str()).collect(),
                    Some(clip) => line
                        .spans
                        .iter()
                        .flat_map(|s| s.chars.iter())
                        .filter(|ch| clip.contains(ch.bbox.center()))
                        .map(|ch| ch.c)
                        .collect(),
                };
                if !text.trim().is_empty() {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Block content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum BlockKind {
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBlock {
    pub number: usize,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: BlockKind,
    pub bbox: Rect,
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    pub bbox: Rect,
    /// Writing mode: 0 horizontal, 1 vertical.
    pub wmode: u8,
    /// Unit vector of the baseline direction.
    pub dir: Point,
    pub spans: Vec<RawSpan>,
}

/// A run of text sharing font, size and color within one line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSpan {
    pub text: String,
    pub bbox: Rect,
    /// Baseline start of the first glyph.
    pub origin: Point,
    pub font: String,
    pub size: f64,
    /// Style bitmask, see the `FLAG_*` constants.
    pub flags: u32,
    /// Packed `0xRRGGBB` fill color, when the color space could be resolved.
    pub color: Option<i64>,
    /// Derived from `font` and `flags`; filled in by consumers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_bold: bool,
    pub chars: Vec<RawChar>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawChar {
    pub c: char,
    pub bbox: Rect,
    pub origin: Point,
}

/// A text span with its markup correlation attached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSpan {
    /// 1-based page number.
    pub page: usize,
    pub block: usize,
    pub line: usize,
    pub span: usize,
    pub text: String,
    pub bbox: Rect,
    pub font: String,
    pub size: f64,
    pub is_bold: bool,
    pub color_rgb: Option<Rgb>,
    pub annotation_marks: AnnotationMarks,
    pub visual_marks: VisualMarks,
}

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_from_font_name() {
        assert!(is_bold("Helvetica-Bold", 0));
        assert!(is_bold("ABCDEF+ArialBOLDMT", 0));
        assert!(!is_bold("Helvetica", 0));
    }

    #[test]
    fn bold_from_any_flag() {
        assert!(is_bold("Times-Roman", FLAG_SERIF));
        assert!(is_bold("Courier", FLAG_MONOSPACE));
    }

    fn span(text: &str, x0: f64, y0: f64) -> RawSpan {
        let chars = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x0 + i as f64 * 5.0;
                RawChar {
                    c,
                    bbox: Rect::new(x, y0, x + 5.0, y0 + 10.0),
                    origin: Point::new(x, y0 + 8.0),
                }
            })
            .collect();
        RawSpan {
            text: text.to_string(),
            bbox: Rect::new(x0, y0, x0 + 5.0 * text.chars().count() as f64, y0 + 10.0),
            origin: Point::new(x0, y0 + 8.0),
            font: "Helvetica".into(),
            size: 10.0,
            flags: 0,
            color: Some(0),
            is_bold: false,
            chars,
        }
    }

    fn page() -> TextPage {
        let line = |text: &str, y: f64| TextLine {
            bbox: Rect::new(0.0, y, 100.0, y + 10.0),
            wmode: 0,
            dir: Point::new(1.0, 0.0),
            spans: vec![span(text, 0.0, y)],
        };
        TextPage {
            width: 100.0,
            height: 100.0,
            blocks: vec![
                TextBlock {
                    number: 0,
                    kind: BlockKind::Text,
                    bbox: Rect::new(0.0, 0.0, 100.0, 30.0),
                    lines: vec![line("Hello", 0.0), line("  ", 10.0), line("World", 20.0)],
                },
                TextBlock {
                    number: 1,
                    kind: BlockKind::Image,
                    bbox: Rect::new(0.0, 40.0, 50.0, 90.0),
                    lines: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn plain_text_skips_blank_lines() {
        assert_eq!(page().plain_text(None), "Hello\nWorld\n");
    }

    #[test]
    fn plain_text_clip_uses_char_centers() {
        // Covers the first two chars of "Hello" and nothing of "World".
        let clip = Rect::new(0.0, 0.0, 12.0, 10.0);
        assert_eq!(page().plain_text(Some(&clip)), "He\n");
    }

    #[test]
    fn plain_text_empty_clip() {
        let clip = Rect::new(500.0, 500.0, 600.0, 600.0);
        assert_eq!(page().plain_text(Some(&clip)), "");
    }

    #[test]
    fn truncate_counts_chars() {
        let mut s = String::from("héllo wörld");
        truncate_chars(&mut s, 5);
        assert_eq!(s, "héllo");
    }

    #[test]
    fn truncate_shorter_text_unchanged() {
        let mut s = String::from("abc");
        truncate_chars(&mut s, 10);
        assert_eq!(s, "abc");
        truncate_chars(&mut s, 3);
        assert_eq!(s, "abc");
    }
}
