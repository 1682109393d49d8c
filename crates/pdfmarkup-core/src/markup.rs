//! Markup kinds, candidate rectangles, and span correlation.
//!
//! A page yields two independent candidate lists: [`MarkupRect`]s from
//! text-markup annotations and [`VisualFill`]s from filled vector shapes.
//! [`AnnotationMarks::correlate`] and [`VisualMarks::correlate`] test one
//! span rectangle against each list.

use std::collections::BTreeSet;
use std::fmt;

use crate::color::{Rgb, is_green};
use crate::geometry::Rect;
use crate::overlap::overlaps;

/// Default cap on samples attached to one span, per mark kind.
pub const DEFAULT_MAX_SAMPLES: usize = 2;

/// Kind of text-markup annotation.
///
/// Variant order is alphabetical by wire name so ordered sets serialize
/// sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum MarkupKind {
    Highlight,
    Squiggly,
    StrikeOut,
    Underline,
}

impl MarkupKind {
    /// Classify an annotation type name (e.g. `"Highlight"`, `"StrikeOut"`).
    ///
    /// Matches case-insensitively on the substrings `highlight`, `underline`,
    /// `strike` and `squiggly`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.contains("highlight") {
            Some(MarkupKind::Highlight)
        } else if lower.contains("underline") {
            Some(MarkupKind::Underline)
        } else if lower.contains("strike") {
            Some(MarkupKind::StrikeOut)
        } else if lower.contains("squiggly") {
            Some(MarkupKind::Squiggly)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkupKind::Highlight => "highlight",
            MarkupKind::Squiggly => "squiggly",
            MarkupKind::StrikeOut => "strikeout",
            MarkupKind::Underline => "underline",
        }
    }
}

impl fmt::Display for MarkupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rectangle of a markup annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupRect {
    pub kind: MarkupKind,
    pub rect: Rect,
    pub color: Option<Rgb>,
}

/// A filled vector shape that may act as a highlight.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFill {
    pub rect: Rect,
    /// `None` when the fill came from the operation log.
    pub fill: Option<Rgb>,
}

/// Annotation rectangle that matched a span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationSample {
    pub bbox: Rect,
    pub color_rgb: Option<Rgb>,
    pub is_green: bool,
}

/// Visual fill that matched a span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualSample {
    pub bbox: Rect,
    pub fill_rgb: Option<Rgb>,
    pub is_green: bool,
}

/// Annotation markup found on a span.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationMarks {
    pub present: bool,
    pub kinds: BTreeSet<MarkupKind>,
    pub samples: Vec<AnnotationSample>,
}

impl AnnotationMarks {
    /// Test `span` against every candidate in enumeration order.
    ///
    /// Stops at the first `max_samples` matches, so kinds only reflect
    /// candidates seen up to that point.
    pub fn correlate(
        span: &Rect,
        candidates: &[MarkupRect],
        min_overlap: f64,
        max_samples: usize,
    ) -> Self {
        let mut marks = AnnotationMarks::default();
        if max_samples == 0 {
            return marks;
        }
        for candidate in candidates {
            if !overlaps(span, &candidate.rect, min_overlap) {
                continue;
            }
            marks.kinds.insert(candidate.kind);
            marks.samples.push(AnnotationSample {
                bbox: candidate.rect,
                color_rgb: candidate.color,
                is_green: is_green(candidate.color.as_ref()),
            });
            if marks.samples.len() >= max_samples {
                break;
            }
        }
        marks.present = !marks.kinds.is_empty();
        marks
    }
}

/// Vector-drawn highlight found on a span.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualMarks {
    pub present: bool,
    pub samples: Vec<VisualSample>,
}

impl VisualMarks {
    pub fn correlate(
        span: &Rect,
        candidates: &[VisualFill],
        min_overlap: f64,
        max_samples: usize,
    ) -> Self {
        let samples: Vec<VisualSample> = candidates
            .iter()
            .filter(|v| overlaps(span, &v.rect, min_overlap))
            .take(max_samples)
            .map(|v| VisualSample {
                bbox: v.rect,
                fill_rgb: v.fill,
                is_green: is_green(v.fill.as_ref()),
            })
            .collect();
        VisualMarks {
            present: !samples.is_empty(),
            samples,
        }
    }
}
