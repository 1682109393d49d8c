//! Vector drawings and the coarse fill-operation log.

use std::fmt;

use crate::color::Rgb;
use crate::geometry::{Point, Rect};

/// Kind of a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathItemKind {
    Line,
    Curve,
    Rect,
}

/// One segment of a drawn path, with its points in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    pub kind: PathItemKind,
    pub points: Vec<Point>,
}

/// A painted path.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// Fill color; `None` for stroke-only paths or unresolvable color spaces.
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    /// Set when the whole path is a single axis-aligned rectangle.
    pub rect: Option<Rect>,
    pub items: Vec<PathItem>,
}

impl Drawing {
    /// The drawing's bounding rectangle: `rect` when present, otherwise the
    /// bounds of all item points. `None` when no point is usable.
    pub fn bounds(&self) -> Option<Rect> {
        if let Some(rect) = self.rect {
            return Some(rect);
        }
        Rect::bounding(
            self.items
                .iter()
                .flat_map(|item| item.points.iter().copied())
                .filter(|p| p.x.is_finite() && p.y.is_finite()),
        )
    }
}

/// Painting operation recorded in the fill log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOp {
    FillPath,
    StrokePath,
    FillText,
    StrokeText,
    IgnoreText,
    FillImage,
}

impl LogOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOp::FillPath => "fill-path",
            LogOp::StrokePath => "stroke-path",
            LogOp::FillText => "fill-text",
            LogOp::StrokeText => "stroke-text",
            LogOp::IgnoreText => "ignore-text",
            LogOp::FillImage => "fill-image",
        }
    }

    /// True for every `fill-*` operation.
    pub fn is_fill(&self) -> bool {
        self.as_str().starts_with("fill")
    }
}

impl fmt::Display for LogOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the fill-operation log. Carries no color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillLogEntry {
    pub op: LogOp,
    pub bbox: Rect,
}
