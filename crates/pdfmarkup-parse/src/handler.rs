//! Content handler callback trait for content stream interpretation.
//!
//! The interpreter walks a page's operators and reports painted glyphs,
//! painted paths and placed images through [`ContentHandler`]. The page
//! collector implements it to build structured text, drawings and the
//! fill-operation log from a single pass.

use pdfmarkup_core::{ExtractWarning, Point, Rgb};

use crate::matrix::Matrix;
use crate::text_state::TextRenderMode;

/// The type of paint operation applied to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    Stroke,
    Fill,
    FillAndStroke,
}

impl PaintOp {
    pub fn fills(&self) -> bool {
        matches!(self, PaintOp::Fill | PaintOp::FillAndStroke)
    }

    pub fn strokes(&self) -> bool {
        matches!(self, PaintOp::Stroke | PaintOp::FillAndStroke)
    }
}

/// One path construction step, already transformed by the CTM.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Two control points and the end point.
    CurveTo([Point; 3]),
    /// An `re` operator: its four transformed corners.
    Rect([Point; 4]),
    ClosePath,
}

impl PathSegment {
    /// Points that contribute to the path's bounds.
    pub fn points(&self) -> &[Point] {
        match self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => std::slice::from_ref(p),
            PathSegment::CurveTo(pts) => pts,
            PathSegment::Rect(pts) => pts,
            PathSegment::ClosePath => &[],
        }
    }
}

/// A rendered glyph.
///
/// `trm` maps glyph space (scaled to one em) to PDF user space, so the
/// glyph's baseline runs from `trm(0, 0)` to `trm(width, 0)`.
#[derive(Debug, Clone)]
pub struct GlyphEvent {
    /// Decoded text; may be several characters (ligatures) or empty.
    pub text: String,
    pub trm: Matrix,
    /// Advance width in em units.
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub font: String,
    /// Effective font size in user space.
    pub size: f64,
    pub flags: u32,
    pub color: Option<Rgb>,
    pub render_mode: TextRenderMode,
    /// Identifies the text-showing operator this glyph came from.
    pub run: usize,
}

/// A painted path.
#[derive(Debug, Clone)]
pub struct PathEvent {
    pub segments: Vec<PathSegment>,
    pub paint_op: PaintOp,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    /// CTM at paint time.
    pub ctm: Matrix,
}

/// A placed image XObject. Its unit square is mapped by `ctm`.
#[derive(Debug, Clone)]
pub struct ImageEvent {
    pub name: String,
    pub ctm: Matrix,
}

/// Callback handler for content stream interpretation.
///
/// All methods default to no-ops.
pub trait ContentHandler {
    fn on_glyph(&mut self, _event: GlyphEvent) {}

    fn on_path_painted(&mut self, _event: PathEvent) {}

    fn on_image(&mut self, _event: ImageEvent) {}

    /// A recovered fault; interpretation continues with defaults.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}
