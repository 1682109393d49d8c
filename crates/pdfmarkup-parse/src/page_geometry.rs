//! Page coordinate normalization.
//!
//! Transforms coordinates from PDF native space (bottom-left origin) to
//! page space with a top-left origin at the CropBox corner. Page rotation
//! is not applied: text, annotations and drawings all stay in unrotated
//! page space so they can be compared directly.

use pdfmarkup_core::{Point, Rect};

/// Page viewport derived from MediaBox and optional CropBox.
///
/// ```
/// use pdfmarkup_core::Rect;
/// use pdfmarkup_parse::page_geometry::PageGeometry;
///
/// let geo = PageGeometry::new(Rect::new(0.0, 0.0, 612.0, 792.0), None);
/// let p = geo.normalize_point(72.0, 720.0);
/// assert!((p.y - 72.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    x0: f64,
    y1: f64,
    width: f64,
    height: f64,
}

impl PageGeometry {
    /// `media_box` and `crop_box` hold raw PDF box arrays (`[llx lly urx ury]`).
    ///
    /// The CropBox is intersected with the MediaBox; a CropBox that does
    /// not overlap it is ignored.
    pub fn new(media_box: Rect, crop_box: Option<Rect>) -> Self {
        let media = normalize_box(media_box);
        let visible = crop_box
            .map(normalize_box)
            .and_then(|crop| crop.intersection(&media))
            .unwrap_or(media);
        Self {
            x0: visible.x0,
            y1: visible.y1,
            width: visible.width(),
            height: visible.height(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn normalize_point(&self, x: f64, y: f64) -> Point {
        Point::new(x - self.x0, self.y1 - y)
    }

    /// Normalize two opposite corners into a page-space rectangle.
    pub fn normalize_rect(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::from_corners(self.normalize_point(x0, y0), self.normalize_point(x1, y1))
    }
}

fn normalize_box(r: Rect) -> Rect {
    Rect::from_corners(Point::new(r.x0, r.y0), Point::new(r.x1, r.y1))
}
