//! Intersection-over-union matching between rectangles.

use crate::geometry::Rect;

/// Default IoU threshold for a span to count as marked.
///
/// Uncalibrated; kept low so a highlight covering part of a wrapped line
/// still registers.
pub const DEFAULT_MIN_OVERLAP: f64 = 0.05;

/// Lower bound for the IoU denominator.
pub const IOU_EPSILON: f64 = 1e-6;

/// Intersection-over-union of two rectangles.
///
/// Returns 0 when the rectangles share no positive area.
pub fn iou(a: &Rect, b: &Rect) -> f64 {
    let Some(inter) = a.intersection(b) else {
        return 0.0;
    };
    let inter_area = inter.width() * inter.height();
    let union_area = a.area() + b.area() - inter_area;
    inter_area / union_area.max(IOU_EPSILON)
}

/// Whether `a` and `b` overlap by at least `min_overlap` IoU.
pub fn overlaps(a: &Rect, b: &Rect, min_overlap: f64) -> bool {
    let score = iou(a, b);
    score > 0.0 && score >= min_overlap
}
