//! Annotation records as ingested from the document.

use crate::color::Rgb;
use crate::geometry::{Rect, Vertices};
use crate::markup::MarkupKind;

/// One annotation on a page.
///
/// The geometry encoding has already been classified into [`Vertices`];
/// `rect` is the annotation's own coarse bounding box (`/Rect`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    /// Subtype name as written in the file, e.g. `"Highlight"`.
    pub subtype: String,
    /// Stroke color (`/C`), `None` when missing or unreadable.
    pub stroke: Option<Rgb>,
    /// `/QuadPoints` (or `/Vertices`) geometry, if present.
    pub vertices: Option<Vertices>,
    pub rect: Option<Rect>,
}

impl AnnotationRecord {
    /// The markup kind, if this is a text-markup annotation.
    pub fn markup_kind(&self) -> Option<MarkupKind> {
        MarkupKind::from_type_name(&self.subtype)
    }

    /// Lowercased subtype, as used in reports.
    pub fn type_name(&self) -> String {
        self.subtype.to_ascii_lowercase()
    }
}
