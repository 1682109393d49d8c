//! Axis-aligned rectangles, points and quadrilaterals.
//!
//! All coordinates use a top-left page origin (y grows downwards), matching
//! what the document provider reports for text spans, annotations and
//! drawings. Annotation geometry arrives in one of three encodings
//! ([`Vertices`]); [`Vertices::normalize`] is the single place where those
//! encodings are reduced to [`Rect`]s, and nothing downstream ever sees the
//! raw encoding.

use std::fmt;

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[f64; 2]", from = "[f64; 2]")
)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle `(x0, y0, x1, y1)`.
///
/// Serialized as a 4-element array `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[f64; 4]", from = "[f64; 4]")
)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build a rectangle from two arbitrary corners, ordering the coordinates.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    /// Bounding rectangle of a set of points, or `None` when there are none.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in iter {
            rect.x0 = rect.x0.min(p.x);
            rect.y0 = rect.y0.min(p.y);
            rect.x1 = rect.x1.max(p.x);
            rect.y1 = rect.y1.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Area, or 0 for inverted rectangles.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// True when the rectangle has no positive area.
    pub fn is_empty(&self) -> bool {
        !(self.x1 > self.x0 && self.y1 > self.y0)
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Intersection of two rectangles; `None` when they share no area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() { None } else { Some(r) }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Whether the point `p` lies inside the rectangle (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

impl From<[f64; 4]> for Rect {
    fn from([x0, y0, x1, y1]: [f64; 4]) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// A four-point quadrilateral, possibly rotated.
///
/// Point order follows the PDF `QuadPoints` convention (upper-left,
/// upper-right, lower-left, lower-right) but nothing depends on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub points: [Point; 4],
}

impl Quad {
    pub fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// Axis-aligned bounding rectangle of the four points.
    pub fn rect(&self) -> Rect {
        let [a, b, c, d] = self.points;
        Rect {
            x0: a.x.min(b.x).min(c.x).min(d.x),
            y0: a.y.min(b.y).min(c.y).min(d.y),
            x1: a.x.max(b.x).max(c.x).max(d.x),
            y1: a.y.max(b.y).max(c.y).max(d.y),
        }
    }

    fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }
}

/// Annotation geometry as encoded by the producer.
///
/// The shape is decided once, when the provider ingests the annotation, by
/// looking at the first element of the geometry array only.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertices {
    /// Already grouped quadrilaterals.
    Quads(Vec<Quad>),
    /// Flat list of points, four per quadrilateral.
    Points(Vec<Point>),
    /// Flat list of numbers, eight per quadrilateral.
    Flat(Vec<f64>),
}

/// Why a [`Vertices`] value could not be normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The list length is not a multiple of the quad stride.
    Malformed { len: usize, stride: usize },
    /// A coordinate is NaN or infinite.
    NonFinite,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Malformed { len, stride } => {
                write!(f, "malformed vertex list: {len} entries, expected a multiple of {stride}")
            }
            GeometryError::NonFinite => write!(f, "non-finite vertex coordinate"),
        }
    }
}

impl std::error::Error for GeometryError {}

impl Vertices {
    /// Number of entries in the underlying list.
    pub fn len(&self) -> usize {
        match self {
            Vertices::Quads(q) => q.len(),
            Vertices::Points(p) => p.len(),
            Vertices::Flat(n) => n.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reduce the geometry to one bounding rectangle per quadrilateral.
    ///
    /// An empty list yields no rectangles. A list whose length is not a
    /// multiple of the stride (4 points, 8 numbers) or that contains a
    /// non-finite coordinate is rejected as a whole.
    pub fn normalize(&self) -> Result<Vec<Rect>, GeometryError> {
        match self {
            Vertices::Quads(quads) => {
                if !quads.iter().all(Quad::is_finite) {
                    return Err(GeometryError::NonFinite);
                }
                Ok(quads.iter().map(Quad::rect).collect())
            }
            Vertices::Points(points) => {
                if points.len() % 4 != 0 {
                    return Err(GeometryError::Malformed {
                        len: points.len(),
                        stride: 4,
                    });
                }
                if !points.iter().all(Point::is_finite) {
                    return Err(GeometryError::NonFinite);
                }
                Ok(points
                    .chunks_exact(4)
                    .map(|c| Quad::new([c[0], c[1], c[2], c[3]]).rect())
                    .collect())
            }
            Vertices::Flat(nums) => {
                if nums.len() % 8 != 0 {
                    return Err(GeometryError::Malformed {
                        len: nums.len(),
                        stride: 8,
                    });
                }
                if !nums.iter().all(|n| n.is_finite()) {
                    return Err(GeometryError::NonFinite);
                }
                Ok(nums
                    .chunks_exact(8)
                    .map(|c| {
                        Quad::new([
                            Point::new(c[0], c[1]),
                            Point::new(c[2], c[3]),
                            Point::new(c[4], c[5]),
                            Point::new(c[6], c[7]),
                        ])
                        .rect()
                    })
                    .collect())
            }
        }
    }
}
