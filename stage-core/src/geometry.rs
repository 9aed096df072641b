//! Plain 2D geometry types used by the primitive engine.

use serde::{Deserialize, Serialize};

/// A 2D point.
///
/// Whether `y` grows downward (input space) or upward (rendering space)
/// depends on where the vertex lives; primitives store rendering space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Vertex {
    /// Create a new vertex.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this vertex by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Distance to another vertex.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<(f64, f64)> for Vertex {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Vertex> for (f64, f64) {
    fn from(v: Vertex) -> Self {
        (v.x, v.y)
    }
}

/// Axis-aligned bounding box over a set of vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest x and y seen.
    pub min: Vertex,
    /// Largest x and y seen.
    pub max: Vertex,
}

impl Bounds {
    /// Compute the bounds of `vertices`, or `None` if the slice is empty.
    #[must_use]
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        let first = *vertices.first()?;
        let bounds = vertices.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |acc, v| Self {
                min: Vertex::new(acc.min.x.min(v.x), acc.min.y.min(v.y)),
                max: Vertex::new(acc.max.x.max(v.x), acc.max.y.max(v.y)),
            },
        );
        Some(bounds)
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn centre(&self) -> Vertex {
        Vertex::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Even-odd point-in-polygon test.
///
/// Casts a ray towards +x and counts edge crossings; the polygon is
/// implicitly closed.
#[must_use]
pub fn polygon_contains(polygon: &[Vertex], point: Vertex) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
