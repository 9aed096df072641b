//! Shape descriptors that produce the initial vertex list of a primitive.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{Color, Primitive, StageResult, Vertex};

/// Number of vertices used to approximate an ellipse.
pub const ELLIPSE_VERTEX_COUNT: u32 = 30;

/// A shape described in input space.
///
/// Every variant turns into the same [`Primitive`] type; the variant only
/// decides the starting vertices and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    /// A thick segment from `(x1, y1)` to `(x2, y2)`.
    Line {
        /// Start x.
        x1: f64,
        /// Start y.
        y1: f64,
        /// End x.
        x2: f64,
        /// End y.
        y2: f64,
        /// Thickness perpendicular to the segment.
        line_width: f64,
    },

    /// Three corner points.
    Triangle {
        /// First corner x.
        x1: f64,
        /// First corner y.
        y1: f64,
        /// Second corner x.
        x2: f64,
        /// Second corner y.
        y2: f64,
        /// Third corner x.
        x3: f64,
        /// Third corner y.
        y3: f64,
    },

    /// An axis-aligned rectangle with its top-left corner at `(x, y)`.
    Rectangle {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Initial rotation in degrees.
        rotation: f64,
    },

    /// The ellipse inscribed in the rectangle at `(x, y, width, height)`.
    Ellipse {
        /// Left edge of the bounding rectangle.
        x: f64,
        /// Top edge of the bounding rectangle.
        y: f64,
        /// Width of the bounding rectangle.
        width: f64,
        /// Height of the bounding rectangle.
        height: f64,
        /// Initial rotation in degrees.
        rotation: f64,
    },
}

impl Shape {
    /// A line segment of the given width.
    #[must_use]
    pub const fn line(x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64) -> Self {
        Self::Line {
            x1,
            y1,
            x2,
            y2,
            line_width,
        }
    }

    /// A triangle through three points.
    #[must_use]
    pub const fn triangle(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> Self {
        Self::Triangle {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
        }
    }

    /// An unrotated rectangle.
    #[must_use]
    pub const fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rectangle {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// An unrotated ellipse.
    #[must_use]
    pub const fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Ellipse {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Same shape with a different initial rotation.
    ///
    /// Lines and triangles ignore this: a line's rotation comes from its
    /// endpoints and a triangle has none.
    #[must_use]
    pub fn rotated(self, degrees: f64) -> Self {
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
                ..
            } => Self::Rectangle {
                x,
                y,
                width,
                height,
                rotation: degrees,
            },
            Self::Ellipse {
                x,
                y,
                width,
                height,
                ..
            } => Self::Ellipse {
                x,
                y,
                width,
                height,
                rotation: degrees,
            },
            other => other,
        }
    }

    /// Input-space vertices before any rotation.
    #[must_use]
    pub fn vertices(&self) -> Vec<Vertex> {
        match *self {
            Self::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
            } => {
                let length = (x2 - x1).hypot(y2 - y1);
                let centre_x = (x1 + x2) / 2.0;
                let centre_y = (y1 + y2) / 2.0;
                let left = centre_x - length / 2.0;
                let right = centre_x + length / 2.0;
                let top = centre_y - line_width / 2.0;
                let bottom = centre_y + line_width / 2.0;
                vec![
                    Vertex::new(left, top),
                    Vertex::new(left, bottom),
                    Vertex::new(right, bottom),
                    Vertex::new(right, top),
                ]
            }
            Self::Triangle {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => vec![
                Vertex::new(x1, y1),
                Vertex::new(x2, y2),
                Vertex::new(x3, y3),
            ],
            Self::Rectangle {
                x,
                y,
                width,
                height,
                ..
            } => vec![
                Vertex::new(x, y),
                Vertex::new(x + width, y),
                Vertex::new(x + width, y + height),
                Vertex::new(x, y + height),
            ],
            Self::Ellipse {
                x,
                y,
                width,
                height,
                ..
            } => {
                let centre_x = x + width / 2.0;
                let centre_y = y + height / 2.0;
                (0..ELLIPSE_VERTEX_COUNT)
                    .map(|i| {
                        let angle = f64::from(i) * TAU / f64::from(ELLIPSE_VERTEX_COUNT);
                        Vertex::new(
                            centre_x + (width / 2.0) * angle.cos(),
                            centre_y + (height / 2.0) * angle.sin(),
                        )
                    })
                    .collect()
            }
        }
    }

    /// Rotation in degrees applied when the primitive is built.
    ///
    /// For a line this is the segment's angle. It is negated because the
    /// rotation runs in rendering space, where y points the other way.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        match *self {
            Self::Line { x1, y1, x2, y2, .. } => -(y2 - y1).atan2(x2 - x1).to_degrees(),
            Self::Triangle { .. } => 0.0,
            Self::Rectangle { rotation, .. } | Self::Ellipse { rotation, .. } => rotation,
        }
    }

    /// Build the primitive for this shape.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StageError::InsufficientVertices`] for degenerate
    /// shapes such as a zero-length line or a triangle with repeated points.
    pub fn into_primitive(self, color: Color, screen_height: f64) -> StageResult<Primitive> {
        Primitive::new(color, self.vertices(), screen_height, self.rotation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StageError;

    const HEIGHT: f64 = 200.0;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_rectangle_corners_in_order() {
        assert_eq!(
            Shape::rectangle(1.0, 2.0, 3.0, 4.0).vertices(),
            vec![
                Vertex::new(1.0, 2.0),
                Vertex::new(4.0, 2.0),
                Vertex::new(4.0, 6.0),
                Vertex::new(1.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_rectangle_centre_in_input_space() {
        let p = Shape::rectangle(0.0, 0.0, 10.0, 20.0)
            .into_primitive(Color::WHITE, HEIGHT)
            .expect("valid rectangle");
        assert_eq!(p.centre_in_input_space(), Vertex::new(5.0, 10.0));
        assert_eq!(p.centre(), Vertex::new(5.0, HEIGHT - 10.0));
    }

    #[test]
    fn test_triangle_keeps_points() {
        let p = Shape::triangle(0.0, 0.0, 10.0, 0.0, 5.0, 8.0)
            .into_primitive(Color::WHITE, HEIGHT)
            .expect("valid triangle");
        assert_eq!(p.vertices()[2], Vertex::new(5.0, HEIGHT - 8.0));
    }

    #[test]
    fn test_degenerate_triangle_fails() {
        let result =
            Shape::triangle(1.0, 1.0, 1.0, 1.0, 5.0, 8.0).into_primitive(Color::WHITE, HEIGHT);
        assert_eq!(result, Err(StageError::InsufficientVertices(2)));
    }

    #[test]
    fn test_ellipse_samples_thirty_vertices() {
        let vertices = Shape::ellipse(10.0, 20.0, 40.0, 60.0).vertices();
        assert_eq!(vertices.len(), 30);
        assert!(approx_eq(vertices[0].x, 50.0));
        assert!(approx_eq(vertices[0].y, 50.0));
        assert!(approx_eq(vertices[15].x, 10.0));
        assert!(approx_eq(vertices[15].y, 50.0));
    }

    #[test]
    fn test_horizontal_line() {
        let p = Shape::line(10.0, 50.0, 90.0, 50.0, 4.0)
            .into_primitive(Color::WHITE, HEIGHT)
            .expect("valid line");
        let bounds = p.bounds();
        assert!(approx_eq(bounds.width(), 80.0));
        assert!(approx_eq(bounds.height(), 4.0));
    }

    #[test]
    fn test_vertical_line() {
        let shape = Shape::line(50.0, 10.0, 50.0, 90.0, 4.0);
        assert!(approx_eq(shape.rotation().abs(), 90.0));

        let p = shape
            .into_primitive(Color::WHITE, HEIGHT)
            .expect("vertical lines are valid");
        let bounds = p.bounds();
        assert!(approx_eq(bounds.width(), 4.0));
        assert!(approx_eq(bounds.height(), 80.0));
        let centre = p.centre_in_input_space();
        assert!(approx_eq(centre.x, 50.0));
        assert!(approx_eq(centre.y, 50.0));
    }

    #[test]
    fn test_diagonal_line_follows_segment() {
        // Down-right in input space.
        let p = Shape::line(0.0, 0.0, 30.0, 40.0, 4.0)
            .into_primitive(Color::WHITE, HEIGHT)
            .expect("valid line");

        assert!(p.contains_point(5.0, 20.0 / 3.0));
        assert!(p.contains_point(25.0, 100.0 / 3.0));
        // The mirrored diagonal is not covered.
        assert!(!p.contains_point(5.0, 100.0 / 3.0));
    }

    #[test]
    fn test_zero_length_line_fails() {
        let result = Shape::line(5.0, 5.0, 5.0, 5.0, 2.0).into_primitive(Color::WHITE, HEIGHT);
        assert!(matches!(result, Err(StageError::InsufficientVertices(_))));
    }

    #[test]
    fn test_rotated_only_affects_rectangles_and_ellipses() {
        assert!(approx_eq(
            Shape::rectangle(0.0, 0.0, 1.0, 1.0).rotated(45.0).rotation(),
            45.0
        ));
        assert!(approx_eq(
            Shape::ellipse(0.0, 0.0, 1.0, 1.0).rotated(-10.0).rotation(),
            -10.0
        ));
        let tri = Shape::triangle(0.0, 0.0, 1.0, 0.0, 0.0, 1.0);
        assert_eq!(tri.rotated(30.0), tri);
    }

    #[test]
    fn test_shape_serde_tag() {
        let json = serde_json::to_value(Shape::rectangle(0.0, 0.0, 2.0, 3.0)).expect("serialize");
        assert_eq!(json["shape"], "rectangle");
        assert_eq!(json["width"], 2.0);
    }
}
