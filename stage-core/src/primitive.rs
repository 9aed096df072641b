//! The primitive geometry engine.
//!
//! A [`Primitive`] is a filled polygon with a validated color. Callers give
//! vertices in input space (origin top-left, y grows downward); the
//! primitive flips them once into rendering space (y grows upward from the
//! bottom of the surface) and every transform afterwards works there.
//!
//! ```text
//!  input space            rendering space
//!  (0,0) ─────► x         y ▲
//!    │                      │
//!    │                      │
//!    ▼ y                  (0,0) ─────► x
//! ```
//!
//! Rotation and scaling happen about [`Primitive::centre`], which is the
//! midpoint of the bounding box, not the area centroid.

use serde::Serialize;

use crate::geometry::{polygon_contains, Bounds};
use crate::{Color, Frame, StageError, StageResult, Vertex};

/// A filled polygon shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    color: Color,
    /// Rendering-space vertices, winding order preserved.
    vertices: Vec<Vertex>,
    screen_height: f64,
}

impl Primitive {
    /// Build a primitive from input-space vertices.
    ///
    /// Exact duplicate vertices are dropped (first occurrence wins), the
    /// rest are flipped into rendering space using `screen_height`, and a
    /// non-zero `rotation_degrees` is applied about the centre.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InsufficientVertices`] if fewer than three
    /// distinct vertices remain.
    pub fn new(
        color: Color,
        vertices: impl IntoIterator<Item = Vertex>,
        screen_height: f64,
        rotation_degrees: f64,
    ) -> StageResult<Self> {
        let mut unique: Vec<Vertex> = Vec::new();
        for vertex in vertices {
            if !unique.contains(&vertex) {
                unique.push(vertex);
            }
        }

        if unique.len() < 3 {
            return Err(StageError::InsufficientVertices(unique.len()));
        }

        let mut primitive = Self {
            color,
            vertices: unique,
            screen_height,
        };
        primitive.convert_vertices();
        primitive.rotate(rotation_degrees);

        tracing::trace!(
            "Primitive built with {} vertices, centre {:?}",
            primitive.vertices.len(),
            primitive.centre()
        );
        Ok(primitive)
    }

    /// Build a primitive from an unchecked channel list.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InvalidColor`] for a bad color, otherwise the
    /// same errors as [`Primitive::new`].
    pub fn with_channels(
        channels: &[i64],
        vertices: impl IntoIterator<Item = Vertex>,
        screen_height: f64,
        rotation_degrees: f64,
    ) -> StageResult<Self> {
        let color = Color::from_channels(channels)?;
        Self::new(color, vertices, screen_height, rotation_degrees)
    }

    // Input space has y growing downward; rendering space has it growing up.
    fn convert_vertices(&mut self) {
        let height = self.screen_height;
        for v in &mut self.vertices {
            v.y = height - v.y;
        }
    }

    fn shift(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            *v = v.offset(dx, dy);
        }
    }

    /// Rotate counter-clockwise (in rendering space) about the centre.
    pub fn rotate(&mut self, degrees: f64) {
        if degrees == 0.0 {
            return;
        }

        let (sin, cos) = degrees.to_radians().sin_cos();
        let centre = self.centre();
        for v in &mut self.vertices {
            let x = v.x - centre.x;
            let y = v.y - centre.y;
            *v = Vertex::new(x * cos - y * sin + centre.x, x * sin + y * cos + centre.y);
        }
    }

    /// Scale each axis about the centre.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::ZeroScaleFactor`] if either factor is zero; the
    /// primitive is left unchanged.
    pub fn scale(&mut self, x_factor: f64, y_factor: f64) -> StageResult<()> {
        if x_factor == 0.0 || y_factor == 0.0 {
            return Err(StageError::ZeroScaleFactor {
                x: x_factor,
                y: y_factor,
            });
        }

        let centre = self.centre();
        for v in &mut self.vertices {
            *v = Vertex::new(
                (v.x - centre.x) * x_factor + centre.x,
                (v.y - centre.y) * y_factor + centre.y,
            );
        }
        Ok(())
    }

    /// Move by `(dx, dy)` in input-space terms: positive `dy` moves down.
    pub fn translate_relative(&mut self, dx: f64, dy: f64) {
        self.shift(dx, -dy);
    }

    /// Move so the centre lands on the input-space point `(x, y)`.
    pub fn translate_centre_to(&mut self, x: f64, y: f64) {
        let target_y = self.screen_height - y;
        let centre = self.centre();
        self.shift(x - centre.x, target_y - centre.y);
    }

    /// Bounding box of the rendering-space vertices.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_vertices(&self.vertices).unwrap_or(Bounds {
            min: Vertex::default(),
            max: Vertex::default(),
        })
    }

    /// Bounding-box midpoint in rendering space.
    #[must_use]
    pub fn centre(&self) -> Vertex {
        self.bounds().centre()
    }

    /// Bounding-box midpoint converted back to input space.
    #[must_use]
    pub fn centre_in_input_space(&self) -> Vertex {
        let centre = self.centre();
        Vertex::new(centre.x, self.screen_height - centre.y)
    }

    /// Whether the input-space point `(x, y)` falls inside the polygon.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        polygon_contains(&self.vertices, Vertex::new(x, self.screen_height - y))
    }

    /// Replace the fill color.
    pub fn change_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Replace the fill color from an unchecked channel list.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InvalidColor`] and keeps the old color if the
    /// channels do not form a valid color.
    pub fn change_color_channels(&mut self, channels: &[i64]) -> StageResult<()> {
        self.color = Color::from_channels(channels)?;
        Ok(())
    }

    /// Queue this primitive on `frame` as an alpha-blended filled polygon.
    pub fn draw(&self, frame: &mut Frame) {
        frame.fill_polygon(&self.vertices, self.color.normalized());
    }

    /// Current fill color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Rendering-space vertices in winding order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Height used to flip between input and rendering space.
    #[must_use]
    pub fn screen_height(&self) -> f64 {
        self.screen_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DrawCommand;

    const HEIGHT: f64 = 100.0;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn assert_vertices_close(a: &[Vertex], b: &[Vertex]) {
        assert_eq!(a.len(), b.len());
        for (va, vb) in a.iter().zip(b) {
            assert!(
                approx_eq(va.x, vb.x) && approx_eq(va.y, vb.y),
                "{va:?} != {vb:?}"
            );
        }
    }

    fn square() -> Primitive {
        Primitive::new(
            Color::WHITE,
            [
                Vertex::new(10.0, 10.0),
                Vertex::new(30.0, 10.0),
                Vertex::new(30.0, 30.0),
                Vertex::new(10.0, 30.0),
            ],
            HEIGHT,
            0.0,
        )
        .expect("valid square")
    }

    #[test]
    fn test_construct_flips_y() {
        let p = square();
        assert_eq!(
            p.vertices(),
            &[
                Vertex::new(10.0, 90.0),
                Vertex::new(30.0, 90.0),
                Vertex::new(30.0, 70.0),
                Vertex::new(10.0, 70.0),
            ]
        );
    }

    #[test]
    fn test_construct_removes_exact_duplicates_in_order() {
        let p = Primitive::new(
            Color::BLACK,
            [
                Vertex::new(0.0, 0.0),
                Vertex::new(5.0, 0.0),
                Vertex::new(0.0, 0.0),
                Vertex::new(5.0, 5.0),
                Vertex::new(5.0, 0.0),
            ],
            HEIGHT,
            0.0,
        )
        .expect("three distinct vertices");

        assert_eq!(
            p.vertices(),
            &[
                Vertex::new(0.0, 100.0),
                Vertex::new(5.0, 100.0),
                Vertex::new(5.0, 95.0),
            ]
        );
    }

    #[test]
    fn test_construct_rejects_too_few_vertices() {
        let two = [Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)];
        assert_eq!(
            Primitive::new(Color::BLACK, two, HEIGHT, 0.0),
            Err(StageError::InsufficientVertices(2))
        );

        let collapsed = [
            Vertex::new(1.0, 1.0),
            Vertex::new(1.0, 1.0),
            Vertex::new(2.0, 2.0),
            Vertex::new(2.0, 2.0),
        ];
        assert_eq!(
            Primitive::new(Color::BLACK, collapsed, HEIGHT, 0.0),
            Err(StageError::InsufficientVertices(2))
        );

        assert_eq!(
            Primitive::new(Color::BLACK, Vec::<Vertex>::new(), HEIGHT, 0.0),
            Err(StageError::InsufficientVertices(0))
        );
    }

    #[test]
    fn test_with_channels_rejects_bad_color() {
        let result = Primitive::with_channels(
            &[0, 0, 0],
            [
                Vertex::new(0.0, 0.0),
                Vertex::new(1.0, 0.0),
                Vertex::new(0.0, 1.0),
            ],
            HEIGHT,
            0.0,
        );
        assert!(matches!(result, Err(StageError::InvalidColor(_))));
    }

    #[test]
    fn test_rotate_zero_is_noop() {
        let mut p = square();
        let before = p.vertices().to_vec();
        p.rotate(0.0);
        assert_eq!(p.vertices(), before.as_slice());
    }

    #[test]
    fn test_rotate_and_back_restores_symmetric_shape() {
        for degrees in [17.0, 90.0, -45.0, 180.0, 359.5] {
            let mut p = square();
            let before = p.vertices().to_vec();
            p.rotate(degrees);
            p.rotate(-degrees);
            assert_vertices_close(p.vertices(), &before);
        }
    }

    #[test]
    fn test_rotate_and_back_shifts_asymmetric_shape() {
        // The box midpoint of a right triangle moves under a 45 degree turn,
        // so turning back pivots elsewhere and the shape comes back shifted.
        let mut p = Primitive::new(
            Color::WHITE,
            [
                Vertex::new(0.0, 0.0),
                Vertex::new(10.0, 0.0),
                Vertex::new(0.0, 10.0),
            ],
            HEIGHT,
            0.0,
        )
        .expect("valid triangle");
        p.rotate(45.0);
        p.rotate(-45.0);

        let dx = 2.5 - 5.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_vertices_close(
            p.vertices(),
            &[
                Vertex::new(dx, 97.5),
                Vertex::new(10.0 + dx, 97.5),
                Vertex::new(dx, 87.5),
            ],
        );
    }

    #[test]
    fn test_rotate_quarter_turn_about_centre() {
        let mut p = square();
        p.rotate(90.0);

        // Centre (20, 80) stays put; (10, 90) swings to (10, 70).
        assert!(approx_eq(p.centre().x, 20.0));
        assert!(approx_eq(p.centre().y, 80.0));
        assert!(approx_eq(p.vertices()[0].x, 10.0));
        assert!(approx_eq(p.vertices()[0].y, 70.0));
    }

    #[test]
    fn test_construct_with_rotation_matches_rotate() {
        let rotated = Primitive::new(
            Color::WHITE,
            [
                Vertex::new(10.0, 10.0),
                Vertex::new(30.0, 10.0),
                Vertex::new(30.0, 30.0),
                Vertex::new(10.0, 30.0),
            ],
            HEIGHT,
            30.0,
        )
        .expect("valid");

        let mut manual = square();
        manual.rotate(30.0);
        assert_vertices_close(rotated.vertices(), manual.vertices());
    }

    #[test]
    fn test_scale_identity_is_noop() {
        let mut p = square();
        let before = p.vertices().to_vec();
        p.scale(1.0, 1.0).expect("scale by one");
        assert_vertices_close(p.vertices(), &before);
    }

    #[test]
    fn test_scale_about_centre() {
        let mut p = square();
        p.scale(2.0, 0.5).expect("non-zero factors");

        let bounds = p.bounds();
        assert!(approx_eq(bounds.width(), 40.0));
        assert!(approx_eq(bounds.height(), 10.0));
        assert!(approx_eq(p.centre().x, 20.0));
        assert!(approx_eq(p.centre().y, 80.0));
    }

    #[test]
    fn test_scale_by_zero_fails_and_leaves_shape() {
        let mut p = square();
        let before = p.vertices().to_vec();

        assert!(matches!(
            p.scale(3.0, 0.0),
            Err(StageError::ZeroScaleFactor { .. })
        ));
        assert!(matches!(
            p.scale(0.0, 3.0),
            Err(StageError::ZeroScaleFactor { .. })
        ));
        assert_eq!(p.vertices(), before.as_slice());
    }

    #[test]
    fn test_translate_relative_inverts_dy() {
        let mut p = square();
        p.translate_relative(5.0, 10.0);

        // Down 10 in input space is down 10 in rendering space too.
        assert_eq!(p.vertices()[0], Vertex::new(15.0, 80.0));
        assert_eq!(p.centre_in_input_space(), Vertex::new(25.0, 30.0));
    }

    #[test]
    fn test_translate_centre_to_is_position_independent() {
        let mut a = square();
        let mut b = square();
        b.translate_relative(-40.0, 63.0);
        b.rotate(33.0);

        a.translate_centre_to(70.0, 25.0);
        b.translate_centre_to(70.0, 25.0);

        for p in [&a, &b] {
            assert!(approx_eq(p.centre().x, 70.0));
            assert!(approx_eq(p.centre().y, HEIGHT - 25.0));
        }
    }

    #[test]
    fn test_centre_is_bounding_box_midpoint_for_concave() {
        // An L shape whose area centroid differs from its box midpoint.
        let p = Primitive::new(
            Color::WHITE,
            [
                Vertex::new(0.0, 0.0),
                Vertex::new(10.0, 0.0),
                Vertex::new(10.0, 2.0),
                Vertex::new(2.0, 2.0),
                Vertex::new(2.0, 40.0),
                Vertex::new(0.0, 40.0),
            ],
            HEIGHT,
            0.0,
        )
        .expect("valid");
        assert_eq!(p.centre_in_input_space(), Vertex::new(5.0, 20.0));
    }

    #[test]
    fn test_contains_point_uses_input_space() {
        let p = square();
        assert!(p.contains_point(20.0, 20.0));
        assert!(!p.contains_point(20.0, 80.0));
    }

    #[test]
    fn test_change_color_channels() {
        let mut p = square();
        p.change_color_channels(&[1, 2, 3, 4]).expect("valid color");
        assert_eq!(p.color(), Color::new(1, 2, 3, 4));

        assert!(p.change_color_channels(&[1, 2, 3, 999]).is_err());
        assert_eq!(p.color(), Color::new(1, 2, 3, 4));

        p.change_color(Color::BLACK);
        assert_eq!(p.color(), Color::BLACK);
    }

    #[test]
    fn test_draw_normalizes_color_and_keeps_order() {
        let mut p = square();
        p.change_color(Color::new(255, 51, 0, 102));

        let mut frame = Frame::new();
        p.draw(&mut frame);

        let DrawCommand::FillPolygon { vertices, color } = &frame.commands()[0];
        assert_eq!(vertices.as_slice(), p.vertices());
        let expected = [1.0, 0.2, 0.0, 0.4];
        for (got, want) in color.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        const TOLERANCE: f64 = 1e-6;

        fn arb_vertex() -> impl Strategy<Value = Vertex> {
            (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(x, y)| Vertex::new(x, y))
        }

        fn arb_primitive() -> impl Strategy<Value = Primitive> {
            prop::collection::vec(arb_vertex(), 3..12).prop_filter_map(
                "needs three distinct vertices",
                |vertices| Primitive::new(Color::WHITE, vertices, HEIGHT, 0.0).ok(),
            )
        }

        fn arb_factor() -> impl Strategy<Value = f64> {
            prop_oneof![-10.0f64..-0.01, 0.01f64..10.0]
        }

        fn close(a: &[Vertex], b: &[Vertex]) -> bool {
            a.len() == b.len()
                && a.iter().zip(b).all(|(va, vb)| {
                    (va.x - vb.x).abs() < TOLERANCE && (va.y - vb.y).abs() < TOLERANCE
                })
        }

        proptest! {
            #[test]
            fn prop_fewer_than_three_distinct_vertices_rejected(
                distinct in prop::collection::hash_set((-50i32..50, -50i32..50), 0..3),
                repeats in 1usize..4,
            ) {
                let vertices: Vec<Vertex> = distinct
                    .iter()
                    .map(|&(x, y)| Vertex::new(f64::from(x), f64::from(y)))
                    .collect();
                let repeated = vertices.iter().copied().cycle().take(vertices.len() * repeats);
                prop_assert_eq!(
                    Primitive::new(Color::WHITE, repeated, HEIGHT, 0.0),
                    Err(StageError::InsufficientVertices(distinct.len()))
                );
            }

            #[test]
            fn prop_rotate_zero_is_exact_noop(mut p in arb_primitive()) {
                let before = p.vertices().to_vec();
                p.rotate(0.0);
                prop_assert_eq!(p.vertices(), before.as_slice());
            }

            #[test]
            fn prop_quarter_turns_round_trip(mut p in arb_primitive(), turns in -4i32..=4) {
                let degrees = f64::from(turns) * 90.0;
                let before = p.vertices().to_vec();
                p.rotate(degrees);
                p.rotate(-degrees);
                prop_assert!(close(p.vertices(), &before));
            }

            #[test]
            fn prop_rectangle_round_trips_any_angle(
                (x, y) in (-200.0f64..200.0, -200.0f64..200.0),
                (w, h) in (1.0f64..100.0, 1.0f64..100.0),
                degrees in -720.0f64..720.0,
            ) {
                let mut p = Primitive::new(
                    Color::WHITE,
                    [
                        Vertex::new(x, y),
                        Vertex::new(x + w, y),
                        Vertex::new(x + w, y + h),
                        Vertex::new(x, y + h),
                    ],
                    HEIGHT,
                    0.0,
                )
                .expect("rectangle");
                let before = p.vertices().to_vec();
                p.rotate(degrees);
                p.rotate(-degrees);
                prop_assert!(close(p.vertices(), &before));
            }

            #[test]
            fn prop_rotate_round_trip_preserves_shape(
                mut p in arb_primitive(),
                degrees in -360.0f64..360.0,
            ) {
                // Any polygon comes back congruent: at most a translation.
                let before = p.vertices().to_vec();
                p.rotate(degrees);
                p.rotate(-degrees);
                let after = p.vertices();
                let (ox, oy) = (after[0].x - before[0].x, after[0].y - before[0].y);
                let shifted: Vec<Vertex> = before.iter().map(|v| v.offset(ox, oy)).collect();
                prop_assert!(close(after, &shifted));
            }

            #[test]
            fn prop_zero_scale_fails_and_keeps_vertices(
                mut p in arb_primitive(),
                factor in -1.0e6f64..1.0e6,
                zero_x in any::<bool>(),
            ) {
                let before = p.vertices().to_vec();
                let (x, y) = if zero_x { (0.0, factor) } else { (factor, 0.0) };
                let is_zero_scale = matches!(p.scale(x, y), Err(StageError::ZeroScaleFactor { .. }));
                prop_assert!(is_zero_scale);
                prop_assert_eq!(p.vertices(), before.as_slice());
            }

            #[test]
            fn prop_nonzero_scale_keeps_centre(
                mut p in arb_primitive(),
                x in arb_factor(),
                y in arb_factor(),
            ) {
                let centre = p.centre();
                p.scale(x, y).expect("non-zero factors");
                prop_assert!((p.centre().x - centre.x).abs() < TOLERANCE);
                prop_assert!((p.centre().y - centre.y).abs() < TOLERANCE);
            }

            #[test]
            fn prop_translate_centre_to_ignores_prior_position(
                p in arb_primitive(),
                (dx, dy) in (-300.0f64..300.0, -300.0f64..300.0),
                (x, y) in (-300.0f64..300.0, -300.0f64..300.0),
            ) {
                let mut moved = p.clone();
                moved.translate_relative(dx, dy);

                let mut a = p;
                a.translate_centre_to(x, y);
                moved.translate_centre_to(x, y);

                prop_assert!((a.centre().x - x).abs() < TOLERANCE);
                prop_assert!((a.centre().y - (HEIGHT - y)).abs() < TOLERANCE);
                prop_assert!(close(a.vertices(), moved.vertices()));
            }
        }
    }
}
