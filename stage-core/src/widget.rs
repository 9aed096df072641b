//! On-screen controls that can draw and be hit-tested.

use crate::{Color, Frame, Primitive, Shape, StageResult};

/// Something a screen can draw and point at.
pub trait Widget {
    /// Queue this widget's drawing on `frame`.
    fn draw(&self, frame: &mut Frame);

    /// Whether the input-space point `(x, y)` is inside the widget.
    fn moused_over(&self, x: f64, y: f64) -> bool;
}

impl Widget for Primitive {
    fn draw(&self, frame: &mut Frame) {
        Primitive::draw(self, frame);
    }

    fn moused_over(&self, x: f64, y: f64) -> bool {
        self.contains_point(x, y)
    }
}

/// A clickable shape that swaps color while the pointer is over it.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    body: Primitive,
    idle: Color,
    hover: Color,
    hovered: bool,
}

impl Button {
    /// Build a button from any shape.
    ///
    /// # Errors
    ///
    /// Returns the shape's construction error if it is degenerate.
    pub fn new(shape: Shape, idle: Color, hover: Color, screen_height: f64) -> StageResult<Self> {
        Ok(Self {
            body: shape.into_primitive(idle, screen_height)?,
            idle,
            hover,
            hovered: false,
        })
    }

    /// Track the pointer, returning whether it is over the button.
    pub fn update_hover(&mut self, x: f64, y: f64) -> bool {
        let hovered = self.body.contains_point(x, y);
        if hovered != self.hovered {
            self.hovered = hovered;
            self.body
                .change_color(if hovered { self.hover } else { self.idle });
        }
        hovered
    }

    /// Whether the pointer was over the button at the last update.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// The underlying primitive.
    #[must_use]
    pub fn body(&self) -> &Primitive {
        &self.body
    }
}

impl Widget for Button {
    fn draw(&self, frame: &mut Frame) {
        self.body.draw(frame);
    }

    fn moused_over(&self, x: f64, y: f64) -> bool {
        self.body.contains_point(x, y)
    }
}
