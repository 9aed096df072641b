//! Draw lists handed to the rendering collaborator.

use serde::{Deserialize, Serialize};

use crate::{Color, Vertex};

/// A single drawing instruction.
///
/// Vertices are in rendering space (y grows upward from the bottom of the
/// surface) and colors are normalized to `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DrawCommand {
    /// Alpha-blended filled polygon, vertices in stored order.
    FillPolygon {
        /// Polygon outline.
        vertices: Vec<Vertex>,
        /// Normalized RGBA fill.
        color: [f32; 4],
    },
}

/// Everything to draw for one redraw, in painter's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    clear_color: Option<[f32; 4]>,
    commands: Vec<DrawCommand>,
}

impl Frame {
    /// Create an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the frame to `color`, dropping anything drawn so far.
    pub fn clear(&mut self, color: Color) {
        self.clear_color = Some(color.normalized());
        self.commands.clear();
    }

    /// Queue a filled polygon.
    pub fn fill_polygon(&mut self, vertices: &[Vertex], color: [f32; 4]) {
        self.commands.push(DrawCommand::FillPolygon {
            vertices: vertices.to_vec(),
            color,
        });
    }

    /// The normalized background color, if the frame was cleared.
    #[must_use]
    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.clear_color
    }

    /// Queued commands in draw order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget the clear color and all commands so the frame can be reused.
    pub fn reset(&mut self) {
        self.clear_color = None;
        self.commands.clear();
    }
}
