//! Headless backend for machines without a display or GPU.
//!
//! Nothing is rasterized; every command is traced and counted so the rest
//! of the pipeline can run (and be inspected) without a surface.

use stage_core::{DrawCommand, Frame};

use crate::{BackendType, RenderResult};

use super::RenderBackend;

/// Backend that only logs and counts what it is asked to draw.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    background: [f32; 4],
    frames_rendered: u64,
    last_polygon_count: usize,
    last_clear_color: Option<[f32; 4]>,
}

impl HeadlessBackend {
    /// Create a new headless backend.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: [0.0, 0.0, 0.0, 1.0],
            frames_rendered: 0,
            last_polygon_count: 0,
            last_clear_color: None,
        }
    }

    /// Log a single command.
    fn render_command(command: &DrawCommand) {
        match command {
            DrawCommand::FillPolygon { vertices, color } => {
                tracing::trace!(
                    "Fill polygon with {} vertices, color {:?}",
                    vertices.len(),
                    color
                );
            }
        }
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Polygons in the most recent frame.
    #[must_use]
    pub fn last_polygon_count(&self) -> usize {
        self.last_polygon_count
    }

    /// Background the most recent frame was cleared to.
    #[must_use]
    pub fn last_clear_color(&self) -> Option<[f32; 4]> {
        self.last_clear_color
    }

    /// Current surface size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl RenderBackend for HeadlessBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Headless
    }

    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        tracing::trace!(
            "Headless render: {} commands, surface {}x{}",
            frame.len(),
            self.width,
            self.height
        );

        for command in frame.commands() {
            Self::render_command(command);
        }

        self.last_clear_color = Some(frame.clear_color().unwrap_or(self.background));
        self.last_polygon_count = frame.len();
        self.frames_rendered += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.width = width;
        self.height = height;
        tracing::debug!("Headless resized to {}x{}", width, height);
        Ok(())
    }

    fn set_background_color(&mut self, color: [f32; 4]) {
        self.background = color;
    }
}
