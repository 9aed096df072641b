//! Software backend rasterizing frames into a tiny-skia pixmap.
//!
//! Useful for screenshots and for checking what a frame looks like without
//! a GPU. Polygons are filled with the non-zero winding rule and blended
//! source-over, so alpha 0 leaves the background untouched.

use std::path::Path;

use stage_core::{DrawCommand, Frame, Vertex};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// tiny-skia software renderer.
pub struct RasterBackend {
    pixmap: Pixmap,
    background: [f32; 4],
    anti_alias: bool,
}

impl RasterBackend {
    /// Create a backend with a `width` x `height` pixmap.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self {
            pixmap: Self::allocate(width, height)?,
            background: [0.0, 0.0, 0.0, 1.0],
            anti_alias: true,
        })
    }

    fn allocate(width: u32, height: u32) -> RenderResult<Pixmap> {
        Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Surface(format!("cannot allocate a {width}x{height} pixmap"))
        })
    }

    /// Enable or disable edge anti-aliasing.
    #[must_use]
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    fn skia_color(color: [f32; 4]) -> RenderResult<tiny_skia::Color> {
        let [r, g, b, a] = color;
        tiny_skia::Color::from_rgba(r, g, b, a)
            .ok_or_else(|| RenderError::Frame(format!("color {color:?} is not normalized")))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn fill_polygon(&mut self, vertices: &[Vertex], color: [f32; 4]) -> RenderResult<()> {
        // Pixmap rows run top-down; rendering space runs bottom-up.
        let height = self.pixmap.height() as f32;
        let to_pixmap = |v: &Vertex| (v.x as f32, height - v.y as f32);

        let mut points = vertices.iter().map(to_pixmap);
        let Some((x, y)) = points.next() else {
            return Ok(());
        };

        let mut builder = PathBuilder::new();
        builder.move_to(x, y);
        for (x, y) in points {
            builder.line_to(x, y);
        }
        builder.close();

        let Some(path) = builder.finish() else {
            tracing::trace!("Skipping degenerate polygon");
            return Ok(());
        };

        let mut paint = Paint::default();
        paint.set_color(Self::skia_color(color)?);
        paint.anti_alias = self.anti_alias;

        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }

    /// Un-premultiplied RGBA at pixel `(x, y)`, counted from the top-left.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Pixmap width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Pixmap height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Encode the last rendered frame as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(e.to_string()))
    }

    /// Write the last rendered frame to `path` as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        self.pixmap
            .save_png(path)
            .map_err(|e| RenderError::Export(format!("{}: {e}", path.display())))?;
        tracing::debug!("Saved frame to {}", path.display());
        Ok(())
    }
}

impl RenderBackend for RasterBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Raster
    }

    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        let clear = Self::skia_color(frame.clear_color().unwrap_or(self.background))?;
        self.pixmap.fill(clear);

        for command in frame.commands() {
            match command {
                DrawCommand::FillPolygon { vertices, color } => {
                    self.fill_polygon(vertices, *color)?;
                }
            }
        }

        tracing::trace!(
            "Raster render: {} commands into {}x{}",
            frame.len(),
            self.width(),
            self.height()
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.pixmap = Self::allocate(width, height)?;
        tracing::debug!("Raster resized to {}x{}", width, height);
        Ok(())
    }

    fn set_background_color(&mut self, color: [f32; 4]) {
        self.background = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stage_core::{Color, Shape};

    fn frame_with(shapes: &[(Shape, Color)], height: f64) -> Frame {
        let mut frame = Frame::new();
        frame.clear(Color::BLACK);
        for (shape, color) in shapes {
            shape
                .into_primitive(*color, height)
                .expect("valid shape")
                .draw(&mut frame);
        }
        frame
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            RasterBackend::new(0, 10),
            Err(RenderError::Surface(_))
        ));
    }

    #[test]
    fn test_rectangle_lands_where_described() {
        let mut backend = RasterBackend::new(100, 100)
            .expect("pixmap")
            .with_anti_alias(false);
        let frame = frame_with(
            &[(
                Shape::rectangle(10.0, 10.0, 30.0, 20.0),
                Color::new(255, 0, 0, 255),
            )],
            100.0,
        );
        backend.render(&frame).expect("render");

        // Input space and pixmap rows are both top-down.
        assert_eq!(backend.pixel(20, 15), Some([255, 0, 0, 255]));
        assert_eq!(backend.pixel(20, 85), Some([0, 0, 0, 255]));
        assert_eq!(backend.pixel(50, 15), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_alpha_blending() {
        let mut backend = RasterBackend::new(40, 40)
            .expect("pixmap")
            .with_anti_alias(false);
        let frame = frame_with(
            &[
                (
                    Shape::rectangle(0.0, 0.0, 40.0, 40.0),
                    Color::new(0, 0, 255, 255),
                ),
                (
                    Shape::rectangle(0.0, 0.0, 20.0, 40.0),
                    Color::new(255, 0, 0, 0),
                ),
                (
                    Shape::rectangle(20.0, 0.0, 20.0, 40.0),
                    Color::new(255, 0, 0, 128),
                ),
            ],
            40.0,
        );
        backend.render(&frame).expect("render");

        // Fully transparent leaves the blue underneath.
        assert_eq!(backend.pixel(10, 20), Some([0, 0, 255, 255]));

        // Half-transparent red over blue mixes both.
        let [r, g, b, a] = backend.pixel(30, 20).expect("in bounds");
        assert!((120..=135).contains(&r), "red {r}");
        assert_eq!(g, 0);
        assert!((120..=135).contains(&b), "blue {b}");
        assert_eq!(a, 255);
    }

    #[test]
    fn test_background_used_without_clear() {
        let mut backend = RasterBackend::new(4, 4).expect("pixmap");
        backend.set_background_color([0.0, 1.0, 0.0, 1.0]);
        backend.render(&Frame::new()).expect("render");
        assert_eq!(backend.pixel(0, 0), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut backend = RasterBackend::new(4, 4).expect("pixmap");
        backend.resize(8, 2).expect("resize");
        assert_eq!((backend.width(), backend.height()), (8, 2));
        assert!(backend.resize(0, 0).is_err());
    }
}
