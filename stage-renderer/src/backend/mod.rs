//! Rendering backend implementations.

pub mod headless;
#[cfg(feature = "raster")]
pub mod raster;
#[cfg(feature = "gpu")]
pub mod wgpu;

use stage_core::Frame;

use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
///
/// A backend receives one [`Frame`] per redraw. Vertices are in rendering
/// space: pixels from the bottom-left corner of the surface.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Render a frame.
    ///
    /// Frames without a clear color are drawn over the backend's background.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, frame: &Frame) -> RenderResult<()>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Set the color used when a frame does not clear itself.
    fn set_background_color(&mut self, color: [f32; 4]);
}
