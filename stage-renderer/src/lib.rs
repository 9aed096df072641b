//! # Stage Renderer
//!
//! Turns the [`Frame`]s produced by `stage-core` into pixels.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            RenderBackend Trait              │
//! ├─────────────┬─────────────┬─────────────────┤
//! │ wgpu        │ tiny-skia   │ Headless        │
//! │ (window)    │ (pixmap)    │ (trace only)    │
//! └─────────────┴─────────────┴─────────────────┘
//! ```
//!
//! [`Renderer::new`] has no window to draw into, so a preferred GPU backend
//! falls back to the raster backend, and from there to headless.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;

pub use backend::headless::HeadlessBackend;
#[cfg(feature = "raster")]
pub use backend::raster::RasterBackend;
#[cfg(feature = "gpu")]
pub use backend::wgpu::WgpuBackend;
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};

use stage_core::Frame;

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Preferred backend (will fall back if unavailable).
    pub preferred_backend: BackendType,
    /// Enable anti-aliasing where the backend supports it.
    pub anti_aliasing: bool,
    /// Background color (RGBA) for frames that do not clear themselves.
    pub background_color: [f32; 4],
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Gpu,
            anti_aliasing: true,
            background_color: [0.0, 0.0, 0.0, 1.0],
            width: 800,
            height: 600,
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// wgpu on a window surface.
    Gpu,
    /// tiny-skia software rasterizer.
    Raster,
    /// No output; commands are only traced.
    Headless,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable backend is available.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        let mut backend = Self::create_backend(&config)?;
        backend.set_background_color(config.background_color);

        Ok(Self {
            config,
            backend,
            frame_count: 0,
        })
    }

    /// Wrap an already constructed backend, such as a window-bound
    /// [`WgpuBackend`].
    #[must_use]
    pub fn with_backend(config: RendererConfig, mut backend: Box<dyn RenderBackend>) -> Self {
        backend.set_background_color(config.background_color);
        Self {
            config,
            backend,
            frame_count: 0,
        }
    }

    /// Create the appropriate backend based on config and availability.
    fn create_backend(config: &RendererConfig) -> RenderResult<Box<dyn RenderBackend>> {
        match config.preferred_backend {
            BackendType::Gpu => {
                tracing::warn!("GPU backend needs a window, falling back to raster");
                Self::create_backend(&RendererConfig {
                    preferred_backend: BackendType::Raster,
                    ..config.clone()
                })
            }
            BackendType::Raster => {
                #[cfg(feature = "raster")]
                {
                    match RasterBackend::new(config.width, config.height) {
                        Ok(b) => return Ok(Box::new(b.with_anti_alias(config.anti_aliasing))),
                        Err(e) => {
                            tracing::warn!("Raster backend unavailable, falling back: {}", e);
                        }
                    }
                }
                Self::create_backend(&RendererConfig {
                    preferred_backend: BackendType::Headless,
                    ..config.clone()
                })
            }
            BackendType::Headless => Ok(Box::new(HeadlessBackend::new(
                config.width,
                config.height,
            ))),
        }
    }

    /// Render a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        self.backend.render(frame)?;
        self.frame_count += 1;
        Ok(())
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)?;
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }
}
