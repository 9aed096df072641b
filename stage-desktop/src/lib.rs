//! # Stage Desktop
//!
//! Native desktop host for Stage using winit + wgpu.
//!
//! Opens a window, turns winit input into router calls on a
//! [`stage_core::App`] and hands every redraw to a `stage-renderer` backend.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p stage-desktop -- --windowed --width 1024 --height 768
//! ```
//!
//! ## Without a GPU:
//!
//! ```bash
//! cargo run -p stage-desktop -- --backend raster --screenshot last-frame.png
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `DesktopConfig` - Window size, title, mode and renderer choice
//! - `DesktopHost` - Main application implementing `ApplicationHandler`
//! - `input` - winit key codes, buttons and modifiers in router terms
//! - `demo` - The screens the binary starts with

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod app;
pub mod demo;
pub mod input;

pub use app::{AppBuilder, DesktopHost};

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use stage_core::Color;
use stage_renderer::BackendType;

/// Renderer choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    /// wgpu on the window surface.
    Gpu,
    /// tiny-skia into an offscreen pixmap.
    Raster,
    /// Trace draw commands only.
    Headless,
}

impl From<BackendChoice> for BackendType {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Gpu => Self::Gpu,
            BackendChoice::Raster => Self::Raster,
            BackendChoice::Headless => Self::Headless,
        }
    }
}

fn parse_color(value: &str) -> Result<Color, String> {
    Color::from_hex(value).map_err(|e| e.to_string())
}

/// Command-line arguments for stage-desktop.
#[derive(Debug, Clone, Parser)]
#[command(name = "stage-desktop")]
#[command(about = "Stage screen host")]
#[command(version)]
pub struct CliArgs {
    /// Window width in pixels
    #[arg(long, env = "STAGE_WIDTH", default_value = "1280")]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, env = "STAGE_HEIGHT", default_value = "720")]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = "Stage")]
    pub title: String,

    /// Run in a window instead of borderless full screen
    #[arg(long, env = "STAGE_WINDOWED")]
    pub windowed: bool,

    /// Rendering backend
    #[arg(long, value_enum, env = "STAGE_BACKEND", default_value = "gpu")]
    pub backend: BackendChoice,

    /// Clear color as #rrggbb or #rrggbbaa
    #[arg(long, value_parser = parse_color, default_value = "#000000")]
    pub background: Color,

    /// Write the last frame here as PNG on exit
    #[arg(long)]
    pub screenshot: Option<PathBuf>,
}

/// Desktop application configuration.
#[derive(Debug, Clone)]
pub struct DesktopConfig {
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Windowed rather than full screen.
    pub windowed: bool,
    /// Preferred renderer.
    pub backend: BackendType,
    /// Router clear color.
    pub background: Color,
    /// PNG path for the last frame.
    pub screenshot: Option<PathBuf>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopConfig {
    /// Create a new desktop configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Stage".to_string(),
            windowed: false,
            backend: BackendType::Gpu,
            background: Color::BLACK,
            screenshot: None,
        }
    }
}

impl From<CliArgs> for DesktopConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            title: args.title,
            windowed: args.windowed,
            backend: args.backend.into(),
            background: args.background,
            screenshot: args.screenshot,
        }
    }
}
