//! # Stage Core
//!
//! Core logic for full-screen interactive programs: a router that owns a
//! set of named screens, an input event model, and a small engine of 2D
//! filled-polygon primitives with geometric transforms.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  stage-core                 │
//! ├─────────────────────────────────────────────┤
//! │  App Router      │  Event Model             │
//! │  - Registry      │  - Mouse / key events    │
//! │  - Dispatch      │  - Modifier decoding     │
//! │  - Requests      │  - Processing filter     │
//! ├─────────────────────────────────────────────┤
//! │  Screens         │  Primitive Engine        │
//! │  - Draw / input  │  - Shapes                │
//! │  - Deferred      │  - Rotate / scale        │
//! │    change/close  │  - Translate / centre    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Drawing produces a [`Frame`], an ordered list of filled polygons in
//! rendering space, which a renderer crate turns into pixels.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod color;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod primitive;
pub mod screen;
pub mod shape;
pub mod widget;

pub use app::App;
pub use color::Color;
pub use error::{StageError, StageResult};
pub use event::{keys, Event, EventKind, Modifiers, MouseButtons};
pub use frame::{DrawCommand, Frame};
pub use geometry::{Bounds, Vertex};
pub use primitive::Primitive;
pub use screen::{Screen, ScreenRequests};
pub use shape::Shape;
pub use widget::{Button, Widget};

/// Stage core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
