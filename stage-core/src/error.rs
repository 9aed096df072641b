//! Error types for stage operations.

use thiserror::Error;

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;

/// Errors that can occur while building primitives or routing screens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// A color did not have exactly four channels in `0..=255`.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Fewer than three distinct vertices remained after sanitization.
    #[error("Primitive needs at least 3 distinct vertices, got {0}")]
    InsufficientVertices(usize),

    /// A scale was requested with a zero factor on either axis.
    #[error("Cannot scale by zero (x factor {x}, y factor {y})")]
    ZeroScaleFactor {
        /// Requested x factor.
        x: f64,
        /// Requested y factor.
        y: f64,
    },

    /// A screen with this name is already registered.
    #[error("A screen named '{0}' already exists")]
    DuplicateScreenName(String),

    /// No screen with this name is registered.
    #[error("Screen '{0}' does not exist")]
    UnknownScreenName(String),

    /// A screen change was consumed while none was pending.
    #[error("Cannot change screen as no screen has been specified")]
    NoChangeSpecified,

    /// Input arrived before any screen was made active.
    #[error("No active screen to receive input")]
    NoActiveScreen,
}
