//! RGBA colors shared by primitives and the frame clear color.

use serde::{Deserialize, Serialize};

use crate::{StageError, StageResult};

/// An 8-bit RGBA color.
///
/// Alpha 0 is fully transparent and 255 fully opaque. Every fallible
/// constructor rejects out-of-range input rather than clamping it, and
/// deserialization goes through the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "[u8; 4]")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from channels that are already known to be in range.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Validate a channel list.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InvalidColor`] if there are not exactly four
    /// channels or any channel falls outside `0..=255`.
    pub fn from_channels(channels: &[i64]) -> StageResult<Self> {
        if channels.len() != 4 {
            return Err(StageError::InvalidColor(format!(
                "expected 4 channels, got {}",
                channels.len()
            )));
        }

        let mut out = [0u8; 4];
        for (slot, &value) in out.iter_mut().zip(channels) {
            *slot = u8::try_from(value).map_err(|_| {
                StageError::InvalidColor(format!("channel value {value} is outside 0-255"))
            })?;
        }

        Ok(Self::from(out))
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InvalidColor`] for any other shape of input.
    pub fn from_hex(hex: &str) -> StageResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StageError::InvalidColor(format!(
                "'{hex}' is not #rrggbb or #rrggbbaa"
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| StageError::InvalidColor(format!("'{hex}' has a non-hex digit")))
        };

        let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// The four channels in `[r, g, b, a]` order.
    #[must_use]
    pub const fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels scaled to `0.0..=1.0` by dividing by 255.
    #[must_use]
    pub fn normalized(self) -> [f32; 4] {
        self.channels().map(|c| f32::from(c) / 255.0)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.channels()
    }
}

impl TryFrom<&[i64]> for Color {
    type Error = StageError;

    fn try_from(channels: &[i64]) -> StageResult<Self> {
        Self::from_channels(channels)
    }
}

impl TryFrom<Vec<i64>> for Color {
    type Error = StageError;

    fn try_from(channels: Vec<i64>) -> StageResult<Self> {
        Self::from_channels(&channels)
    }
}
