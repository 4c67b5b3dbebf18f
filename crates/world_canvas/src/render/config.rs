//! Render configuration: output size, chunking, and byte conversion.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::DEFAULT_WARP_OFFSET;

/// On-screen preview size, `(width, height)` in pixels.
pub const PREVIEW_SIZE: (u32, u32) = (1240, 1754);
/// Print export size, `(width, height)` in pixels.
pub const EXPORT_SIZE: (u32, u32) = (4960, 7016);
/// Rows rendered between scheduler yields.
pub const DEFAULT_ROWS_PER_CHUNK: u32 = 150;

/// How a shaded channel outside `0..=255` becomes a byte.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelOverflow {
    /// Clamp to `[0, 255]` and round half to even, like a canvas pixel buffer.
    #[default]
    Clamp,
    /// Truncate toward zero and reduce modulo 256, like a plain byte array.
    Wrap,
}

impl ChannelOverflow {
    /// Converts a shaded channel value to a byte.
    #[inline]
    pub fn to_byte(self, v: f64) -> u8 {
        match self {
            ChannelOverflow::Clamp => v.clamp(0.0, 255.0).round_ties_even() as u8,
            ChannelOverflow::Wrap => (v.trunc() as i64).rem_euclid(256) as u8,
        }
    }
}

/// Configuration for a synthesis run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Rows rendered per scheduler chunk.
    pub rows_per_chunk: u32,
    /// Byte conversion for shaded channels.
    pub channel_overflow: ChannelOverflow,
    /// Offset between the two warp reads.
    pub warp_offset: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::preview()
    }
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`] with the specified output size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rows_per_chunk: DEFAULT_ROWS_PER_CHUNK,
            channel_overflow: ChannelOverflow::default(),
            warp_offset: DEFAULT_WARP_OFFSET,
        }
    }

    /// Preview size preset.
    pub fn preview() -> Self {
        Self::new(PREVIEW_SIZE.0, PREVIEW_SIZE.1)
    }

    /// Export size preset. Same algorithm, four times the linear resolution.
    pub fn export() -> Self {
        Self::new(EXPORT_SIZE.0, EXPORT_SIZE.1)
    }

    /// Sets the rows per chunk.
    pub fn with_rows_per_chunk(mut self, rows_per_chunk: u32) -> Self {
        self.rows_per_chunk = rows_per_chunk;
        self
    }

    /// Sets the channel byte conversion.
    pub fn with_channel_overflow(mut self, channel_overflow: ChannelOverflow) -> Self {
        self.channel_overflow = channel_overflow;
        self
    }

    /// Sets the warp read offset.
    pub fn with_warp_offset(mut self, warp_offset: f64) -> Self {
        self.warp_offset = warp_offset;
        self
    }

    /// Number of pixels in the output.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(
                "width and height must be > 0".into(),
            ));
        }
        if self.rows_per_chunk == 0 {
            return Err(Error::InvalidConfig("rows_per_chunk must be > 0".into()));
        }
        if !self.warp_offset.is_finite() {
            return Err(Error::InvalidConfig("warp_offset must be finite".into()));
        }
        let bytes = self.pixel_count().checked_mul(4);
        if bytes.and_then(|b| usize::try_from(b).ok()).is_none() {
            return Err(Error::InvalidConfig(format!(
                "{}x{} raster does not fit in memory",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
