//! Colors, mood pools, and the five-slot palette draft.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod draft;
pub mod pools;

pub use draft::draft;
pub use pools::{Mood, MoodPools};

/// Number of colors in a drafted palette.
pub const PALETTE_SIZE: usize = 5;

/// An 8-bit RGB triple.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Unpacks a `0xRRGGBB` literal.
    pub const fn from_u32(hex: u32) -> Self {
        Self([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8])
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidConfig(format!(
                "'{s}' is not a #RRGGBB color"
            )));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|e| Error::InvalidConfig(format!("'{s}': {e}")))?;
        Ok(Self::from_u32(value))
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Ordered palette; index `i` colors quantization bucket `i`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette(pub [Rgb; PALETTE_SIZE]);

impl Palette {
    pub fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.0
    }

    /// Color for a bucket index. Indices past the end map to the last color.
    pub fn bucket(&self, index: usize) -> Rgb {
        self.0[index.min(PALETTE_SIZE - 1)]
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
