//! Mood-grouped color pools the palette draft picks from.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::palette::Rgb;
use crate::random::SeededRandom;

/// Night blues, bruised reds, and near-blacks.
pub const DARK_POOL: [u32; 8] = [
    0x0B0C10, 0x1A1A2E, 0x16213E, 0x2C2C34, 0x3D0C11, 0x1B262C, 0x2D132C, 0x0F3057,
];

/// Saturated accents.
pub const VIBRANT_POOL: [u32; 10] = [
    0xE94560, 0xFF6B35, 0xF7B801, 0x00A8E8, 0x7B2CBF, 0x06D6A0, 0xEF476F, 0xFFD166, 0x118AB2,
    0xFF006E,
];

/// Paper whites and pale tints.
pub const LIGHT_POOL: [u32; 8] = [
    0xF4F1DE, 0xEAE2B7, 0xF1FAEE, 0xFDF0D5, 0xE0FBFC, 0xFFF8E7, 0xEDE7E3, 0xF8EDEB,
];

/// Mood group of a pool.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mood {
    Dark,
    Vibrant,
    Light,
}

/// The three pools a palette is drafted from. Every pool is non-empty.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMoodPools"))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoodPools {
    pub(crate) dark: Vec<Rgb>,
    pub(crate) vibrant: Vec<Rgb>,
    pub(crate) light: Vec<Rgb>,
}

/// Unchecked serde form of [`MoodPools`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawMoodPools {
    dark: Vec<Rgb>,
    vibrant: Vec<Rgb>,
    light: Vec<Rgb>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMoodPools> for MoodPools {
    type Error = Error;

    fn try_from(raw: RawMoodPools) -> Result<Self> {
        let pools = Self {
            dark: raw.dark,
            vibrant: raw.vibrant,
            light: raw.light,
        };
        pools.validate()?;
        Ok(pools)
    }
}

impl MoodPools {
    /// Builds pools from `#RRGGBB` strings.
    pub fn from_hex(dark: &[&str], vibrant: &[&str], light: &[&str]) -> Result<Self> {
        let parse = |mood: Mood, list: &[&str]| -> Result<Vec<Rgb>> {
            if list.is_empty() {
                return Err(Error::InvalidConfig(format!("{mood:?} pool is empty")));
            }
            list.iter().map(|s| Rgb::from_hex(s)).collect()
        };
        Ok(Self {
            dark: parse(Mood::Dark, dark)?,
            vibrant: parse(Mood::Vibrant, vibrant)?,
            light: parse(Mood::Light, light)?,
        })
    }

    /// Rejects pools with no colors.
    pub fn validate(&self) -> Result<()> {
        for mood in [Mood::Dark, Mood::Vibrant, Mood::Light] {
            if self.pool(mood).is_empty() {
                return Err(Error::InvalidConfig(format!("{mood:?} pool is empty")));
            }
        }
        Ok(())
    }

    /// Colors in the pool for `mood`.
    pub fn pool(&self, mood: Mood) -> &[Rgb] {
        match mood {
            Mood::Dark => &self.dark,
            Mood::Vibrant => &self.vibrant,
            Mood::Light => &self.light,
        }
    }

    /// Draws one color from the pool for `mood`, consuming one value from `rng`.
    ///
    /// The pool must be non-empty; see [`MoodPools::validate`].
    pub fn pick(&self, mood: Mood, rng: &mut SeededRandom) -> Rgb {
        let pool = self.pool(mood);
        pool[rng.next_index(pool.len())]
    }
}

impl Default for MoodPools {
    fn default() -> Self {
        Self {
            dark: DARK_POOL.iter().map(|&c| Rgb::from_u32(c)).collect(),
            vibrant: VIBRANT_POOL.iter().map(|&c| Rgb::from_u32(c)).collect(),
            light: LIGHT_POOL.iter().map(|&c| Rgb::from_u32(c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pools_have_expected_sizes() {
        let pools = MoodPools::default();
        assert_eq!(pools.pool(Mood::Dark).len(), 8);
        assert_eq!(pools.pool(Mood::Vibrant).len(), 10);
        assert_eq!(pools.pool(Mood::Light).len(), 8);
    }

    #[test]
    fn dark_pool_is_darker_than_light_pool() {
        let luma = |c: &Rgb| c.0.iter().map(|&v| v as u32).sum::<u32>();
        let pools = MoodPools::default();
        let darkest_light = pools.pool(Mood::Light).iter().map(luma).min();
        let brightest_dark = pools.pool(Mood::Dark).iter().map(luma).max();
        assert!(brightest_dark < darkest_light);
    }

    #[test]
    fn custom_pools_parse_and_reject_empty() {
        let pools = MoodPools::from_hex(&["#000000"], &["#FF0000", "#00FF00"], &["#FFFFFF"])
            .expect("valid pools");
        assert_eq!(pools.pool(Mood::Vibrant)[1], Rgb::new(0, 255, 0));

        let err = MoodPools::from_hex(&[], &["#FF0000"], &["#FFFFFF"]).expect_err("empty");
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("Dark")));
        assert!(MoodPools::from_hex(&["#000"], &["#FF0000"], &["#FFFFFF"]).is_err());
    }

    #[test]
    fn single_color_pool_always_picks_it() {
        let pools =
            MoodPools::from_hex(&["#111111"], &["#222222"], &["#333333"]).expect("valid pools");
        let mut rng = SeededRandom::new("single");
        for _ in 0..32 {
            assert_eq!(pools.pick(Mood::Dark, &mut rng), Rgb::new(17, 17, 17));
        }
    }

    #[test]
    fn validate_rejects_each_empty_pool() {
        assert!(MoodPools::default().validate().is_ok());
        let mut pools = MoodPools::default();
        pools.light.clear();
        let err = pools.validate().expect_err("empty light pool");
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("Light")));
    }

    #[cfg(feature = "json")]
    #[test]
    fn deserializing_empty_pool_is_rejected() {
        let json = r#"{"dark":[],"vibrant":[[1,2,3]],"light":[[4,5,6]]}"#;
        let err = serde_json::from_str::<MoodPools>(json).expect_err("empty dark pool");
        assert!(err.to_string().contains("Dark pool is empty"));

        let json = r#"{"dark":[[7,8,9]],"vibrant":[[1,2,3]],"light":[[4,5,6]]}"#;
        let pools: MoodPools = serde_json::from_str(json).expect("valid pools");
        assert_eq!(pools.pool(Mood::Dark), &[Rgb::new(7, 8, 9)]);
    }
}
