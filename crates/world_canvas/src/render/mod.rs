//! Raster synthesis and its drivers.
//!
//! - [`synth`] renders pixels row by row from a prepared noise field and palette.
//! - [`scheduler`] drives a synthesizer in chunks, reporting [`events`] and honouring
//!   cancellation.
//! - [`config`] holds output size and byte conversion; [`raster`] is the RGBA buffer.
//!
//! [`synthesize`] is the one-call entry point.
use tracing::instrument;

use crate::error::Result;
use crate::palette::Palette;
use crate::params::WorldParameters;

pub mod config;
pub mod events;
pub mod raster;
pub mod scheduler;
pub mod synth;

use config::RenderConfig;
use raster::Raster;
use scheduler::RenderScheduler;

/// Output of one generation.
#[derive(Clone, Debug)]
pub struct GenerationResult {
    /// The record the image was generated from.
    pub params: WorldParameters,
    /// The five drafted colors.
    pub palette: Palette,
    /// Row-major RGBA pixels.
    pub raster: Raster,
}

/// Generates a `width` x `height` image from `params` with default settings.
///
/// Same parameters and size always yield a byte-identical raster.
pub fn synthesize(params: &WorldParameters, width: u32, height: u32) -> Result<GenerationResult> {
    synthesize_with_config(params, &RenderConfig::new(width, height))
}

/// Generates an image with an explicit [`RenderConfig`].
#[instrument(level = "debug", skip_all, fields(width = config.width, height = config.height))]
pub fn synthesize_with_config(
    params: &WorldParameters,
    config: &RenderConfig,
) -> Result<GenerationResult> {
    RenderScheduler::from_config(config).run(params, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::palette::Rgb;
    use crate::render::config::ChannelOverflow;

    const GOLDEN_CLAMP: &[u8] = include_bytes!("../testdata/scenario_10x10.rgba");
    const GOLDEN_WRAP: &[u8] = include_bytes!("../testdata/scenario_10x10_wrap.rgba");

    fn scenario() -> WorldParameters {
        WorldParameters::new("2025-01-01T00:00:00Z", 0.8, 0.5, 0.7, 0.5, 0.5)
    }

    #[test]
    fn scenario_matches_golden_raster() {
        let result = synthesize(&scenario(), 10, 10).expect("generate");
        assert_eq!(result.raster.size(), (10, 10));
        assert_eq!(result.raster.as_bytes().len(), 400);
        assert_eq!(&result.raster.as_bytes()[..8], &[0xeb, 0xe3, 0xb8, 0xff, 0xeb, 0xe3, 0xb8, 0xff]);
        assert_eq!(result.raster.as_bytes(), GOLDEN_CLAMP);
    }

    #[test]
    fn scenario_matches_golden_raster_with_wrapping() {
        let config = RenderConfig::new(10, 10).with_channel_overflow(ChannelOverflow::Wrap);
        let result = synthesize_with_config(&scenario(), &config).expect("generate");
        assert_eq!(result.raster.as_bytes(), GOLDEN_WRAP);
    }

    #[test]
    fn scenario_palette_and_params_are_returned() {
        let result = synthesize(&scenario(), 3, 2).expect("generate");
        assert_eq!(result.params, scenario());
        assert_eq!(
            result.palette.colors(),
            &[
                Rgb::new(15, 48, 87),
                Rgb::new(0, 168, 232),
                Rgb::new(234, 226, 183),
                Rgb::new(255, 209, 102),
                Rgb::new(123, 44, 191),
            ]
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let a = synthesize(&scenario(), 31, 17).expect("generate");
        let b = synthesize(&scenario(), 31, 17).expect("generate");
        assert_eq!(a.raster, b.raster);
        assert_eq!(a.palette, b.palette);
    }

    #[test]
    fn timestamp_changes_the_image() {
        let mut other = scenario();
        other.timestamp = "2025-01-02T00:00:00Z".into();
        let a = synthesize(&scenario(), 10, 10).expect("generate");
        let b = synthesize(&other, 10, 10).expect("generate");
        assert_ne!(a.raster, b.raster);
    }

    #[test]
    fn single_pixel_output() {
        let result = synthesize(&scenario(), 1, 1).expect("generate");
        assert_eq!(result.raster.get(0, 0), Some([0xeb, 0xe3, 0xb8, 0xff]));
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            synthesize(&scenario(), 0, 10),
            Err(Error::InvalidConfig(_))
        ));
        let mut bad = scenario();
        bad.timestamp = "yesterday".into();
        assert!(matches!(
            synthesize(&bad, 10, 10),
            Err(Error::InvalidInput(_))
        ));
    }
}
