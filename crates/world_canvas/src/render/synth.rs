//! Per-pixel synthesis: warped noise, grain dither, palette quantization.
//!
//! A [`Synthesizer`] owns everything one generation needs: both random streams, the
//! noise field, the palette, and the raster under construction. Rows are rendered strictly
//! in order because the grain stream is consumed row-major; chunking the work changes
//! nothing about the result.
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::field::{DomainWarp, NoiseField};
use crate::palette::{draft::draft_from, MoodPools, Palette, PALETTE_SIZE};
use crate::params::{RunParameters, WorldParameters};
use crate::random::{SeededRandom, StreamPurpose};
use crate::render::config::RenderConfig;
use crate::render::raster::{Raster, CHANNELS};
use crate::render::GenerationResult;

/// Upper bounds of buckets 0..=3; anything above the last is bucket 4.
pub const BUCKET_THRESHOLDS: [f64; PALETTE_SIZE - 1] = [0.30, 0.50, 0.70, 0.85];

/// Grain is scaled by this before it is added to each color channel.
pub const GRAIN_CHANNEL_SCALE: f64 = 30.0;

/// Maps a dithered value to a palette index in `0..PALETTE_SIZE`.
#[inline]
pub fn bucket_index(value: f64) -> usize {
    BUCKET_THRESHOLDS
        .iter()
        .position(|&t| value < t)
        .unwrap_or(PALETTE_SIZE - 1)
        .min(PALETTE_SIZE - 1)
}

/// Incremental raster synthesizer for one generation.
pub struct Synthesizer {
    params: WorldParameters,
    config: RenderConfig,
    run: RunParameters,
    palette: Palette,
    field: NoiseField,
    warp: DomainWarp,
    grain_rng: SeededRandom,
    raster: Raster,
    next_row: u32,
}

impl Synthesizer {
    /// Validates the inputs and prepares streams, palette, and field.
    pub fn new(params: WorldParameters, config: RenderConfig) -> Result<Self> {
        Self::with_pools(params, config, &MoodPools::default())
    }

    /// Like [`Synthesizer::new`], drafting the palette from custom pools.
    pub fn with_pools(
        params: WorldParameters,
        config: RenderConfig,
        pools: &MoodPools,
    ) -> Result<Self> {
        params.validate()?;
        config.validate()?;
        pools.validate()?;

        let run = RunParameters::from_world(&params);

        let mut palette_rng = SeededRandom::for_purpose(&params, StreamPurpose::Palette);
        let palette = draft_from(
            pools,
            params.p_season,
            params.p_sentiment,
            params.p_entropy,
            &mut palette_rng,
        );

        let mut grain_rng = SeededRandom::for_purpose(&params, StreamPurpose::Canvas);
        let field = NoiseField::new(&mut grain_rng);
        let warp = DomainWarp::from_run(&run).with_offset(config.warp_offset);

        debug!(
            "Synthesizer ready: {}x{}, zoom={}, distortion={}, grain={}.",
            config.width, config.height, run.zoom, run.distortion, run.grain_amount
        );

        let raster = Raster::new(config.width, config.height);
        Ok(Self {
            params,
            config,
            run,
            palette,
            field,
            warp,
            grain_rng,
            raster,
            next_row: 0,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn run_parameters(&self) -> &RunParameters {
        &self.run
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Rows rendered so far.
    pub fn rows_completed(&self) -> u32 {
        self.next_row
    }

    pub fn total_rows(&self) -> u32 {
        self.config.height
    }

    pub fn is_finished(&self) -> bool {
        self.next_row >= self.config.height
    }

    /// Renders up to `max_rows` further rows and returns how many were rendered.
    pub fn render_rows(&mut self, max_rows: u32) -> Result<u32> {
        let end = self.next_row.saturating_add(max_rows).min(self.config.height);
        let start = self.next_row;
        for y in start..end {
            self.render_row(y)?;
            self.next_row = y + 1;
        }
        trace!("Rendered rows {}..{}.", start, end);
        Ok(end - start)
    }

    /// Renders all remaining rows.
    pub fn render_all(&mut self) -> Result<()> {
        self.render_rows(u32::MAX).map(|_| ())
    }

    /// Hands off the completed raster. Fails if rows remain.
    pub fn finish(self) -> Result<GenerationResult> {
        if !self.is_finished() {
            return Err(Error::Other(format!(
                "raster incomplete: {} of {} rows rendered",
                self.next_row, self.config.height
            )));
        }
        Ok(GenerationResult {
            params: self.params,
            palette: self.palette,
            raster: self.raster,
        })
    }

    fn render_row(&mut self, y: u32) -> Result<()> {
        let Self {
            config,
            run,
            palette,
            field,
            warp,
            grain_rng,
            raster,
            ..
        } = self;
        let overflow = config.channel_overflow;
        let row = raster.row_mut(y);
        let fy = y as f64;

        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let value = warp.evaluate(field, x as f64, fy)?;
            let grain = (grain_rng.next_f64() - 0.5) * run.grain_amount;
            let base = palette.bucket(bucket_index(value + grain));

            for (out, &channel) in px.iter_mut().zip(base.0.iter()) {
                *out = overflow.to_byte(channel as f64 + grain * GRAIN_CHANNEL_SCALE);
            }
            px[3] = u8::MAX;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::config::ChannelOverflow;

    fn params() -> WorldParameters {
        WorldParameters::new("2025-01-01T00:00:00Z", 0.8, 0.5, 0.7, 0.5, 0.5)
    }

    #[test]
    fn buckets_follow_thresholds() {
        assert_eq!(bucket_index(-0.2), 0);
        assert_eq!(bucket_index(0.0), 0);
        assert_eq!(bucket_index(0.2999), 0);
        assert_eq!(bucket_index(0.30), 1);
        assert_eq!(bucket_index(0.49), 1);
        assert_eq!(bucket_index(0.50), 2);
        assert_eq!(bucket_index(0.70), 3);
        assert_eq!(bucket_index(0.8499), 3);
        assert_eq!(bucket_index(0.85), 4);
        assert_eq!(bucket_index(1.3), 4);
        assert_eq!(bucket_index(f64::NAN), 4);
    }

    #[test]
    fn bucket_sweep_is_monotonic_and_covers_every_index() {
        let mut seen = [false; PALETTE_SIZE];
        let mut prev = 0;
        for k in 0..=10_000 {
            let idx = bucket_index(k as f64 / 10_000.0);
            assert!(idx < PALETTE_SIZE);
            assert!(idx >= prev, "bucket decreased at {k}");
            seen[idx] = true;
            prev = idx;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn render_rows_advances_in_order() {
        let mut synth = Synthesizer::new(params(), RenderConfig::new(4, 5)).expect("valid");
        assert_eq!(synth.total_rows(), 5);
        assert_eq!(synth.render_rows(2).expect("rows"), 2);
        assert_eq!(synth.rows_completed(), 2);
        assert_eq!(synth.render_rows(10).expect("rows"), 3);
        assert!(synth.is_finished());
        assert_eq!(synth.render_rows(1).expect("rows"), 0);
    }

    #[test]
    fn finish_refuses_partial_raster() {
        let mut synth = Synthesizer::new(params(), RenderConfig::new(4, 5)).expect("valid");
        synth.render_rows(3).expect("rows");
        assert!(synth.finish().is_err());
    }

    #[test]
    fn every_pixel_is_opaque() {
        let mut synth = Synthesizer::new(params(), RenderConfig::new(16, 9)).expect("valid");
        synth.render_all().expect("render");
        let result = synth.finish().expect("complete");
        assert!(result
            .raster
            .as_bytes()
            .chunks_exact(CHANNELS)
            .all(|px| px[3] == 255));
    }

    #[test]
    fn pixels_stay_near_their_palette_color() {
        let mut synth = Synthesizer::new(params(), RenderConfig::new(12, 12)).expect("valid");
        let palette = *synth.palette();
        synth.render_all().expect("render");
        let raster = synth.finish().expect("complete").raster;
        // |grain| * 30 < 0.075 * 30 at atmosphere 0.5.
        for px in raster.as_bytes().chunks_exact(CHANNELS) {
            let near = palette.colors().iter().any(|c| {
                c.0.iter()
                    .zip(px)
                    .all(|(&a, &b)| (a as i32 - b as i32).abs() <= 4)
            });
            assert!(near, "pixel {px:?} far from every palette color");
        }
    }

    #[test]
    fn wrap_mode_changes_only_overflowing_channels() {
        let config = RenderConfig::new(10, 10);
        let mut clamp = Synthesizer::new(params(), config.clone()).expect("valid");
        let mut wrap = Synthesizer::new(
            params(),
            config.with_channel_overflow(ChannelOverflow::Wrap),
        )
        .expect("valid");
        clamp.render_all().expect("render");
        wrap.render_all().expect("render");
        let a = clamp.finish().expect("complete").raster;
        let b = wrap.finish().expect("complete").raster;
        for (&ca, &cb) in a.as_bytes().iter().zip(b.as_bytes()) {
            let diff = (ca as i32 - cb as i32).abs();
            // Rounding vs truncation differs by one; wrapping jumps across the byte range.
            assert!(diff <= 1 || diff >= 250, "{ca} vs {cb}");
        }
    }

    #[test]
    fn invalid_inputs_fail_before_rendering() {
        let mut bad = params();
        bad.p_atmosphere = 2.0;
        assert!(matches!(
            Synthesizer::new(bad, RenderConfig::new(4, 4)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Synthesizer::new(params(), RenderConfig::new(0, 4)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_custom_pool_is_a_config_error() {
        let mut pools = MoodPools::default();
        pools.dark.clear();
        let err = Synthesizer::with_pools(params(), RenderConfig::new(2, 2), &pools)
            .err()
            .expect("empty pool rejected");
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("Dark")));
    }

    #[test]
    fn synthesizer_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Synthesizer>();
        assert_send::<GenerationResult>();
    }
}
