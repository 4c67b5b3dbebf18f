//! Chunked driver for long synthesis runs.
//!
//! [`RenderScheduler`] renders a fixed number of rows at a time and hands control to the
//! event sink between chunks, so an export-size run (tens of millions of pixels) never
//! blocks its host for the whole duration. A [`CancelToken`] is checked at the same
//! points; a cancelled run yields no raster at all.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::params::WorldParameters;
use crate::render::config::{ChannelOverflow, RenderConfig, DEFAULT_ROWS_PER_CHUNK};
use crate::render::events::{EventSink, RenderEvent, RenderEventKind};
use crate::render::synth::Synthesizer;
use crate::render::GenerationResult;

/// Shared flag that asks a running generation to stop at its next chunk boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives a [`Synthesizer`] in row chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderScheduler {
    rows_per_chunk: u32,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self {
            rows_per_chunk: DEFAULT_ROWS_PER_CHUNK,
        }
    }
}

impl RenderScheduler {
    /// Creates a scheduler yielding every `rows_per_chunk` rows. Zero is raised to one.
    pub fn new(rows_per_chunk: u32) -> Self {
        if rows_per_chunk == 0 {
            warn!("rows_per_chunk is 0; using 1.");
        }
        Self {
            rows_per_chunk: rows_per_chunk.max(1),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.rows_per_chunk)
    }

    pub fn rows_per_chunk(&self) -> u32 {
        self.rows_per_chunk
    }

    /// Runs a full generation without observing it.
    pub fn run(&self, params: &WorldParameters, config: &RenderConfig) -> Result<GenerationResult> {
        self.run_with_events(params, config, &mut (), None)
    }

    /// Runs a full generation, reporting progress to `sink` and honouring `cancel`.
    pub fn run_with_events(
        &self,
        params: &WorldParameters,
        config: &RenderConfig,
        sink: &mut dyn EventSink,
        cancel: Option<&CancelToken>,
    ) -> Result<GenerationResult> {
        let synth = Synthesizer::new(params.clone(), config.clone())?;
        self.drive(synth, sink, cancel)
    }

    /// Renders the remaining rows of `synth` chunk by chunk.
    pub fn drive(
        &self,
        mut synth: Synthesizer,
        sink: &mut dyn EventSink,
        cancel: Option<&CancelToken>,
    ) -> Result<GenerationResult> {
        let started = Instant::now();
        let (width, height) = (synth.config().width, synth.config().height);
        let total_chunks = height.div_ceil(self.rows_per_chunk);

        info!(
            "Generation started: {}x{} in {} chunks of {} rows.",
            width, height, total_chunks, self.rows_per_chunk
        );
        if sink.wants(RenderEventKind::RunStarted) {
            sink.send(RenderEvent::RunStarted {
                width,
                height,
                run: *synth.run_parameters(),
                total_chunks,
            });
        }
        if sink.wants(RenderEventKind::PaletteDrafted) {
            sink.send(RenderEvent::PaletteDrafted {
                palette: *synth.palette(),
            });
        }
        if synth.config().channel_overflow == ChannelOverflow::Wrap {
            warn!("Channel overflow set to wrap; saturated palette colors may invert.");
            if sink.wants(RenderEventKind::Warning) {
                sink.send(RenderEvent::Warning {
                    context: "config:channel_overflow".into(),
                    message: "Wrapping overflow may invert saturated palette colors".into(),
                });
            }
        }

        let mut index = 0;
        while !synth.is_finished() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                let rows_completed = synth.rows_completed();
                warn!("Generation cancelled after {} rows.", rows_completed);
                return Err(Error::Cancelled { rows_completed });
            }

            synth.render_rows(self.rows_per_chunk)?;

            if sink.wants(RenderEventKind::ChunkFinished) {
                sink.send(RenderEvent::ChunkFinished {
                    index,
                    rows_completed: synth.rows_completed(),
                    total_rows: height,
                });
            }
            index += 1;
        }

        let result = synth.finish()?;
        let elapsed = started.elapsed();
        let pixels = width as u64 * height as u64;
        info!("Generation finished: {} pixels in {:?}.", pixels, elapsed);
        if sink.wants(RenderEventKind::RunFinished) {
            sink.send(RenderEvent::RunFinished { elapsed, pixels });
        }
        Ok(result)
    }
}
