#![forbid(unsafe_code)]
//! world_canvas: Deterministic procedural posters from normalized world-state signals.
//!
//! Modules:
//! - params: world-state record, timestamp parsing, derived run parameters
//! - signals: closed-form estimators for the offline-computable signals
//! - random: string-seeded deterministic random streams
//! - field: seeded simplex noise and domain warping
//! - palette: mood pools and the five-slot color draft
//! - render: raster synthesis, chunked scheduling, render events
//!
//! The whole pipeline is a pure function of [`params::WorldParameters`] and the output
//! dimensions; see [`render::synthesize`].
pub mod error;
pub mod field;
pub mod palette;
pub mod params;
pub mod random;
pub mod render;
pub mod signals;

/// Convenient re-exports for common types. Import with `use world_canvas::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{DomainWarp, NoiseField};
    pub use crate::palette::{draft, MoodPools, Palette, Rgb, PALETTE_SIZE};
    pub use crate::params::{RunParameters, Timestamp, WorldParameters};
    pub use crate::random::{seed_string, SeededRandom, StreamPurpose};
    pub use crate::render::config::{ChannelOverflow, RenderConfig};
    pub use crate::render::events::{
        EventSink, FnSink, MultiSink, RenderEvent, RenderEventKind, VecSink,
    };
    pub use crate::render::raster::Raster;
    pub use crate::render::scheduler::{CancelToken, RenderScheduler};
    pub use crate::render::synth::{bucket_index, Synthesizer};
    pub use crate::render::{synthesize, synthesize_with_config, GenerationResult};
}
