//! Event types and sinks for observing generation runs.
//!
//! This module defines [`RenderEvent`] and a set of sinks to emit, collect, or forward
//! events while a [`crate::render::scheduler::RenderScheduler`] drives synthesis. Chunk
//! events double as the scheduler's yield points: a host that needs to stay responsive
//! does its own work inside [`EventSink::send`].
use std::time::Duration;

use crate::palette::Palette;
use crate::params::RunParameters;

/// Describes events emitted during a generation run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// Emitted once the synthesizer is built, before any row is rendered.
    RunStarted {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
        /// Derived zoom, distortion, and grain.
        run: RunParameters,
        /// Number of chunks the rows are split into.
        total_chunks: u32,
    },

    /// Emitted after the palette draft.
    PaletteDrafted {
        /// The drafted palette.
        palette: Palette,
    },

    /// Emitted after each chunk of rows.
    ChunkFinished {
        /// Zero-based chunk index.
        index: u32,
        /// Rows rendered so far.
        rows_completed: u32,
        /// Rows in the output.
        total_rows: u32,
    },

    /// Emitted when the raster is complete.
    RunFinished {
        /// Wall-clock time spent rendering.
        elapsed: Duration,
        /// Pixels written.
        pixels: u64,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. config field).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`RenderEvent`], used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderEventKind {
    RunStarted,
    PaletteDrafted,
    ChunkFinished,
    RunFinished,
    Warning,
}

impl RenderEvent {
    pub fn kind(&self) -> RenderEventKind {
        match self {
            RenderEvent::RunStarted { .. } => RenderEventKind::RunStarted,
            RenderEvent::PaletteDrafted { .. } => RenderEventKind::PaletteDrafted,
            RenderEvent::ChunkFinished { .. } => RenderEventKind::ChunkFinished,
            RenderEvent::RunFinished { .. } => RenderEventKind::RunFinished,
            RenderEvent::Warning { .. } => RenderEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`RenderEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: RenderEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: RenderEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = RenderEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: RenderEvent) {}

    #[inline]
    fn wants(&self, _kind: RenderEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(RenderEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(RenderEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(RenderEvent),
{
    #[inline]
    fn send(&mut self, event: RenderEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<RenderEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<RenderEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[RenderEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of a single kind, in emission order.
    pub fn of_kind(&self, kind: RenderEventKind) -> impl Iterator<Item = &RenderEvent> {
        self.events.iter().filter(move |e| e.kind() == kind)
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: RenderEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: RenderEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            if sink.wants(event.kind()) {
                sink.send(event.clone());
            }
        }
        if last.wants(event.kind()) {
            last.send(event);
        }
    }

    fn wants(&self, kind: RenderEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
