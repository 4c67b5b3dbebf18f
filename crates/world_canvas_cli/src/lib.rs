#![forbid(unsafe_code)]
//! Shared helpers for the world_canvas command-line tools.

mod args;
mod output;

pub use args::{parse_size, RenderArgs};
pub use output::{log_progress, write_png};

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
