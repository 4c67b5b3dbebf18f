use std::path::Path;

use anyhow::{anyhow, Context};
use image::RgbaImage;
use tracing::{info, warn};
use world_canvas::prelude::*;

/// Encodes `raster` as an RGBA PNG at `path`.
pub fn write_png(raster: &Raster, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let (width, height) = raster.size();
    let img = RgbaImage::from_raw(width, height, raster.as_bytes().to_vec())
        .ok_or_else(|| anyhow!("raster buffer does not match {width}x{height}"))?;
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}x{} PNG to {}.", width, height, path.display());
    Ok(())
}

/// Logs a render event at a level suited to an interactive terminal.
pub fn log_progress(event: RenderEvent) {
    match event {
        RenderEvent::RunStarted { run, .. } => info!(
            "zoom={:.5} distortion={:.1} grain={:.3}",
            run.zoom, run.distortion, run.grain_amount
        ),
        RenderEvent::PaletteDrafted { palette } => info!("palette {}", palette),
        RenderEvent::ChunkFinished {
            rows_completed,
            total_rows,
            ..
        } => info!(
            "{:>5.1}% ({}/{} rows)",
            rows_completed as f64 * 100.0 / total_rows.max(1) as f64,
            rows_completed,
            total_rows
        ),
        RenderEvent::RunFinished { elapsed, pixels } => {
            info!("Rendered {} pixels in {:.2?}.", pixels, elapsed)
        }
        RenderEvent::Warning { context, message } => warn!("{}: {}", context, message),
        _ => {}
    }
}
