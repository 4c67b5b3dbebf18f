use anyhow::Context;
use tracing::info;
use world_canvas::prelude::*;
use world_canvas_cli::{init_tracing, log_progress, write_png, RenderArgs};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = RenderArgs::parse(std::env::args().skip(1))?;

    let params = WorldParameters::from_json_file(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!("Rendering world state from {}.", params.timestamp);

    let scheduler = RenderScheduler::from_config(&args.config);
    let mut sink = FnSink::new(log_progress);
    let result = scheduler.run_with_events(&params, &args.config, &mut sink, None)?;

    write_png(&result.raster, &args.output)?;
    println!("{}", result.palette);
    Ok(())
}
