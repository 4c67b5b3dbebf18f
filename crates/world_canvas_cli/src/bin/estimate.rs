use anyhow::bail;
use world_canvas::prelude::*;
use world_canvas_cli::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args().skip(1);
    let (Some(timestamp), None) = (args.next(), args.next()) else {
        bail!("usage: estimate <RFC 3339 timestamp>");
    };

    let params = WorldParameters::estimate_offline(&timestamp)?;
    println!("{}", params.to_json_pretty()?);
    Ok(())
}
