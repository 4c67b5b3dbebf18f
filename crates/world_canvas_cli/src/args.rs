use std::path::PathBuf;

use anyhow::{bail, Context};
use world_canvas::prelude::*;

const USAGE: &str =
    "usage: render <world_data.json> <out.png> [--export] [--size WxH] [--wrap] [--chunk N]";

/// Parsed arguments of the `render` tool.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: RenderConfig,
}

impl RenderArgs {
    /// Parses arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positional = Vec::new();
        let mut export = false;
        let mut size = None;
        let mut rows_per_chunk = None;
        let mut overflow = ChannelOverflow::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--export" => export = true,
                "--size" => {
                    let value = args.next().context("--size needs a value")?;
                    size = Some(parse_size(&value)?);
                }
                "--wrap" => overflow = ChannelOverflow::Wrap,
                "--chunk" => {
                    let value = args.next().context("--chunk needs a value")?;
                    let rows = value
                        .parse::<u32>()
                        .with_context(|| format!("invalid --chunk '{value}'"))?;
                    rows_per_chunk = Some(rows);
                }
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with("--") => bail!("unknown flag '{flag}'\n{USAGE}"),
                _ => positional.push(arg),
            }
        }

        // An explicit size beats the preset, wherever the flags appear.
        let mut config = if export {
            RenderConfig::export()
        } else {
            RenderConfig::preview()
        }
        .with_channel_overflow(overflow);
        if let Some((width, height)) = size {
            config.width = width;
            config.height = height;
        }
        if let Some(rows) = rows_per_chunk {
            config = config.with_rows_per_chunk(rows);
        }

        let [input, output]: [String; 2] = positional
            .try_into()
            .map_err(|_| anyhow::anyhow!(USAGE))?;
        config.validate()?;
        Ok(Self {
            input: input.into(),
            output: output.into(),
            config,
        })
    }
}

/// Parses `WIDTHxHEIGHT`.
pub fn parse_size(value: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .with_context(|| format!("size '{value}' is not WIDTHxHEIGHT"))?;
    let w = w.trim().parse().with_context(|| format!("bad width in '{value}'"))?;
    let h = h.trim().parse().with_context(|| format!("bad height in '{value}'"))?;
    Ok((w, h))
}
