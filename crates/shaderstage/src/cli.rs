use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use renderer::{Antialiasing, PointerSpace};

#[derive(Parser, Debug)]
#[command(
    name = "shaderstage",
    author,
    version,
    about = "Render WGSL shader passes fed by a typed uniform registry"
)]
pub struct Cli {
    /// Stage description (TOML). A built-in gradient stage is used when omitted.
    #[arg(long, short = 'c', value_name = "PATH", env = "SHADERSTAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Optional FPS cap (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Space of the pointer uniform: `raw`, `normalized`, or `device`.
    #[arg(long, value_name = "SPACE", value_parser = parse_pointer_space)]
    pub pointer_space: Option<PointerSpace>,

    /// Attach orbit controls to the camera.
    #[arg(long)]
    pub orbit: bool,

    /// Render a still frame at this timestamp (e.g. `1.5s`) instead of animating.
    #[arg(long, value_name = "DURATION", value_parser = parse_still_time)]
    pub still_time: Option<Duration>,

    /// Validate the stage and its shader passes, then exit without opening a window.
    #[arg(long)]
    pub validate: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;
            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }
            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_pointer_space(value: &str) -> Result<PointerSpace, String> {
    value
        .parse::<PointerSpace>()
        .map_err(|err| format!("{err}; expected raw, normalized, or device"))
}

pub fn parse_still_time(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value.trim())
        .map_err(|err| format!("invalid duration '{value}': {err}"))
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32)> {
    let (width, height) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WxH format, e.g. 1280x720"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        bail!("surface dimensions must be greater than zero");
    }
    Ok((width, height))
}
