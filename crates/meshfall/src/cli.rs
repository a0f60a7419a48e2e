use std::path::PathBuf;

use clap::Parser;

use engine::BlendMode;

#[derive(Parser, Debug)]
#[command(
    name = "meshfall",
    author,
    version,
    about = "Animated mesh gradient renderer",
    arg_required_else_help = false
)]
pub struct Cli {
    /// First gradient stop (`#rrggbb`).
    #[arg(long, value_name = "HEX")]
    pub color1: Option<String>,

    /// Second gradient stop (`#rrggbb`).
    #[arg(long, value_name = "HEX")]
    pub color2: Option<String>,

    /// Third gradient stop (`#rrggbb`).
    #[arg(long, value_name = "HEX")]
    pub color3: Option<String>,

    /// Fourth gradient stop (`#rrggbb`).
    #[arg(long, value_name = "HEX")]
    pub color4: Option<String>,

    /// Time units added per frame.
    #[arg(long, value_name = "SPEED")]
    pub speed: Option<f32>,

    /// Spatial scale of the noise field; larger values zoom in.
    #[arg(long, value_name = "SCALE")]
    pub noise_scale: Option<f32>,

    /// Per-octave amplitude gain of the fractal sum.
    #[arg(long, value_name = "GAIN")]
    pub turbulence: Option<f32>,

    /// Number of noise octaves (1-5).
    #[arg(long, value_name = "COUNT")]
    pub octaves: Option<u32>,

    /// Per-octave frequency multiplier.
    #[arg(long, value_name = "FACTOR")]
    pub lacunarity: Option<f32>,

    /// Weight of the trigonometric mesh term over the fractal noise (0-1).
    #[arg(long, value_name = "WEIGHT")]
    pub mesh_intensity: Option<f32>,

    /// Blend mode name (`normal`, `multiply`, `screen`, `overlay`,
    /// `soft-light`, `hard-light`, `color-dodge`, `color-burn`) or index 0-7.
    #[arg(long, value_name = "MODE", value_parser = parse_blend_mode)]
    pub blend_mode: Option<BlendMode>,

    /// How far the blend-mode composite replaces the far stop (0-1).
    #[arg(long, value_name = "STRENGTH")]
    pub blend_strength: Option<f32>,

    /// Backdrop blur radius in pixels; carried in the parameter record only.
    #[arg(long, value_name = "PIXELS")]
    pub blur: Option<f32>,

    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Render a single frame at this time value and hold it.
    #[arg(long, value_name = "TIME")]
    pub still: Option<f64>,

    /// Frame rate cap for the animated path (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Grouped settings blob (JSON) applied before individual flags.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Print the grouped settings blob for the effective parameters and exit.
    #[arg(long)]
    pub export_settings: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_blend_mode(value: &str) -> Result<BlendMode, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("blend mode must not be empty".to_string());
    }
    if let Ok(index) = trimmed.parse::<u32>() {
        if index > 7 {
            return Err(format!("blend mode index {index} out of range; use 0-7"));
        }
        return Ok(BlendMode::from_index(index));
    }
    trimmed.to_ascii_lowercase().parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height".to_string())?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}
