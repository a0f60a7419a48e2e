mod cli;
mod settings;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use engine::{GradientParameters, Rgb};
use renderer::{RenderPolicy, RendererConfig, WindowRuntime};
use settings::SettingsBlob;

fn main() -> Result<()> {
    let cli = cli::parse();
    initialise_tracing();

    let parameters = build_parameters(&cli)?;

    if cli.export_settings {
        let blob = SettingsBlob::from_parameters(&parameters);
        println!("{}", serde_json::to_string_pretty(&blob)?);
        return Ok(());
    }

    if parameters.blur_radius > 0.0 {
        tracing::info!(
            blur = parameters.blur_radius,
            "blur radius is carried in the parameter record; the windowed host does not apply it"
        );
    }

    let policy = match cli.still {
        Some(time) => RenderPolicy::Still { time },
        None => RenderPolicy::Animate {
            // 0 means uncapped.
            target_fps: cli.fps.filter(|fps| *fps > 0.0),
        },
    };

    let config = RendererConfig {
        surface_size: cli.size.unwrap_or((1280, 720)),
        title: "meshfall".to_string(),
        policy,
        parameters,
    };

    let runtime = WindowRuntime::spawn(config).context("failed to start renderer")?;
    runtime.join()
}

/// Defaults, then the settings blob, then individual flags; sanitised last.
fn build_parameters(cli: &cli::Cli) -> Result<GradientParameters> {
    let mut parameters = GradientParameters::default();

    if let Some(path) = &cli.settings {
        let blob = SettingsBlob::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?;
        parameters = blob.apply(parameters);
    }

    let stops = [&cli.color1, &cli.color2, &cli.color3, &cli.color4];
    for (index, stop) in stops.into_iter().enumerate() {
        if let Some(hex) = stop {
            parameters.colors[index] = Rgb::from_hex_or_black(hex);
        }
    }
    if let Some(speed) = cli.speed {
        parameters.animation_speed = speed;
    }
    if let Some(noise_scale) = cli.noise_scale {
        parameters.noise_scale = noise_scale;
    }
    if let Some(turbulence) = cli.turbulence {
        parameters.turbulence = turbulence;
    }
    if let Some(octaves) = cli.octaves {
        parameters.octaves = octaves;
    }
    if let Some(lacunarity) = cli.lacunarity {
        parameters.lacunarity = lacunarity;
    }
    if let Some(mesh_intensity) = cli.mesh_intensity {
        parameters.mesh_intensity = mesh_intensity;
    }
    if let Some(blend_mode) = cli.blend_mode {
        parameters.blend_mode = blend_mode;
    }
    if let Some(blend_strength) = cli.blend_strength {
        parameters.blend_strength = blend_strength;
    }
    if let Some(blur) = cli.blur {
        parameters.blur_radius = blur;
    }

    Ok(parameters.sanitized())
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
