//! Grouped settings blob import/export.
//!
//! The wire format groups fields by panel (`colors` / `animation` / `chaos` /
//! `blend` / `effects` / `layout`); every group and field is optional so a
//! partial blob overlays cleanly on the defaults. Unknown fields are ignored,
//! and the `layout` group is carried through round-trips untouched.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use engine::{BlendMode, GradientParameters, Rgb};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings blob: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsBlob {
    pub colors: ColorsGroup,
    pub animation: AnimationGroup,
    pub chaos: ChaosGroup,
    pub blend: BlendGroup,
    pub effects: EffectsGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<serde_json::Value>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color1: Option<ColorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color2: Option<ColorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color3: Option<ColorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color4: Option<ColorEntry>,
}

/// Stops are wrapped in an object so the group stays open for per-stop
/// attributes the way the upstream format is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorEntry {
    pub hex: Rgb,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChaosGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turbulence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub octaves: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lacunarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_intensity: Option<f32>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlendGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_blend_mode: Option<BlendModeField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_strength: Option<f32>,
}

/// The upstream blob stores the blend mode as a number; named modes are
/// accepted too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlendModeField {
    Index(f32),
    Name(BlendMode),
}

impl BlendModeField {
    pub fn resolve(&self) -> BlendMode {
        match self {
            // Out-of-range and negative indices fall back to Normal.
            BlendModeField::Index(value) => BlendMode::from_index(value.max(0.0).round() as u32),
            BlendModeField::Name(mode) => *mode,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,
    /// Accepted for compatibility; the windowed host has no use for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_isolation: Option<bool>,
}

impl SettingsBlob {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Overlays every present field on `base`; absent fields keep the base
    /// value. The result is not yet sanitised.
    pub fn apply(&self, base: GradientParameters) -> GradientParameters {
        let mut params = base;
        let stops = [
            (&self.colors.color1, 0),
            (&self.colors.color2, 1),
            (&self.colors.color3, 2),
            (&self.colors.color4, 3),
        ];
        for (entry, index) in stops {
            if let Some(entry) = entry {
                params.colors[index] = entry.hex;
            }
        }
        if let Some(speed) = self.animation.speed {
            params.animation_speed = speed;
        }
        if let Some(noise_scale) = self.chaos.noise_scale {
            params.noise_scale = noise_scale;
        }
        if let Some(turbulence) = self.chaos.turbulence {
            params.turbulence = turbulence;
        }
        if let Some(octaves) = self.chaos.octaves {
            params.octaves = octaves;
        }
        if let Some(lacunarity) = self.chaos.lacunarity {
            params.lacunarity = lacunarity;
        }
        if let Some(mesh_intensity) = self.chaos.mesh_intensity {
            params.mesh_intensity = mesh_intensity;
        }
        if let Some(mode) = &self.blend.color_blend_mode {
            params.blend_mode = mode.resolve();
        }
        if let Some(strength) = self.blend.blend_strength {
            params.blend_strength = strength;
        }
        if let Some(blur) = self.effects.blur {
            params.blur_radius = blur;
        }
        params
    }

    /// Full blob for the given parameters, the exportable counterpart of
    /// [`SettingsBlob::apply`].
    pub fn from_parameters(params: &GradientParameters) -> Self {
        Self {
            colors: ColorsGroup {
                color1: Some(ColorEntry {
                    hex: params.colors[0],
                }),
                color2: Some(ColorEntry {
                    hex: params.colors[1],
                }),
                color3: Some(ColorEntry {
                    hex: params.colors[2],
                }),
                color4: Some(ColorEntry {
                    hex: params.colors[3],
                }),
            },
            animation: AnimationGroup {
                speed: Some(params.animation_speed),
            },
            chaos: ChaosGroup {
                noise_scale: Some(params.noise_scale),
                turbulence: Some(params.turbulence),
                octaves: Some(params.octaves),
                lacunarity: Some(params.lacunarity),
                mesh_intensity: Some(params.mesh_intensity),
            },
            blend: BlendGroup {
                color_blend_mode: Some(BlendModeField::Index(params.blend_mode.index() as f32)),
                blend_strength: Some(params.blend_strength),
            },
            effects: EffectsGroup {
                blur: Some(params.blur_radius),
                blur_isolation: None,
            },
            layout: None,
        }
    }
}
