//! Blend-mode compositing between adjacent color stops.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Pixel compositing function applied between adjacent stops.
///
/// Discriminants match the numeric mode the settings blob and the shader
/// uniform carry; anything out of range decodes as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    Overlay,
    SoftLight,
    HardLight,
    ColorDodge,
    ColorBurn,
}

impl BlendMode {
    pub const ALL: [BlendMode; 8] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::SoftLight,
        BlendMode::HardLight,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
    ];

    /// Decodes the numeric wire form; unknown indices fall back to `Normal`.
    pub fn from_index(index: u32) -> Self {
        Self::ALL.get(index as usize).copied().unwrap_or(BlendMode::Normal)
    }

    pub fn index(self) -> u32 {
        Self::ALL.iter().position(|mode| *mode == self).unwrap_or(0) as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::SoftLight => "soft-light",
            BlendMode::HardLight => "hard-light",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
        }
    }
}

impl std::str::FromStr for BlendMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == value)
            .ok_or_else(|| format!("unknown blend mode '{value}'"))
    }
}

fn overlay_channel(base: f32, blend: f32) -> f32 {
    if base < 0.5 {
        2.0 * base * blend
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
    }
}

fn soft_light_channel(base: f32, blend: f32) -> f32 {
    if blend < 0.5 {
        base - (1.0 - 2.0 * blend) * base * (1.0 - base)
    } else {
        base + (2.0 * blend - 1.0) * (base.sqrt() - base)
    }
}

fn color_dodge_channel(base: f32, blend: f32) -> f32 {
    if blend >= 1.0 {
        1.0
    } else {
        (base / (1.0 - blend)).min(1.0)
    }
}

fn color_burn_channel(base: f32, blend: f32) -> f32 {
    if blend <= 0.0 {
        0.0
    } else {
        (1.0 - (1.0 - base) / blend).max(0.0)
    }
}

/// Composites `blend` over `base` per channel.
///
/// `Normal` is a fixed 50/50 mix; the caller's blend-strength weighting is
/// applied one level up in [`segment_color`], not here.
pub fn composite(base: Rgb, blend: Rgb, mode: BlendMode) -> Rgb {
    match mode {
        BlendMode::Normal => base.mix(blend, 0.5),
        BlendMode::Multiply => base.zip_map(blend, |b, s| b * s),
        BlendMode::Screen => base.zip_map(blend, |b, s| 1.0 - (1.0 - b) * (1.0 - s)),
        BlendMode::Overlay => base.zip_map(blend, overlay_channel),
        BlendMode::SoftLight => base.zip_map(blend, soft_light_channel),
        // Hard light is overlay with the operands swapped.
        BlendMode::HardLight => blend.zip_map(base, overlay_channel),
        BlendMode::ColorDodge => base.zip_map(blend, color_dodge_channel),
        BlendMode::ColorBurn => base.zip_map(blend, color_burn_channel),
    }
}

/// Final color within one gradient segment.
///
/// The blend-mode result only takes over toward the far end of the segment:
/// at `local_factor == 0` the output is exactly `stop_a`, which is what keeps
/// stop-to-stop transitions seamless for every mode and strength.
pub fn segment_color(
    stop_a: Rgb,
    stop_b: Rgb,
    mode: BlendMode,
    blend_strength: f32,
    local_factor: f32,
) -> Rgb {
    let composited = composite(stop_a, stop_b, mode);
    stop_a.mix(stop_b.mix(composited, blend_strength), local_factor)
}
