use serde::{Deserialize, Serialize};

use crate::blend::BlendMode;
use crate::color::Rgb;

/// Default stop palette from the stock gradient preset.
pub const DEFAULT_COLORS: [&str; 4] = ["#1dcb5d", "#ffe85e", "#ffa832", "#ffce48"];

/// Flat parameter record consumed by the engine, immutable per tick.
///
/// Instances arrive from the host layer (CLI flags or a settings blob) and
/// are sanitised once at construction; the render loop only ever reads a
/// snapshot, never a half-updated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientParameters {
    /// Four ordered color stops along the blend path.
    pub colors: [Rgb; 4],
    /// Time added to the accumulator on every tick.
    pub animation_speed: f32,
    /// Inverse sampling frequency; larger values zoom the noise out.
    pub noise_scale: f32,
    /// Per-octave amplitude decay in `[0, 1]`.
    pub turbulence: f32,
    /// Fractal layers summed, `1..=5`.
    pub octaves: u32,
    /// Per-octave frequency growth, `>= 1`.
    pub lacunarity: f32,
    /// Weight of the trigonometric mesh field vs. the fractal field.
    pub mesh_intensity: f32,
    /// Compositing function for adjacent stops.
    pub blend_mode: BlendMode,
    /// Interpolation weight between plain mix and the blend-mode result.
    pub blend_strength: f32,
    /// Post-process blur radius, applied by the host surface only.
    pub blur_radius: f32,
}

impl Default for GradientParameters {
    fn default() -> Self {
        let colors = DEFAULT_COLORS.map(|hex| Rgb::from_hex_or_black(hex));
        Self {
            colors,
            animation_speed: 1.0,
            noise_scale: 1.0,
            turbulence: 0.7,
            octaves: 3,
            lacunarity: 2.0,
            mesh_intensity: 0.3,
            blend_mode: BlendMode::Normal,
            blend_strength: 1.0,
            blur_radius: 0.0,
        }
    }
}

impl GradientParameters {
    /// Clamps every field to its contract range. Out-of-range input degrades
    /// visually instead of erroring.
    pub fn sanitized(mut self) -> Self {
        for color in &mut self.colors {
            *color = color.clamped();
        }
        self.animation_speed = self.animation_speed.max(0.0);
        self.noise_scale = self.noise_scale.max(f32::MIN_POSITIVE);
        self.turbulence = self.turbulence.clamp(0.0, 1.0);
        self.octaves = self.octaves.clamp(1, crate::noise::MAX_OCTAVES);
        self.lacunarity = self.lacunarity.max(1.0);
        self.mesh_intensity = self.mesh_intensity.clamp(0.0, 1.0);
        self.blend_strength = self.blend_strength.clamp(0.0, 1.0);
        self.blur_radius = self.blur_radius.max(0.0);
        self
    }
}

// Serde support for Rgb lives here rather than in `color` so the wire format
// stays the boundary's `#rrggbb` convention.
impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Rgb::from_hex_or_black(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_preset() {
        let params = GradientParameters::default();
        assert_eq!(params.colors[0].to_hex(), "#1dcb5d");
        assert_eq!(params.colors[3].to_hex(), "#ffce48");
        assert_eq!(params.octaves, 3);
        assert_eq!(params.blend_mode, BlendMode::Normal);
    }

    #[test]
    fn sanitize_clamps_out_of_range_fields() {
        let params = GradientParameters {
            animation_speed: -3.0,
            noise_scale: -1.0,
            turbulence: 1.8,
            octaves: 12,
            lacunarity: 0.25,
            mesh_intensity: -0.5,
            blend_strength: 4.0,
            blur_radius: -2.0,
            ..GradientParameters::default()
        }
        .sanitized();

        assert_eq!(params.animation_speed, 0.0);
        assert!(params.noise_scale > 0.0);
        assert_eq!(params.turbulence, 1.0);
        assert_eq!(params.octaves, 5);
        assert_eq!(params.lacunarity, 1.0);
        assert_eq!(params.mesh_intensity, 0.0);
        assert_eq!(params.blend_strength, 1.0);
        assert_eq!(params.blur_radius, 0.0);
    }

    #[test]
    fn sanitize_keeps_in_range_fields() {
        let params = GradientParameters::default();
        assert_eq!(params.clone().sanitized(), params);
    }

    #[test]
    fn colors_serialize_as_hex_strings() {
        let json = serde_json::to_string(&Rgb::new(1.0, 0.0, 0.0)).expect("serialize");
        assert_eq!(json, "\"#ff0000\"");
        let back: Rgb = serde_json::from_str("\"#00ff00\"").expect("deserialize");
        assert_eq!(back, Rgb::new(0.0, 1.0, 0.0));
    }
}
