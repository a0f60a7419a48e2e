//! Field evaluation: mesh blending, segment selection, and the full
//! per-pixel shading path used for tests and still frames.

use crate::blend::segment_color;
use crate::color::Rgb;
use crate::noise::fbm;
use crate::params::GradientParameters;

/// Pixel-space factor applied before noise sampling. The effective sampling
/// frequency is `NOISE_POSITION_SCALE / noise_scale`.
pub const NOISE_POSITION_SCALE: f32 = 0.0015;

/// Hermite smoothstep, clamped like the GLSL builtin.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Low-frequency trigonometric field evaluated in viewport-normalised uv
/// space. This is what gives the gradient its "mesh" look once blended over
/// the fractal noise.
pub fn mesh_field(u: f32, v: f32, time: f32) -> f32 {
    (u * 3.0 + time * 0.001).sin() * (v * 2.0 - time * 0.0008).cos()
}

/// One of the three stop-to-stop spans of the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Index of the near stop (0-based into the four-color palette).
    pub lower: usize,
    /// Index of the far stop.
    pub upper: usize,
    /// Mix position within the segment.
    pub factor: f32,
}

/// Maps the unit-range scalar onto a color-stop segment.
///
/// The third segment divides by 0.34 rather than 0.33; the asymmetry is part
/// of the reference output and is kept bit-for-bit.
pub fn sample_segment(t: f32) -> Segment {
    if t < 0.33 {
        Segment {
            lower: 0,
            upper: 1,
            factor: smoothstep(0.0, 0.33, t) * 3.0,
        }
    } else if t < 0.66 {
        Segment {
            lower: 1,
            upper: 2,
            factor: (t - 0.33) / 0.33,
        }
    } else {
        Segment {
            lower: 2,
            upper: 3,
            factor: (t - 0.66) / 0.34,
        }
    }
}

/// Blends the fractal and mesh fields and maps the result to unit range.
fn unit_scalar(px: f32, py: f32, u: f32, v: f32, time: f32, params: &GradientParameters) -> f32 {
    let scale = NOISE_POSITION_SCALE / params.noise_scale;
    let fractal = fbm(
        px * scale,
        py * scale,
        time,
        params.octaves,
        params.turbulence,
        params.lacunarity,
    );
    let mesh = mesh_field(u, v, time);
    let combined = fractal * (1.0 - params.mesh_intensity) + mesh * params.mesh_intensity;
    smoothstep(0.0, 1.0, (combined + 1.0) * 0.5)
}

/// Host-side reference for the fragment shader: shades one pixel.
///
/// `px`/`py` are pixel coordinates with y up, matching `gl_FragCoord` in the
/// rendered path; `width`/`height` is the viewport the uv of the mesh term
/// is normalised against. Noise sampling positions deliberately ignore the
/// viewport so resizing only moves the mesh term.
pub fn shade(
    px: f32,
    py: f32,
    width: f32,
    height: f32,
    time: f32,
    params: &GradientParameters,
) -> Rgb {
    let u = px / width.max(1.0);
    let v = py / height.max(1.0);
    let t = unit_scalar(px, py, u, v, time, params);
    let segment = sample_segment(t);
    segment_color(
        params.colors[segment.lower],
        params.colors[segment.upper],
        params.blend_mode,
        params.blend_strength,
        segment.factor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::BlendMode;

    fn assert_rgb_eq(a: Rgb, b: Rgb) {
        assert!(
            (a.r - b.r).abs() < 1e-6 && (a.g - b.g).abs() < 1e-6 && (a.b - b.b).abs() < 1e-6,
            "{a:?} != {b:?}"
        );
    }

    fn regression_params() -> GradientParameters {
        GradientParameters {
            colors: [
                Rgb::from_hex_or_black("#ff0000"), // red
                Rgb::from_hex_or_black("#ffff00"), // yellow
                Rgb::from_hex_or_black("#ffa500"), // orange
                Rgb::from_hex_or_black("#ffbf00"), // amber
            ],
            octaves: 3,
            turbulence: 0.7,
            lacunarity: 2.0,
            mesh_intensity: 0.3,
            blend_mode: BlendMode::Normal,
            blend_strength: 1.0,
            ..GradientParameters::default()
        }
    }

    #[test]
    fn smoothstep_matches_glsl() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 0.33, 0.165) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn segment_thresholds() {
        assert_eq!(
            sample_segment(0.0),
            Segment {
                lower: 0,
                upper: 1,
                factor: 0.0
            }
        );

        // Exactly at 0.33 the middle segment starts at its near stop.
        let mid = sample_segment(0.33);
        assert_eq!((mid.lower, mid.upper), (1, 2));
        assert_eq!(mid.factor, 0.0);

        let high = sample_segment(0.66);
        assert_eq!((high.lower, high.upper), (2, 3));
        assert_eq!(high.factor, 0.0);

        // The 0.34 denominator lands factor exactly on 1.0 at t = 1.
        let top = sample_segment(1.0);
        assert!((top.factor - 1.0).abs() < 1e-6);
    }

    #[test]
    fn third_segment_keeps_asymmetric_denominator() {
        let segment = sample_segment(0.83);
        assert!((segment.factor - (0.83 - 0.66) / 0.34).abs() < 1e-7);
    }

    #[test]
    fn stop_continuity_at_segment_boundaries() {
        // Entering a segment at factor 0 must yield the stop color exactly,
        // for every mode and strength, so stops never show a compositing seam.
        let params = regression_params();
        for (t, stop) in [(0.33_f32, 1_usize), (0.66, 2)] {
            for mode in BlendMode::ALL {
                let tinted = GradientParameters {
                    blend_mode: mode,
                    blend_strength: 0.8,
                    ..params.clone()
                };
                let segment = sample_segment(t);
                assert_eq!(segment.factor, 0.0);
                let color = crate::blend::segment_color(
                    tinted.colors[segment.lower],
                    tinted.colors[segment.upper],
                    mode,
                    tinted.blend_strength,
                    segment.factor,
                );
                assert_rgb_eq(color, params.colors[stop]);
            }
        }
    }

    #[test]
    fn mesh_field_at_rest() {
        assert_eq!(mesh_field(0.0, 0.0, 0.0), 0.0);
        let expected = (0.5_f32 * 3.0).sin() * (0.5_f32 * 2.0).cos();
        assert!((mesh_field(0.5, 0.5, 0.0) - expected).abs() < 1e-6);
    }

    #[test]
    fn viewport_only_moves_the_mesh_term() {
        // With the mesh weight at zero, the same pixel shades identically
        // regardless of viewport size: noise sampling is pixel-space.
        let params = GradientParameters {
            mesh_intensity: 0.0,
            ..regression_params()
        };
        let small = shade(120.0, 80.0, 640.0, 480.0, 3200.0, &params);
        let large = shade(120.0, 80.0, 3840.0, 2160.0, 3200.0, &params);
        assert_eq!(small, large);

        // With mesh enabled the uv normalisation shifts the result.
        let meshed = regression_params();
        let a = shade(120.0, 80.0, 640.0, 480.0, 3200.0, &meshed);
        let b = shade(120.0, 80.0, 3840.0, 2160.0, 3200.0, &meshed);
        assert_ne!(a, b);
    }

    #[test]
    fn origin_regression_baseline() {
        // Fixed input from the regression contract: at the origin and t=0 the
        // fractal and mesh terms both vanish, the scalar sits at 0.5, and the
        // output falls in the yellow/orange segment.
        let params = regression_params();
        let color = shade(0.0, 0.0, 800.0, 600.0, 0.0, &params);

        let segment = sample_segment(0.5);
        assert_eq!((segment.lower, segment.upper), (1, 2));
        let expected = crate::blend::segment_color(
            params.colors[1],
            params.colors[2],
            BlendMode::Normal,
            1.0,
            segment.factor,
        );
        assert_eq!(color, expected);

        // Pin the channel values so refactors cannot drift the baseline.
        assert_eq!(color.r, 1.0);
        assert!((color.g - 0.909_090_9).abs() < 1e-4, "g = {}", color.g);
        assert_eq!(color.b, 0.0);
    }

    #[test]
    fn shade_is_deterministic() {
        let params = regression_params();
        let a = shade(37.0, 113.0, 1920.0, 1080.0, 1234.5, &params);
        let b = shade(37.0, 113.0, 1920.0, 1080.0, 1234.5, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_viewport_does_not_blow_up() {
        let params = regression_params();
        let color = shade(0.0, 0.0, 0.0, 0.0, 0.0, &params);
        assert!(color.r.is_finite() && color.g.is_finite() && color.b.is_finite());
    }
}
