//! 2D simplex noise and the fractal accumulator built on top of it.
//!
//! The noise primitive is the Ashima Arts / Ian McEwan textureless GLSL
//! construction, ported to scalar `f32` arithmetic so the CPU reference and
//! the WGSL shader evaluate the same lattice. Constants are kept verbatim;
//! changing any of them shifts the whole field.

/// Hard cap on fractal layers. The shader unrolls to this bound and exits
/// early, so larger requested octave counts are clamped at the boundary.
pub const MAX_OCTAVES: u32 = 5;

/// Per-octave animation rate applied to the sampling offsets.
const TIME_SCALE: f32 = 0.0004;

// Skew/unskew constants for the 2D simplex lattice:
//   C_X = (3 - sqrt(3)) / 6, C_Y = (sqrt(3) - 1) / 2,
//   C_Z = C_Y - 1, C_W = 1 / 41.
const C_X: f32 = 0.211_324_865_405_187;
const C_Y: f32 = 0.366_025_403_784_439;
const C_Z: f32 = -0.577_350_269_189_626;
const C_W: f32 = 0.024_390_243_902_439;

/// GLSL-style fract: `x - floor(x)`, always in `[0, 1)`.
fn fract_gl(x: f32) -> f32 {
    x - x.floor()
}

fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289(((x * 34.0) + 1.0) * x)
}

/// Contribution of one lattice corner: quartic falloff kernel times the
/// gradient (selected by the permuted hash) dotted with the offset.
fn corner(hash: f32, dx: f32, dy: f32) -> f32 {
    let m = (0.5 - (dx * dx + dy * dy)).max(0.0);
    let m = m * m;
    let m = m * m;
    let x = 2.0 * fract_gl(hash * C_W) - 1.0;
    let h = x.abs() - 0.5;
    let ox = (x + 0.5).floor();
    let a0 = x - ox;
    // Normalise the gradient implicitly by scaling the kernel.
    let m = m * (1.792_842_914_001_59 - 0.853_734_720_953_14 * (a0 * a0 + h * h));
    m * (a0 * dx + h * dy)
}

/// Deterministic 2D gradient noise over a skewed triangular lattice.
///
/// Output stays within `[-1, 1]` and varies continuously with position.
pub fn simplex2(px: f32, py: f32) -> f32 {
    // Skew into simplex cell space and find the base lattice corner.
    let skew = (px + py) * C_Y;
    let i0x = (px + skew).floor();
    let i0y = (py + skew).floor();
    let unskew = (i0x + i0y) * C_X;
    let x0x = px - i0x + unskew;
    let x0y = py - i0y + unskew;

    // The middle corner depends on which triangle of the cell we are in.
    let (i1x, i1y) = if x0x > x0y { (1.0, 0.0) } else { (0.0, 1.0) };
    let x1x = x0x + C_X - i1x;
    let x1y = x0y + C_X - i1y;
    let x2x = x0x + C_Z;
    let x2y = x0y + C_Z;

    let ix = mod289(i0x);
    let iy = mod289(i0y);
    let p0 = permute(permute(iy) + ix);
    let p1 = permute(permute(iy + i1y) + ix + i1x);
    let p2 = permute(permute(iy + 1.0) + ix + 1.0);

    130.0 * (corner(p0, x0x, x0y) + corner(p1, x1x, x1y) + corner(p2, x2x, x2y))
}

/// Sampling offset that de-phases octave `i` over time.
fn octave_offset(octave: u32, time: f32) -> (f32, f32) {
    let i = octave as f32;
    (
        time * TIME_SCALE * (0.5 + i * 0.2),
        time * TIME_SCALE * (0.3 - i * 0.1),
    )
}

/// Fractal Brownian motion: octaves of [`simplex2`] at halving amplitude and
/// growing frequency, each octave drifting out of phase with the others.
///
/// The loop bound is fixed at [`MAX_OCTAVES`] with an early exit, mirroring
/// the bounded unrolled loop the GPU executes.
pub fn fbm(px: f32, py: f32, time: f32, octaves: u32, turbulence: f32, lacunarity: f32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for i in 0..MAX_OCTAVES {
        if i >= octaves {
            break;
        }
        let (ox, oy) = octave_offset(i, time);
        value += amplitude * simplex2(px * frequency + ox, py * frequency + oy);
        amplitude *= turbulence;
        frequency *= lacunarity;
    }
    value
}

/// Upper bound on `|fbm|` for the given shaping parameters: the geometric
/// amplitude series, since each octave contributes at most its amplitude.
pub fn fbm_bound(octaves: u32, turbulence: f32) -> f32 {
    let octaves = octaves.min(MAX_OCTAVES);
    if (turbulence - 1.0).abs() < f32::EPSILON {
        return 0.5 * octaves as f32;
    }
    0.5 * (1.0 - turbulence.powi(octaves as i32)) / (1.0 - turbulence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_stays_in_unit_range() {
        for ix in -40..40 {
            for iy in -40..40 {
                let n = simplex2(ix as f32 * 0.37, iy as f32 * 0.41);
                assert!((-1.0..=1.0).contains(&n), "noise {n} out of range");
            }
        }
    }

    #[test]
    fn noise_is_deterministic() {
        assert_eq!(simplex2(12.5, -3.75), simplex2(12.5, -3.75));
    }

    #[test]
    fn noise_is_continuous() {
        // Small position deltas must produce small output deltas.
        let eps = 1e-3;
        for ix in 0..30 {
            for iy in 0..30 {
                let x = ix as f32 * 0.53 - 7.0;
                let y = iy as f32 * 0.47 - 7.0;
                let here = simplex2(x, y);
                let there = simplex2(x + eps, y + eps);
                assert!(
                    (here - there).abs() < 0.05,
                    "discontinuity at ({x}, {y}): {here} vs {there}"
                );
            }
        }
    }

    #[test]
    fn noise_vanishes_at_origin() {
        // The origin sits on a lattice corner whose gradient contribution is
        // zero, so the whole sum collapses. The fixed-input regression in
        // `field` relies on this.
        assert_eq!(simplex2(0.0, 0.0), 0.0);
    }

    #[test]
    fn fbm_respects_geometric_bound() {
        let cases = [
            (1, 0.5, 2.0),
            (3, 0.7, 2.0),
            (5, 0.9, 1.5),
            (5, 1.0, 2.0),
            (4, 0.0, 3.0),
        ];
        for (octaves, turbulence, lacunarity) in cases {
            let bound = fbm_bound(octaves, turbulence) + 1e-5;
            for ix in -10..10 {
                for iy in -10..10 {
                    let v = fbm(
                        ix as f32 * 0.61,
                        iy as f32 * 0.59,
                        1234.0,
                        octaves,
                        turbulence,
                        lacunarity,
                    );
                    assert!(
                        v.abs() <= bound,
                        "fbm {v} exceeds bound {bound} for octaves={octaves} turbulence={turbulence}"
                    );
                }
            }
        }
    }

    #[test]
    fn fbm_matches_manual_two_octave_sum() {
        let (px, py, time) = (3.2_f32, -1.4_f32, 500.0_f32);
        let (turbulence, lacunarity) = (0.7_f32, 2.0_f32);

        let (o0x, o0y) = (
            time * 0.0004 * (0.5 + 0.0 * 0.2),
            time * 0.0004 * (0.3 - 0.0 * 0.1),
        );
        let (o1x, o1y) = (
            time * 0.0004 * (0.5 + 1.0 * 0.2),
            time * 0.0004 * (0.3 - 1.0 * 0.1),
        );
        let expected = 0.5 * simplex2(px + o0x, py + o0y)
            + 0.5 * turbulence * simplex2(px * lacunarity + o1x, py * lacunarity + o1y);

        assert_eq!(fbm(px, py, time, 2, turbulence, lacunarity), expected);
    }

    #[test]
    fn fbm_ignores_octaves_past_cap() {
        let a = fbm(1.5, 2.5, 250.0, MAX_OCTAVES, 0.8, 2.0);
        let b = fbm(1.5, 2.5, 250.0, 99, 0.8, 2.0);
        assert_eq!(a, b);
    }

    #[test]
    fn fbm_zero_octaves_is_silent() {
        assert_eq!(fbm(4.0, 4.0, 10.0, 0, 0.7, 2.0), 0.0);
    }

    #[test]
    fn octaves_animate_out_of_phase() {
        let early = fbm(2.0, 2.0, 0.0, 3, 0.7, 2.0);
        let late = fbm(2.0, 2.0, 5000.0, 3, 0.7, 2.0);
        assert_ne!(early, late, "time offsets should move the field");
    }
}
