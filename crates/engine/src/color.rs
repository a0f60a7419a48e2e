use tracing::warn;

/// Linear RGB triple with channels in `[0, 1]`.
///
/// Colors are normalised exactly once, when they cross the host boundary as
/// `#rrggbb` strings. Everything downstream assumes unit-range channels and
/// never re-normalises.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` hex string (leading `#` optional).
    ///
    /// Returns `None` for anything that is not exactly six hex digits.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|byte| byte as f32 / 255.0)
                .ok()
        };
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Boundary adapter: malformed hex input degrades to black rather than
    /// failing, matching the engine's never-fatal color policy.
    pub fn from_hex_or_black(value: &str) -> Self {
        match Self::parse_hex(value) {
            Some(color) => color,
            None => {
                warn!(value, "malformed hex color; substituting black");
                Self::BLACK
            }
        }
    }

    /// Formats the color back into `#rrggbb` form.
    pub fn to_hex(self) -> String {
        let byte = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Linear interpolation per channel, unclamped like GLSL `mix`.
    pub fn mix(self, other: Rgb, factor: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * factor,
            g: self.g + (other.g - self.g) * factor,
            b: self.b + (other.b - self.b) * factor,
        }
    }

    /// Applies a per-channel binary operation against `other`.
    pub fn zip_map(self, other: Rgb, op: impl Fn(f32, f32) -> f32) -> Rgb {
        Rgb {
            r: op(self.r, other.r),
            g: op(self.g, other.g),
            b: op(self.b, other.b),
        }
    }

    pub fn clamped(self) -> Rgb {
        Rgb {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }
}
