//! Pure compute core for the meshfall gradient engine.
//!
//! Everything in this crate is a deterministic function of its inputs: the
//! simplex noise primitive, the fractal accumulator, the trigonometric mesh
//! field, the four-stop gradient sampler, and the blend-mode compositor. The
//! renderer crate re-states the same formulas in WGSL so the GPU path and
//! this host-side path stay numerically interchangeable; tests and still
//! frames lean on this crate, real-time rendering on the shader.
//!
//! ```text
//!   GradientParameters ─┐
//!                       ▼
//!   fbm(position, time) ──▶ mesh blend ──▶ segment select ──▶ composite
//!                                                                │
//!                                                                ▼
//!                                                           final Rgb
//! ```

pub mod blend;
pub mod color;
pub mod field;
pub mod noise;
pub mod params;

pub use blend::{composite, segment_color, BlendMode};
pub use color::Rgb;
pub use field::{mesh_field, sample_segment, shade, smoothstep, Segment};
pub use noise::{fbm, simplex2, MAX_OCTAVES};
pub use params::GradientParameters;
