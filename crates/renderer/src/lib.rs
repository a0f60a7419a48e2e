//! Renderer crate for meshfall.
//!
//! Glues the preview window, the `wgpu` pipeline, and the embedded WGSL mesh
//! gradient shader together. The overall flow is:
//!
//! ```text
//!   CLI / meshfall
//!          │ RendererConfig
//!          ▼
//!   WindowRuntime::spawn ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          ▲                                           │
//!          │ update_parameters()                       └─▶ GradientUniforms ─▶ GPU UBO
//! ```
//!
//! `WindowState` owns all GPU resources (surface, device, pipelines, uniform
//! buffer) for exactly one surface; spawning several runtimes yields fully
//! isolated instances with their own time accumulators. The shader math is a
//! WGSL restatement of the `engine` crate, which remains the testable
//! reference for every formula.

mod gpu;
mod runtime;
mod types;
mod window;

pub use runtime::{AnimationDriver, DriverPhase, FrameLimiter, RenderPolicy, TickClock, TimeSample};
pub use types::RendererConfig;
pub use window::WindowRuntime;
