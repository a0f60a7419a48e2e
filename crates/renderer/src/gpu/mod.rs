//! GPU wiring for the mesh gradient pipeline.
//!
//! - `context` owns wgpu instance/device/surface setup, adapter selection
//!   (with the software-rasterizer fallback), and swapchain reconfiguration
//!   on resize.
//! - `pipeline` compiles the embedded WGSL module into the two render
//!   pipelines: the animated mesh shader and the static gradient fallback.
//! - `uniforms` is the std140 uniform block mirroring the shader's
//!   `GradientUniforms` struct, refreshed through the queue each frame.
//! - `state` glues everything together behind the `GpuState` API used by
//!   `window`.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
