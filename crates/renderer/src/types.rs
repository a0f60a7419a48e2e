use engine::GradientParameters;

use crate::runtime::RenderPolicy;

/// Immutable configuration handed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Animate continuously or evaluate a single fixed timestamp.
    pub policy: RenderPolicy,
    /// Initial gradient parameter snapshot.
    pub parameters: GradientParameters,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "meshfall".to_string(),
            policy: RenderPolicy::default(),
            parameters: GradientParameters::default(),
        }
    }
}
