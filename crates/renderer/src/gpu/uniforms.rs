use bytemuck::{Pod, Zeroable};
use engine::GradientParameters;

/// Host mirror of the shader's `GradientUniforms` block (std140 layout,
/// every field a vec4 so there is no implicit padding).
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct GradientUniforms {
    /// x: viewport width, y: viewport height, z: animation time, w: unused.
    pub resolution: [f32; 4],
    /// Four gradient stops, rgb + unused alpha.
    pub colors: [[f32; 4]; 4],
    /// x: noise scale, y: turbulence, z: octaves, w: lacunarity.
    pub noise_params: [f32; 4],
    /// x: mesh intensity, y: blend mode index, z: blend strength, w: unused.
    pub blend_params: [f32; 4],
}

unsafe impl Zeroable for GradientUniforms {}
unsafe impl Pod for GradientUniforms {}

impl GradientUniforms {
    pub fn new(width: u32, height: u32, parameters: &GradientParameters) -> Self {
        let mut uniforms = Self {
            resolution: [width as f32, height as f32, 0.0, 0.0],
            colors: [[0.0; 4]; 4],
            noise_params: [0.0; 4],
            blend_params: [0.0; 4],
        };
        uniforms.apply_parameters(parameters);
        uniforms
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution[0] = width;
        self.resolution[1] = height;
    }

    pub fn set_time(&mut self, time: f32) {
        self.resolution[2] = time;
    }

    pub fn apply_parameters(&mut self, parameters: &GradientParameters) {
        for (slot, color) in self.colors.iter_mut().zip(parameters.colors.iter()) {
            *slot = [color.r, color.g, color.b, 1.0];
        }
        self.noise_params = [
            parameters.noise_scale,
            parameters.turbulence,
            parameters.octaves as f32,
            parameters.lacunarity,
        ];
        self.blend_params = [
            parameters.mesh_intensity,
            parameters.blend_mode.index() as f32,
            parameters.blend_strength,
            0.0,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{BlendMode, Rgb};

    #[test]
    fn block_layout_matches_shader() {
        // vec4 + 4*vec4 + vec4 + vec4.
        assert_eq!(std::mem::size_of::<GradientUniforms>(), 112);
        assert_eq!(std::mem::align_of::<GradientUniforms>(), 16);
        let uniforms = GradientUniforms::new(1, 1, &GradientParameters::default());
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 112);
    }

    #[test]
    fn parameters_map_to_expected_lanes() {
        let parameters = GradientParameters {
            colors: [
                Rgb::from_hex_or_black("#ff0000"),
                Rgb::from_hex_or_black("#00ff00"),
                Rgb::from_hex_or_black("#0000ff"),
                Rgb::from_hex_or_black("#ffffff"),
            ],
            noise_scale: 2.0,
            turbulence: 0.6,
            octaves: 4,
            lacunarity: 2.5,
            mesh_intensity: 0.25,
            blend_mode: BlendMode::Screen,
            blend_strength: 0.8,
            ..GradientParameters::default()
        };
        let uniforms = GradientUniforms::new(640, 480, &parameters);

        assert_eq!(uniforms.resolution, [640.0, 480.0, 0.0, 0.0]);
        assert_eq!(uniforms.colors[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms.colors[3], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniforms.noise_params, [2.0, 0.6, 4.0, 2.5]);
        assert_eq!(uniforms.blend_params, [0.25, 2.0, 0.8, 0.0]);
    }

    #[test]
    fn time_lands_in_the_resolution_lane() {
        let mut uniforms = GradientUniforms::new(800, 600, &GradientParameters::default());
        uniforms.set_time(1234.5);
        assert_eq!(uniforms.resolution[2], 1234.5);
        uniforms.set_resolution(1024.0, 768.0);
        // Resizing never clobbers the time lane.
        assert_eq!(uniforms.resolution, [1024.0, 768.0, 1234.5, 0.0]);
    }
}
