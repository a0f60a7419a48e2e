use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use engine::GradientParameters;

use crate::runtime::TimeSample;

use super::context::GpuContext;
use super::pipeline::PipelineSet;
use super::uniforms::GradientUniforms;

/// Everything the renderer needs for one surface: device, pipelines, and
/// the uniform block written each frame.
pub(crate) struct GpuState {
    context: GpuContext,
    pipelines: PipelineSet,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: GradientUniforms,
    static_only: bool,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        parameters: &GradientParameters,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let static_only = context.adapter_profile.is_software();
        if static_only {
            tracing::warn!(
                adapter = %context.adapter_profile.name,
                "software rasterizer detected; showing the static gradient fallback"
            );
        }

        let pipelines = PipelineSet::new(&context.device, context.surface_format);

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<GradientUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &pipelines.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let uniforms =
            GradientUniforms::new(context.size.width, context.size.height, parameters);

        Ok(Self {
            context,
            pipelines,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            static_only,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Whether the animated path is unavailable and only the static
    /// gradient fallback is shown.
    pub(crate) fn is_static(&self) -> bool {
        self.static_only
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.uniforms
            .set_resolution(new_size.width as f32, new_size.height as f32);
    }

    pub(crate) fn set_parameters(&mut self, parameters: &GradientParameters) {
        self.uniforms.apply_parameters(parameters);
    }

    pub(crate) fn render(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        // A zero-sized surface cannot be acquired; skip the frame silently.
        if self.context.size.width == 0 || self.context.size.height == 0 {
            return Ok(());
        }

        self.uniforms.set_time(sample.time as f32);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gradient frame"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gradient pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let pipeline = if self.static_only {
                &self.pipelines.linear
            } else {
                &self.pipelines.mesh
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
