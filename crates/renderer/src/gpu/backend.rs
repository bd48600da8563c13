use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use uniforms::{BlockLayout, UniformMap};

use crate::camera::PerspectiveCamera;
use crate::engine::{RenderBackend, SurfaceSize};
use crate::scene::{ObjectId, Scene};
use crate::types::Antialiasing;
use crate::window::WindowSurface;

use super::context::GpuContext;
use super::pipeline::{PipelineLayouts, ShaderPipeline};

/// Camera data bound next to the uniform block as `camera`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraBlock {
    view: [f32; 16],
    projection: [f32; 16],
    view_projection: [f32; 16],
    position: [f32; 4],
    /// Physical width, physical height, pixel ratio, unused.
    viewport: [f32; 4],
}

impl CameraBlock {
    fn new(camera: &PerspectiveCamera, physical: (u32, u32), pixel_ratio: f32) -> Self {
        Self {
            view: camera.view_matrix().to_cols_array(),
            projection: camera.projection_matrix().to_cols_array(),
            view_projection: camera.view_projection().to_cols_array(),
            position: camera.position().extend(1.0).to_array(),
            viewport: [physical.0 as f32, physical.1 as f32, pixel_ratio, 0.0],
        }
    }
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// GPU state that only exists while a window is attached.
struct GpuResources {
    context: GpuContext,
    layouts: PipelineLayouts,
    block: BlockLayout,
    block_bytes: Vec<u8>,
    stage_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    multisample_target: Option<MultisampleTarget>,
    pipelines: HashMap<ObjectId, ShaderPipeline>,
}

impl GpuResources {
    fn new(context: GpuContext) -> Self {
        let layouts = PipelineLayouts::new(&context.device);
        let block = BlockLayout::for_map(&UniformMap::new());
        let camera_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stage camera buffer"),
            size: std::mem::size_of::<CameraBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let stage_buffer = create_stage_buffer(&context.device, &block);
        let bind_group = create_bind_group(&context.device, &layouts, &stage_buffer, &camera_buffer);
        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size(),
                context.sample_count,
            )
        });

        Self {
            context,
            layouts,
            block,
            block_bytes: Vec::new(),
            stage_buffer,
            camera_buffer,
            bind_group,
            multisample_target,
            pipelines: HashMap::new(),
        }
    }

    fn resize(&mut self, physical: (u32, u32)) {
        self.context.resize(physical);
        if self.context.sample_count > 1 {
            self.multisample_target = Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size(),
                self.context.sample_count,
            ));
        }
    }

    /// Rebuilds the uniform buffer and every pipeline when the declared set changes.
    fn sync_block(&mut self, uniforms: &UniformMap) {
        if self.block.matches(uniforms) {
            return;
        }
        self.block = BlockLayout::for_map(uniforms);
        self.stage_buffer = create_stage_buffer(&self.context.device, &self.block);
        self.bind_group = create_bind_group(
            &self.context.device,
            &self.layouts,
            &self.stage_buffer,
            &self.camera_buffer,
        );
        self.pipelines.clear();
        tracing::debug!(
            fields = self.block.fields().len(),
            size = self.block.size(),
            "uniform block layout rebuilt"
        );
    }

    fn sync_pipelines(&mut self, scene: &Scene) -> Result<()> {
        self.pipelines
            .retain(|id, _| scene.object_by_id(*id).is_some());
        for (id, object) in scene.iter() {
            let stale = self
                .pipelines
                .get(&id)
                .is_none_or(|pipeline| pipeline.fragment != object.material.fragment);
            if !stale {
                continue;
            }
            let pipeline = ShaderPipeline::new(
                &self.context.device,
                &self.layouts,
                &self.block,
                &object.material,
                self.context.surface_format,
                self.context.sample_count,
            )?;
            tracing::debug!(%id, name = %object.name, "built pass pipeline");
            self.pipelines.insert(id, pipeline);
        }
        Ok(())
    }

    fn draw(&mut self, scene: &Scene) -> Result<()> {
        let frame = match self.context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout; retrying next frame");
                return Ok(());
            }
            Err(err) => return Err(anyhow!("failed to acquire surface texture: {err}")),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("stage encoder"),
                });
        {
            let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
                Some(msaa) => (&msaa.view, Some(&view)),
                None => (&view, None),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("stage pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            for (id, object) in scene.iter().filter(|(_, object)| object.visible) {
                if let Some(pipeline) = self.pipelines.get(&id) {
                    render_pass.set_pipeline(&pipeline.pipeline);
                    render_pass.draw(0..3, 0..1);
                }
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_stage_buffer(device: &wgpu::Device, block: &BlockLayout) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("stage uniform buffer"),
        size: block.size() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    stage_buffer: &wgpu::Buffer,
    camera_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("stage bind group"),
        layout: &layouts.uniform_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: stage_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: camera_buffer.as_entire_binding(),
            },
        ],
    })
}

/// wgpu renderer drawing each scene object as a full-surface shader pass.
pub struct WgpuBackend {
    antialiasing: Antialiasing,
    pixel_ratio: f32,
    size: SurfaceSize,
    gpu: Option<GpuResources>,
}

impl WgpuBackend {
    pub fn new(antialiasing: Antialiasing) -> Self {
        Self {
            antialiasing,
            pixel_ratio: 1.0,
            size: SurfaceSize::default(),
            gpu: None,
        }
    }

    fn physical_size(&self) -> (u32, u32) {
        self.size.physical(self.pixel_ratio)
    }
}

impl RenderBackend for WgpuBackend {
    type Surface = WindowSurface;

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
        if size.is_empty() {
            return;
        }
        let physical = self.physical_size();
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(physical);
        }
    }

    fn attach(&mut self, surface: &WindowSurface) -> Result<()> {
        if self.gpu.is_some() {
            anyhow::bail!("wgpu backend is already attached to a window");
        }
        let context = GpuContext::new(surface.window(), self.physical_size(), self.antialiasing)
            .context("failed to initialise GPU context")?;
        self.gpu = Some(GpuResources::new(context));
        Ok(())
    }

    fn detach(&mut self) {
        self.gpu = None;
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        uniforms: &UniformMap,
    ) -> Result<()> {
        let pixel_ratio = self.pixel_ratio;
        let Some(gpu) = self.gpu.as_mut() else {
            anyhow::bail!("wgpu backend rendered before attach");
        };

        gpu.sync_block(uniforms);
        gpu.block.write(uniforms, &mut gpu.block_bytes);
        gpu.context
            .queue
            .write_buffer(&gpu.stage_buffer, 0, &gpu.block_bytes);
        let camera_block = CameraBlock::new(camera, gpu.context.size(), pixel_ratio);
        gpu.context
            .queue
            .write_buffer(&gpu.camera_buffer, 0, bytemuck::bytes_of(&camera_block));

        gpu.sync_pipelines(scene)?;
        gpu.draw(scene)
    }

    fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.pipelines.clear();
            gpu.multisample_target = None;
            tracing::debug!("released pass pipelines");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn camera_block_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraBlock>(), 3 * 64 + 2 * 16);

        let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 1000.0);
        camera.set_position(Vec3::splat(5.0));
        camera.look_at(Vec3::ZERO);
        let block = CameraBlock::new(&camera, (1600, 800), 2.0);
        assert_eq!(block.position, [5.0, 5.0, 5.0, 1.0]);
        assert_eq!(block.viewport, [1600.0, 800.0, 2.0, 0.0]);
        assert_eq!(block.projection, camera.projection_matrix().to_cols_array());
    }
}
