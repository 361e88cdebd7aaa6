//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::SceneUniform,
    error::RenderError,
    mesh::Mesh,
    overlay::generate_font_atlas,
    pipeline::{
        create_overlay_bind_group_layout, create_overlay_pipeline, create_scene_bind_group_layout,
        create_scene_pipeline, ScenePass,
    },
    texture::Texture,
    vertex::{InstanceData, OverlayVertex},
};
use glam::Vec3;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Upper bound on instances drawn per frame across every batch.
pub const MAX_INSTANCES: u32 = 8192;

/// One mesh drawn with a slice of per-instance data.
#[derive(Clone, Copy)]
pub struct DrawBatch<'a> {
    pub mesh: &'a Mesh,
    pub instances: &'a [InstanceData],
}

impl<'a> DrawBatch<'a> {
    pub fn new(mesh: &'a Mesh, instances: &'a [InstanceData]) -> Self {
        Self { mesh, instances }
    }
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,

    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    depth_texture: Texture,

    // Instance buffer for batched rendering
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    /// Write offset into `instance_buffer` for the current frame. Every batch
    /// gets its own region because all `queue.write_buffer` calls land before
    /// the command buffer executes.
    frame_instance_offset: u32,

    // Text overlay
    overlay_pipeline: wgpu::RenderPipeline,
    overlay_bind_group: wgpu::BindGroup,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Colours are authored in display space, so prefer a linear surface
        // format and let them pass through untouched.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoAdapter)?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Scene uniform
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Buffer"),
            contents: bytemuck::cast_slice(&[<SceneUniform as bytemuck::Zeroable>::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let scene_bind_group_layout = create_scene_bind_group_layout(&device);
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let opaque_pipeline =
            create_scene_pipeline(&device, surface_format, &scene_bind_group_layout, ScenePass::Opaque);
        let transparent_pipeline = create_scene_pipeline(
            &device,
            surface_format,
            &scene_bind_group_layout,
            ScenePass::Transparent,
        );

        let depth_texture =
            Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        let max_instances = MAX_INSTANCES;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (max_instances as usize * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Bitmap font for the HUD
        let (atlas_pixels, atlas_w, atlas_h) = generate_font_atlas();
        let font_texture =
            Texture::from_r8(&device, &queue, &atlas_pixels, atlas_w, atlas_h, "Font Atlas");
        let overlay_bind_group_layout = create_overlay_bind_group_layout(&device);
        let overlay_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &overlay_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&font_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&font_texture.sampler),
                },
            ],
        });
        let overlay_pipeline =
            create_overlay_pipeline(&device, surface_format, &overlay_bind_group_layout);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            opaque_pipeline,
            transparent_pipeline,
            scene_buffer,
            scene_bind_group,
            depth_texture,
            instance_buffer,
            max_instances,
            frame_instance_offset: 0,
            overlay_pipeline,
            overlay_bind_group,
        })
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                self.config.width,
                self.config.height,
                "Depth Texture",
            );
        }
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`).
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    /// Upload camera and lighting for this frame.
    pub fn update_scene(&mut self, uniform: &SceneUniform) {
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    /// Begin a new frame, returns the surface texture and a command encoder.
    pub fn begin_frame(&mut self) -> Result<(wgpu::SurfaceTexture, wgpu::CommandEncoder), RenderError> {
        self.frame_instance_offset = 0;
        let output = self.surface.get_current_texture()?;
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok((output, encoder))
    }

    /// Reserve a region of the instance buffer and upload `instances` into it.
    /// Returns the instance range, truncated when the buffer is full.
    fn upload_instances(&mut self, instances: &[InstanceData]) -> Option<std::ops::Range<u32>> {
        let offset = self.frame_instance_offset;
        let remaining = self.max_instances.saturating_sub(offset) as usize;
        let count = instances.len().min(remaining);
        if count == 0 {
            return None;
        }
        if count < instances.len() {
            log::warn!(
                "Instance buffer full: dropping {} of {} instances",
                instances.len() - count,
                instances.len()
            );
        }

        let byte_offset = (offset as usize * std::mem::size_of::<InstanceData>()) as u64;
        self.queue.write_buffer(
            &self.instance_buffer,
            byte_offset,
            bytemuck::cast_slice(&instances[..count]),
        );
        self.frame_instance_offset = offset + count as u32;
        Some(offset..offset + count as u32)
    }

    /// Clear to `clear_color` and draw the opaque batches, then the
    /// transparent ones, in a single pass.
    pub fn render_scene(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: Vec3,
        opaque: &[DrawBatch<'_>],
        transparent: &[DrawBatch<'_>],
    ) {
        let opaque_ranges: Vec<_> = opaque
            .iter()
            .map(|batch| self.upload_instances(batch.instances))
            .collect();
        let transparent_ranges: Vec<_> = transparent
            .iter()
            .map(|batch| self.upload_instances(batch.instances))
            .collect();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear_color.x as f64,
                        g: clear_color.y as f64,
                        b: clear_color.z as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        for (pipeline, batches, ranges) in [
            (&self.opaque_pipeline, opaque, &opaque_ranges),
            (&self.transparent_pipeline, transparent, &transparent_ranges),
        ] {
            render_pass.set_pipeline(pipeline);
            for (batch, range) in batches.iter().zip(ranges.iter()) {
                let Some(range) = range.clone() else { continue };
                render_pass.set_vertex_buffer(0, batch.mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(batch.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..batch.mesh.num_indices, 0, range);
            }
        }
    }

    /// Render screen-space text overlay. Call as the very last pass before end_frame.
    /// Takes pre-built overlay vertices and indices from an `OverlayTextBuilder`.
    pub fn render_overlay(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        vertices: &[OverlayVertex],
        indices: &[u32],
    ) {
        if vertices.is_empty() || indices.is_empty() {
            return;
        }

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.overlay_pipeline);
        render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Access the device for mesh creation.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
}
