//! [`RenderBackend`] on top of wgpu.
//!
//! Each queued draw gets its own uniform buffer and bind group from a pool
//! that grows to the largest frame seen so far and is reused afterwards.

use glam::Mat4;
use orrery_mesh::Mesh;

use crate::backend::{DrawCommand, FrameQueue, MeshHandle, RenderBackend, TextureHandle};
use crate::buffer::GpuMesh;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{RenderPassBuilder, clear_color_from_rgba};
use crate::pipeline::{ObjectUniform, ScenePipeline};
use crate::shader::create_shader_module;
use crate::texture::{GpuTexture, TextureError, TextureUploader};

/// Settings fixed for the lifetime of a backend.
#[derive(Debug, Clone)]
pub struct BackendOptions<'a> {
    pub clear_color: [f64; 4],
    pub cull_back_faces: bool,
    pub shader_source: &'a str,
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct WgpuBackend {
    context: RenderContext,
    depth: DepthBuffer,
    pipeline: ScenePipeline,
    uploader: TextureUploader,
    meshes: Vec<GpuMesh>,
    textures: Vec<GpuTexture>,
    slots: Vec<ObjectSlot>,
    frame: FrameQueue,
    clear_color: wgpu::Color,
}

impl WgpuBackend {
    pub fn new(context: RenderContext, options: &BackendOptions<'_>) -> Self {
        let (width, height) = context.size();
        let depth = DepthBuffer::new(&context.device, width, height);
        let uploader = TextureUploader::new(&context.device);
        let shader = create_shader_module(&context.device, "scene-shader", options.shader_source);
        let pipeline = ScenePipeline::new(
            &context.device,
            &shader,
            context.surface_format,
            uploader.bind_group_layout(),
            options.cull_back_faces,
        );

        Self {
            context,
            depth,
            pipeline,
            uploader,
            meshes: Vec::new(),
            textures: Vec::new(),
            slots: Vec::new(),
            frame: FrameQueue::default(),
            clear_color: clear_color_from_rgba(options.clear_color),
        }
    }

    pub fn upload_mesh(&mut self, label: &str, mesh: &Mesh) -> MeshHandle {
        let gpu = GpuMesh::upload(&self.context.device, label, &mesh.interleaved());
        log::debug!("Uploaded mesh '{label}' ({} vertices)", gpu.vertex_count);
        self.meshes.push(gpu);
        MeshHandle(self.meshes.len() - 1)
    }

    pub fn upload_texture(
        &mut self,
        name: &str,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, TextureError> {
        let texture = self.uploader.upload_rgba8(
            &self.context.device,
            &self.context.queue,
            name,
            rgba,
            width,
            height,
        )?;
        self.textures.push(texture);
        Ok(TextureHandle(self.textures.len() - 1))
    }

    /// Resize the surface and depth buffer together.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        let (width, height) = self.context.size();
        self.depth.resize(&self.context.device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    fn ensure_slots(&mut self, count: usize) {
        while self.slots.len() < count {
            let index = self.slots.len();
            let buffer = self.context.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("object-uniform-{index}")),
                size: std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self
                .context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("object-bind-group-{index}")),
                    layout: &self.pipeline.object_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
            self.slots.push(ObjectSlot { buffer, bind_group });
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn begin_frame(&mut self, view_proj: Mat4) {
        self.frame.begin(view_proj);
    }

    fn draw_object(&mut self, mesh: MeshHandle, texture: TextureHandle, model: Mat4) {
        if mesh.0 >= self.meshes.len() || texture.0 >= self.textures.len() {
            log::warn!("Ignoring draw with unknown handles {mesh:?} / {texture:?}");
            return;
        }
        if !self.frame.push(DrawCommand {
            mesh,
            texture,
            model,
        }) {
            log::warn!("draw_object called outside begin_frame/end_frame");
        }
    }

    fn end_frame(&mut self) -> Result<(), SurfaceError> {
        let (view_proj, draws) = self.frame.finish();
        let surface_texture = self.context.get_current_texture()?;

        self.ensure_slots(draws.len());
        for (slot, draw) in self.slots.iter().zip(&draws) {
            let uniform = ObjectUniform::new(view_proj, draw.model);
            self.context
                .queue
                .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let builder = RenderPassBuilder::new()
                .clear_color(self.clear_color)
                .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE)
                .label("scene-pass");
            let mut pass = builder.begin(&mut encoder, &view);
            pass.set_pipeline(&self.pipeline.pipeline);

            for (slot, draw) in self.slots.iter().zip(&draws) {
                let (Some(mesh), Some(texture)) = (
                    self.meshes.get(draw.mesh.0),
                    self.textures.get(draw.texture.0),
                ) else {
                    continue;
                };
                pass.set_bind_group(0, &slot.bind_group, &[]);
                pass.set_bind_group(1, &texture.bind_group, &[]);
                mesh.draw(&mut pass);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }
}
