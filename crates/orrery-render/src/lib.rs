//! wgpu rendering for the orrery: device setup, mesh and texture upload,
//! the textured scene pipeline, and the [`RenderBackend`] seam the frame
//! driver draws through.

pub mod backend;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod texture;
pub mod wgpu_backend;

pub use backend::{DrawCommand, FrameQueue, MeshHandle, RenderBackend, TextureHandle};
pub use buffer::{GpuMesh, mesh_vertex_layout};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{RenderPassBuilder, SPACE_BLACK, clear_color_from_rgba};
pub use pipeline::{ObjectUniform, ScenePipeline};
pub use shader::{SCENE_SHADER_SOURCE, ShaderError, create_shader_module, load_scene_shader_source};
pub use texture::{GpuTexture, TextureError, TextureUploader};
pub use wgpu_backend::{BackendOptions, WgpuBackend};
