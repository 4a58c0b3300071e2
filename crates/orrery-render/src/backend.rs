//! Backend-neutral drawing interface used by the frame driver.

use glam::Mat4;

use crate::gpu::SurfaceError;

/// Index of a mesh uploaded to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// Index of a texture uploaded to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub usize);

/// One textured object queued for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
    pub model: Mat4,
}

/// Receives one frame at a time: `begin_frame`, any number of `draw_object`
/// calls, then `end_frame`. Draws issued outside that bracket are dropped.
pub trait RenderBackend {
    /// Start a frame. Clears the queued draws and fixes the camera transform.
    fn begin_frame(&mut self, view_proj: Mat4);

    /// Queue a mesh with its texture under `model`.
    fn draw_object(&mut self, mesh: MeshHandle, texture: TextureHandle, model: Mat4);

    /// Clear color and depth, draw everything queued, present.
    fn end_frame(&mut self) -> Result<(), SurfaceError>;
}

/// Ordered list of queued draws, reset by `begin_frame`.
#[derive(Debug, Default)]
pub struct FrameQueue {
    view_proj: Mat4,
    draws: Vec<DrawCommand>,
    open: bool,
}

impl FrameQueue {
    pub fn begin(&mut self, view_proj: Mat4) {
        self.view_proj = view_proj;
        self.draws.clear();
        self.open = true;
    }

    /// Returns false and drops the draw when no frame is open.
    pub fn push(&mut self, command: DrawCommand) -> bool {
        if !self.open {
            return false;
        }
        self.draws.push(command);
        true
    }

    /// Close the frame and hand back its contents.
    pub fn finish(&mut self) -> (Mat4, Vec<DrawCommand>) {
        self.open = false;
        (self.view_proj, std::mem::take(&mut self.draws))
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draws(&self) -> &[DrawCommand] {
        &self.draws
    }
}
