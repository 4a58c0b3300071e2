//! Scene shader: built-in WGSL plus an optional on-disk override.

use log::{debug, info};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Built-in scene shader. Group 0 holds the per-object MVP, group 1 the
/// diffuse texture and sampler. Entry points are `vs_main` and `fs_main`.
pub const SCENE_SHADER_SOURCE: &str = r#"
struct ObjectUniform {
    mvp: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> object: ObjectUniform;

@group(1) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(1) @binding(1)
var s_diffuse: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = object.mvp * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(t_diffuse, s_diffuse, in.uv);
}
"#;

/// Read the override at `path`, or fall back to [`SCENE_SHADER_SOURCE`].
///
/// A configured path that cannot be read is an error, never a silent fallback.
pub fn load_scene_shader_source(path: Option<&Path>) -> Result<Cow<'static, str>, ShaderError> {
    let Some(path) = path else {
        debug!("Using built-in scene shader");
        return Ok(Cow::Borrowed(SCENE_SHADER_SOURCE));
    };

    match std::fs::read_to_string(path) {
        Ok(source) => {
            info!("Loaded scene shader from {}", path.display());
            Ok(Cow::Owned(source))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ShaderError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ShaderError::IoError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn create_shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
