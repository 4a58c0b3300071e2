//! Scene assets: three OBJ models and their textures, loaded before the
//! event loop starts and uploaded once the GPU exists.

use std::path::{Path, PathBuf};

use orrery_config::AssetConfig;
use orrery_mesh::{Mesh, ParseError, load_obj};
use orrery_render::{TextureError, WgpuBackend};
use thiserror::Error;
use tracing::{info, warn};

use crate::frame_driver::{SceneAssets, SceneObject};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load model {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to decode texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to upload texture '{name}': {source}")]
    Upload {
        name: String,
        #[source]
        source: TextureError,
    },
}

/// Decoded RGBA8 pixels, top row first.
#[derive(Debug, Clone)]
pub struct DecodedTexture {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// A model with its texture, still on the CPU.
#[derive(Debug, Clone)]
pub struct LoadedObject {
    pub name: &'static str,
    pub mesh: Mesh,
    pub texture: DecodedTexture,
}

#[derive(Debug, Clone)]
pub struct SceneData {
    pub sun: LoadedObject,
    pub planet: LoadedObject,
    pub meteor: LoadedObject,
}

/// Load every model and texture named in `config`. Any failure aborts.
pub fn load_scene(config: &AssetConfig) -> Result<SceneData, AssetError> {
    info!("Loading scene assets from {}", config.asset_dir.display());
    Ok(SceneData {
        sun: load_object(config, "sun", &config.sun_mesh, &config.sun_texture)?,
        planet: load_object(config, "planet", &config.planet_mesh, &config.planet_texture)?,
        meteor: load_object(config, "meteor", &config.meteor_mesh, &config.meteor_texture)?,
    })
}

fn load_object(
    config: &AssetConfig,
    name: &'static str,
    mesh_path: &Path,
    texture_path: &Path,
) -> Result<LoadedObject, AssetError> {
    let mesh_path = config.resolve(mesh_path);
    let mesh = load_obj(&mesh_path).map_err(|source| AssetError::Model {
        path: mesh_path.clone(),
        source,
    })?;
    if mesh.is_empty() {
        warn!("Model {} has no faces, {name} will be invisible", mesh_path.display());
    }

    let texture = decode_texture(&config.resolve(texture_path))?;
    Ok(LoadedObject {
        name,
        mesh,
        texture,
    })
}

pub fn decode_texture(path: &Path) -> Result<DecodedTexture, AssetError> {
    let image = image::open(path)
        .map_err(|source| AssetError::Texture {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    info!("Decoded texture {} ({width}x{height})", path.display());

    Ok(DecodedTexture {
        rgba: image.into_raw(),
        width,
        height,
    })
}

/// Upload the scene to the GPU and return the handles the frame driver draws with.
pub fn upload_scene(backend: &mut WgpuBackend, scene: &SceneData) -> Result<SceneAssets, AssetError> {
    Ok(SceneAssets {
        sun: upload_object(backend, &scene.sun)?,
        planet: upload_object(backend, &scene.planet)?,
        meteor: upload_object(backend, &scene.meteor)?,
    })
}

fn upload_object(backend: &mut WgpuBackend, object: &LoadedObject) -> Result<SceneObject, AssetError> {
    let mesh = backend.upload_mesh(object.name, &object.mesh);
    let texture = &object.texture;
    let texture = backend
        .upload_texture(object.name, &texture.rgba, texture.width, texture.height)
        .map_err(|source| AssetError::Upload {
            name: object.name.to_string(),
            source,
        })?;
    Ok(SceneObject { mesh, texture })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    fn write_scene(dir: &Path) {
        for name in ["sun", "planet", "meteor"] {
            std::fs::write(dir.join(format!("{name}.obj")), TRIANGLE_OBJ).unwrap();
            let pixels = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 128, 0, 255]));
            pixels.save(dir.join(format!("{name}.png"))).unwrap();
        }
    }

    fn png_config(dir: &Path) -> AssetConfig {
        AssetConfig {
            asset_dir: dir.to_path_buf(),
            sun_texture: PathBuf::from("sun.png"),
            planet_texture: PathBuf::from("planet.png"),
            meteor_texture: PathBuf::from("meteor.png"),
            ..AssetConfig::default()
        }
    }

    #[test]
    fn test_load_scene_reads_all_objects() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path());

        let scene = load_scene(&png_config(dir.path())).unwrap();
        for object in [&scene.sun, &scene.planet, &scene.meteor] {
            assert_eq!(object.mesh.triangle_count(), 1);
            assert_eq!((object.texture.width, object.texture.height), (4, 2));
            assert_eq!(object.texture.rgba.len(), 4 * 2 * 4);
        }
        assert_eq!(scene.planet.name, "planet");
    }

    #[test]
    fn test_decoded_pixels_are_rgba() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path());

        let texture = decode_texture(&dir.path().join("sun.png")).unwrap();
        assert_eq!(&texture.rgba[..4], &[255, 128, 0, 255]);
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path());
        std::fs::remove_file(dir.path().join("planet.obj")).unwrap();

        match load_scene(&png_config(dir.path())) {
            Err(AssetError::Model { path, source }) => {
                assert!(path.ends_with("planet.obj"));
                assert!(matches!(source, ParseError::FileNotFound { .. }));
            }
            other => panic!("expected model error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_texture_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path());
        std::fs::remove_file(dir.path().join("meteor.png")).unwrap();

        let err = load_scene(&png_config(dir.path())).unwrap_err();
        assert!(matches!(err, AssetError::Texture { ref path, .. } if path.ends_with("meteor.png")));
    }

    #[test]
    fn test_malformed_face_names_the_model() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path());
        std::fs::write(dir.path().join("sun.obj"), "v 0 0 0\nf 1 1 1\n").unwrap();

        let err = load_scene(&png_config(dir.path())).unwrap_err();
        assert!(err.to_string().contains("sun.obj"));
    }
}
