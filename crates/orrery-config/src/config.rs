//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Model and texture locations.
    pub assets: AssetConfig,
    /// Initial camera pose and projection.
    pub camera: CameraConfig,
    /// Orbit, meteor, and collision tuning.
    pub simulation: SimulationConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Clear color as linear RGBA.
    pub clear_color: [f64; 4],
    /// Cull triangles facing away from the camera.
    pub cull_back_faces: bool,
    /// Optional WGSL file replacing the built-in textured shader.
    pub shader_path: Option<PathBuf>,
}

/// Locations of the three scene models and their textures.
///
/// Relative paths are resolved against `asset_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory for every asset path below.
    pub asset_dir: PathBuf,
    pub sun_mesh: PathBuf,
    pub planet_mesh: PathBuf,
    pub meteor_mesh: PathBuf,
    pub sun_texture: PathBuf,
    pub planet_texture: PathBuf,
    pub meteor_texture: PathBuf,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position in world units.
    pub position: [f32; 3],
    /// Horizontal angle in radians (3.14 looks down -Z).
    pub horizontal_angle: f32,
    /// Vertical angle in radians.
    pub vertical_angle: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Let mouse motion steer the camera angles.
    pub mouse_look: bool,
    /// Radians per pixel of mouse motion when `mouse_look` is on.
    pub mouse_sensitivity: f32,
}

/// Orbit, meteor, and collision tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Distance of the planet from the world origin.
    pub orbit_radius: f32,
    /// Degrees added to the rotation angle per qualifying tick, before the rate multiplier.
    pub rotation_step_degrees: f32,
    /// Minimum accumulated seconds between rotation increments.
    pub rotation_interval: f32,
    /// Starting value of the rate multiplier.
    pub initial_rate: f32,
    /// Change applied to the rate multiplier per tick while a rate key is held.
    pub rate_step: f32,
    /// Meteor speed in units per second.
    pub meteor_speed: f32,
    /// Sun position before the collision offset is applied.
    pub sun_center: [f32; 3],
    /// Sun collision radius.
    pub sun_radius: f32,
    /// Planet collision radius.
    pub planet_radius: f32,
    /// Offset added to both collision sphere centers.
    pub collision_offset: [f32; 3],
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name), e.g. `"Launch": "KeyL"`.
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            vsync: true,
            title: "Hliako Systhma".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            cull_back_faces: true,
            shader_path: None,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("."),
            sun_mesh: PathBuf::from("sun.obj"),
            planet_mesh: PathBuf::from("planet.obj"),
            meteor_mesh: PathBuf::from("meteor.obj"),
            sun_texture: PathBuf::from("sun.jpg"),
            planet_texture: PathBuf::from("planet.jpg"),
            meteor_texture: PathBuf::from("meteor.jpg"),
        }
    }
}

// The scene was tuned against 3.14, not PI.
#[allow(clippy::approx_constant)]
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 80.0],
            horizontal_angle: 3.14,
            vertical_angle: 0.0,
            fov_degrees: 45.0,
            speed: 30.0,
            near: 0.1,
            far: 600.0,
            mouse_look: false,
            mouse_sensitivity: 0.005,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 25.0,
            rotation_step_degrees: 0.5,
            rotation_interval: 1.0 / 60.0,
            initial_rate: 1.0,
            rate_step: 0.01,
            meteor_speed: 10.0,
            sun_center: [0.0, 0.0, 0.0],
            sun_radius: 15.0,
            planet_radius: 5.0,
            collision_offset: [2.0, 2.0, 2.0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl AssetConfig {
    /// Resolve an asset path against `asset_dir`. Absolute paths pass through.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.asset_dir.join(path)
    }
}

impl SimulationConfig {
    /// Reject values the simulator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation_interval.is_nan() || self.rotation_interval <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.rotation_interval",
                reason: "must be greater than zero",
            });
        }
        if self.sun_radius < 0.0 || self.planet_radius < 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.*_radius",
                reason: "collision radii must not be negative",
            });
        }
        if self.meteor_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.meteor_speed",
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
