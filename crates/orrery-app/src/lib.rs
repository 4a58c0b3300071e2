//! Orrery application: the frame driver, asset loading, platform
//! directories, and the winit event loop that ties them to the GPU.

pub mod assets;
pub mod clock;
pub mod frame_driver;
pub mod platform;
pub mod window;

pub use assets::{AssetError, SceneData, load_scene};
pub use clock::{FrameClock, MAX_FRAME_TIME};
pub use frame_driver::{FrameDriver, FrameOutcome, SceneAssets, SceneObject};
pub use platform::{PlatformDirs, PlatformError};
pub use window::{AppError, AppState, run};
