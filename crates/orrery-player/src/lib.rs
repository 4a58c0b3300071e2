//! Camera controller: pose state, key-driven movement, and view/projection matrices.

pub mod camera_controller;

pub use camera_controller::{CameraController, CameraMatrices, CameraState};
