//! Free camera driven by six movement bindings.
//!
//! Orientation is two angles. Direction, right and up are derived from them
//! every call; nothing but the position changes in response to keys.

use glam::{Mat4, Vec2, Vec3};
use orrery_config::CameraConfig;
use orrery_input::{Action, ActionState};
use std::f32::consts::FRAC_PI_2;

/// Mutable camera pose.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Radians around world Y.
    pub horizontal_angle: f32,
    /// Radians above the horizon.
    pub vertical_angle: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Units per second.
    pub speed: f32,
}

/// View and projection produced by one [`CameraController::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    /// `projection * view`.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Owns the [`CameraState`] and is its only writer.
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    near: f32,
    far: f32,
    mouse_look: bool,
    mouse_sensitivity: f32,
    last_elapsed: f32,
}

impl CameraController {
    pub fn new(state: CameraState, near: f32, far: f32) -> Self {
        Self {
            state,
            near,
            far,
            mouse_look: false,
            mouse_sensitivity: 0.0,
            last_elapsed: 0.0,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let state = CameraState {
            position: Vec3::from_array(config.position),
            horizontal_angle: config.horizontal_angle,
            vertical_angle: config.vertical_angle,
            fov_degrees: config.fov_degrees,
            speed: config.speed,
        };
        Self {
            mouse_look: config.mouse_look,
            mouse_sensitivity: config.mouse_sensitivity,
            ..Self::new(state, config.near, config.far)
        }
    }

    /// Move the camera for one frame and return fresh matrices.
    ///
    /// Each held movement binding adds `elapsed * speed` along its axis;
    /// simultaneous bindings sum.
    pub fn advance(&mut self, actions: &ActionState, elapsed: f32) -> CameraMatrices {
        self.last_elapsed = elapsed;

        let direction = self.direction();
        let right = self.right();
        let up = self.up();
        let step = elapsed * self.state.speed;

        let moves = [
            (Action::MoveForward, direction),
            (Action::MoveBack, -direction),
            (Action::StrafeRight, right),
            (Action::StrafeLeft, -right),
            (Action::MoveUp, up),
            (Action::MoveDown, -up),
        ];
        for (action, axis) in moves {
            if actions.is_action_active(action) {
                self.state.position += axis * step;
            }
        }

        self.matrices()
    }

    /// Apply a mouse delta in pixels. No-op unless mouse look is enabled.
    pub fn look(&mut self, delta: Vec2) {
        if !self.mouse_look {
            return;
        }
        let limit = FRAC_PI_2 - 0.01;
        self.state.horizontal_angle -= delta.x * self.mouse_sensitivity;
        self.state.vertical_angle = (self.state.vertical_angle
            - delta.y * self.mouse_sensitivity)
            .clamp(-limit, limit);
    }

    /// Matrices for the current pose without moving.
    #[must_use]
    pub fn matrices(&self) -> CameraMatrices {
        CameraMatrices {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
        }
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let position = self.state.position;
        Mat4::look_at_rh(position, position + self.direction(), self.up())
    }

    /// Reverse-Z perspective with unit aspect ratio.
    ///
    /// Near maps to depth 1 and far to depth 0, matching a `GreaterEqual`
    /// depth test cleared to 0.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.state.fov_degrees.to_radians(),
            1.0,
            self.far,
            self.near,
        )
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.matrices().view_projection()
    }

    #[must_use]
    pub fn direction(&self) -> Vec3 {
        let (h, v) = (self.state.horizontal_angle, self.state.vertical_angle);
        Vec3::new(v.cos() * h.sin(), v.sin(), v.cos() * h.cos())
    }

    /// Horizontal right vector, a quarter turn clockwise from the heading.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        let h = self.state.horizontal_angle - FRAC_PI_2;
        Vec3::new(h.sin(), 0.0, h.cos())
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.direction())
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Elapsed time passed to the most recent [`advance`](Self::advance).
    #[must_use]
    pub fn last_elapsed(&self) -> f32 {
        self.last_elapsed
    }

    #[must_use]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    #[must_use]
    pub fn mouse_look_enabled(&self) -> bool {
        self.mouse_look
    }
}
