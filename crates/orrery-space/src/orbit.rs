//! Planet rotation bookkeeping.

use glam::{Mat4, Vec3};

/// Planet rotation and its derived orbit position.
///
/// `rotation` is in degrees and only changes in whole steps of
/// `step * rate`. The rate multiplier is unbounded; negative values run the
/// orbit backwards and zero stops it.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitState {
    pub rotation: f32,
    pub rate: f32,
    pub planet_position: Vec3,
    since_step: f32,
}

impl OrbitState {
    pub fn new(rate: f32, radius: f32) -> Self {
        Self {
            rotation: 0.0,
            rate,
            planet_position: orbit_position(0.0, radius),
            since_step: 0.0,
        }
    }

    /// Accumulate `dt` and apply one rotation step once `interval` has passed.
    ///
    /// Time past the interval carries into the next step, wrapped below one
    /// interval so at most one step fires per call. Returns whether a step fired.
    pub fn accumulate(&mut self, dt: f32, interval: f32, step: f32) -> bool {
        self.since_step += dt;
        if self.since_step >= interval {
            self.rotation += step * self.rate;
            self.since_step = (self.since_step - interval) % interval;
            true
        } else {
            false
        }
    }

    /// Rotation-only model matrix about world Y.
    #[must_use]
    pub fn planet_model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation.to_radians())
    }
}

/// Point on the XZ orbit circle for a rotation in degrees.
///
/// Matches rotating `(radius, 0, 0)` about +Y by the same angle.
#[must_use]
pub fn orbit_position(rotation_degrees: f32, radius: f32) -> Vec3 {
    let theta = rotation_degrees.to_radians();
    Vec3::new(radius * theta.cos(), 0.0, -radius * theta.sin())
}
