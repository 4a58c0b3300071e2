//! Bounding-sphere impact tests.

use glam::Vec3;

/// A sphere used for point containment checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl CollisionSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive: a point exactly on the surface is inside.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Impact state for the session. Both flags only ever go from `false` to `true`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub meteor_crashed: bool,
    pub planet_crashed: bool,
}
