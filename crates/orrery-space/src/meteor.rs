//! Straight-line meteor fired from the camera toward the world origin.

use glam::{Mat4, Vec3};

/// Meteor lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MeteorState {
    /// Not yet fired.
    #[default]
    Idle,
    /// In flight. `velocity` is fixed at launch; there is no acceleration.
    Launched {
        origin: Vec3,
        velocity: Vec3,
        elapsed: f32,
    },
}

impl MeteorState {
    /// Fire from `origin` toward the world origin at `speed` units per second.
    ///
    /// A launch from the origin itself has no direction and stays put.
    #[must_use]
    pub fn launch(origin: Vec3, speed: f32) -> Self {
        MeteorState::Launched {
            origin,
            velocity: -origin.normalize_or_zero() * speed,
            elapsed: 0.0,
        }
    }

    #[must_use]
    pub fn is_launched(&self) -> bool {
        matches!(self, MeteorState::Launched { .. })
    }

    /// Current position, or `None` while idle.
    #[must_use]
    pub fn position(&self) -> Option<Vec3> {
        match *self {
            MeteorState::Idle => None,
            MeteorState::Launched {
                origin,
                velocity,
                elapsed,
            } => Some(origin + velocity * elapsed),
        }
    }

    /// Translation-only model matrix at the current position.
    #[must_use]
    pub fn model_matrix(&self) -> Option<Mat4> {
        self.position().map(Mat4::from_translation)
    }

    /// Advance time in flight. Idle meteors ignore this.
    pub fn advance(&mut self, dt: f32) {
        if let MeteorState::Launched { elapsed, .. } = self {
            *elapsed += dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_idle_has_no_position() {
        let meteor = MeteorState::default();
        assert!(!meteor.is_launched());
        assert_eq!(meteor.position(), None);
        assert_eq!(meteor.model_matrix(), None);
    }

    #[test]
    fn test_launch_velocity_points_at_origin() {
        let meteor = MeteorState::launch(Vec3::new(0.0, 0.0, 80.0), 10.0);
        let MeteorState::Launched { velocity, .. } = meteor else {
            panic!("expected launched meteor");
        };
        assert!((velocity - Vec3::new(0.0, 0.0, -10.0)).length() < EPS);
    }

    #[test]
    fn test_speed_is_fixed_regardless_of_distance() {
        for origin in [Vec3::new(3.0, 4.0, 0.0), Vec3::new(-100.0, 20.0, 7.0)] {
            let MeteorState::Launched { velocity, .. } = MeteorState::launch(origin, 10.0) else {
                panic!("expected launched meteor");
            };
            assert!((velocity.length() - 10.0).abs() < EPS);
        }
    }

    #[test]
    fn test_position_integrates_linearly() {
        let mut meteor = MeteorState::launch(Vec3::new(0.0, 0.0, 80.0), 10.0);
        assert_eq!(meteor.position(), Some(Vec3::new(0.0, 0.0, 80.0)));
        meteor.advance(1.5);
        meteor.advance(0.5);
        let pos = meteor.position().unwrap();
        assert!((pos - Vec3::new(0.0, 0.0, 60.0)).length() < EPS);
    }

    #[test]
    fn test_launch_from_origin_stays_put() {
        let mut meteor = MeteorState::launch(Vec3::ZERO, 10.0);
        meteor.advance(3.0);
        assert_eq!(meteor.position(), Some(Vec3::ZERO));
    }

    #[test]
    fn test_model_matrix_translation() {
        let mut meteor = MeteorState::launch(Vec3::new(10.0, 0.0, 0.0), 2.0);
        meteor.advance(1.0);
        let model = meteor.model_matrix().unwrap();
        assert!((model.w_axis.truncate() - Vec3::new(8.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_advance_ignored_when_idle() {
        let mut meteor = MeteorState::Idle;
        meteor.advance(1.0);
        assert_eq!(meteor, MeteorState::Idle);
    }
}
