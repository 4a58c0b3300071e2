//! Per-frame orbital simulation.
//!
//! Each [`OrbitalSimulator::tick`] runs, in order: the rotation step gate,
//! the rate controls, the planet position update, the meteor launch or
//! flight, and finally the impact tests against the sun and planet spheres.

use glam::{Mat4, Vec3};
use log::{debug, info};
use orrery_config::SimulationConfig;

use crate::collision::{CollisionFlags, CollisionSphere};
use crate::meteor::MeteorState;
use crate::orbit::{OrbitState, orbit_position};

/// What the simulator reads from the outside world each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationInput {
    pub rate_up: bool,
    pub rate_down: bool,
    pub launch: bool,
    /// Camera position, used as the meteor origin on launch.
    pub camera_position: Vec3,
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneUpdate {
    /// Planet rotation in degrees.
    pub rotation: f32,
    pub planet_model: Mat4,
    /// Present only while the meteor is in flight and has not crashed.
    pub meteor_model: Option<Mat4>,
    pub flags: CollisionFlags,
}

impl SceneUpdate {
    #[must_use]
    pub fn draw_planet(&self) -> bool {
        !self.flags.planet_crashed
    }
}

/// Owns orbit, meteor and collision state. Single-threaded; the frame driver
/// is the only caller.
#[derive(Clone, Debug)]
pub struct OrbitalSimulator {
    config: SimulationConfig,
    orbit: OrbitState,
    meteor: MeteorState,
    flags: CollisionFlags,
}

impl OrbitalSimulator {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            config: config.clone(),
            orbit: OrbitState::new(config.initial_rate, config.orbit_radius),
            meteor: MeteorState::Idle,
            flags: CollisionFlags::default(),
        }
    }

    /// Advance the scene by `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f32, input: &SimulationInput) -> SceneUpdate {
        self.orbit.accumulate(
            elapsed,
            self.config.rotation_interval,
            self.config.rotation_step_degrees,
        );

        if input.rate_down {
            self.orbit.rate -= self.config.rate_step;
            debug!("Orbit rate decreased to {:.2}", self.orbit.rate);
        }
        if input.rate_up {
            self.orbit.rate += self.config.rate_step;
            debug!("Orbit rate increased to {:.2}", self.orbit.rate);
        }

        if !self.flags.planet_crashed {
            self.orbit.planet_position =
                orbit_position(self.orbit.rotation, self.config.orbit_radius);
        }

        self.update_meteor(elapsed, input);

        SceneUpdate {
            rotation: self.orbit.rotation,
            planet_model: self.orbit.planet_model(),
            meteor_model: self.visible_meteor_model(),
            flags: self.flags,
        }
    }

    fn update_meteor(&mut self, elapsed: f32, input: &SimulationInput) {
        if self.flags.meteor_crashed {
            return;
        }

        match self.meteor {
            MeteorState::Idle if input.launch => {
                self.meteor = MeteorState::launch(input.camera_position, self.config.meteor_speed);
                info!("Meteor launched from {}", input.camera_position);
            }
            MeteorState::Idle => return,
            MeteorState::Launched { .. } => self.meteor.advance(elapsed),
        }

        let Some(position) = self.meteor.position() else {
            return;
        };

        if self.sun_sphere().contains(position) {
            self.flags.meteor_crashed = true;
            info!("Meteor hit the sun at {position}");
        }
        if self.planet_sphere().contains(position) {
            self.flags.meteor_crashed = true;
            self.flags.planet_crashed = true;
            info!("Meteor hit the planet at {position}");
        }
    }

    fn visible_meteor_model(&self) -> Option<Mat4> {
        if self.flags.meteor_crashed {
            None
        } else {
            self.meteor.model_matrix()
        }
    }

    /// Sun impact sphere: configured centre plus the collision offset.
    #[must_use]
    pub fn sun_sphere(&self) -> CollisionSphere {
        let offset = Vec3::from_array(self.config.collision_offset);
        CollisionSphere::new(
            Vec3::from_array(self.config.sun_center) + offset,
            self.config.sun_radius,
        )
    }

    /// Planet impact sphere: live planet position plus the collision offset.
    #[must_use]
    pub fn planet_sphere(&self) -> CollisionSphere {
        let offset = Vec3::from_array(self.config.collision_offset);
        CollisionSphere::new(
            self.orbit.planet_position + offset,
            self.config.planet_radius,
        )
    }

    /// Planet rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.orbit.rotation
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.orbit.rate
    }

    #[must_use]
    pub fn planet_position(&self) -> Vec3 {
        self.orbit.planet_position
    }

    #[must_use]
    pub fn meteor(&self) -> &MeteorState {
        &self.meteor
    }

    #[must_use]
    pub fn flags(&self) -> CollisionFlags {
        self.flags
    }

    #[cfg(test)]
    fn set_rate(&mut self, rate: f32) {
        self.orbit.rate = rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;
    const INTERVAL: f32 = 1.0 / 60.0;

    fn simulator() -> OrbitalSimulator {
        OrbitalSimulator::from_config(&SimulationConfig::default())
    }

    fn idle() -> SimulationInput {
        SimulationInput::default()
    }

    fn launch_from(position: Vec3) -> SimulationInput {
        SimulationInput {
            launch: true,
            camera_position: position,
            ..SimulationInput::default()
        }
    }

    #[test]
    fn test_rotation_advances_half_degree_per_interval() {
        let mut sim = simulator();
        let mut previous = sim.rotation();
        for i in 1..=120 {
            let update = sim.tick(INTERVAL, &idle());
            assert!(update.rotation > previous);
            assert!((update.rotation - 0.5 * i as f32).abs() < EPS);
            previous = update.rotation;
        }
    }

    #[test]
    fn test_short_ticks_do_not_rotate_every_call() {
        let mut sim = simulator();
        for _ in 0..4 {
            sim.tick(INTERVAL / 4.0, &idle());
        }
        assert!(sim.rotation() <= 0.5 + EPS);
    }

    #[test]
    fn test_vsync_jitter_keeps_orbit_at_full_speed() {
        let mut sim = simulator();
        for i in 0..60 {
            let dt = if i % 2 == 0 { 0.0166 } else { 0.0167 };
            sim.tick(dt, &idle());
        }
        assert!(
            (29.0..=30.0 + EPS).contains(&sim.rotation()),
            "rotation {}",
            sim.rotation()
        );
    }

    #[test]
    fn test_zero_rate_freezes_rotation() {
        let mut sim = simulator();
        sim.set_rate(0.0);
        for _ in 0..500 {
            sim.tick(INTERVAL, &idle());
        }
        assert_eq!(sim.rotation(), 0.0);
    }

    #[test]
    fn test_rate_controls_step_by_hundredth() {
        let mut sim = simulator();
        let up = SimulationInput {
            rate_up: true,
            ..idle()
        };
        for _ in 0..10 {
            sim.tick(0.0, &up);
        }
        assert!((sim.rate() - 1.1).abs() < EPS);

        let down = SimulationInput {
            rate_down: true,
            ..idle()
        };
        for _ in 0..200 {
            sim.tick(0.0, &down);
        }
        assert!((sim.rate() + 0.9).abs() < EPS);
    }

    #[test]
    fn test_rate_change_applies_after_rotation_step() {
        let mut sim = simulator();
        let up = SimulationInput {
            rate_up: true,
            ..idle()
        };
        let update = sim.tick(INTERVAL, &up);
        assert!((update.rotation - 0.5).abs() < EPS);
        let update = sim.tick(INTERVAL, &idle());
        assert!((update.rotation - (0.5 + 0.505)).abs() < EPS);
    }

    #[test]
    fn test_negative_rate_reverses_orbit() {
        let mut sim = simulator();
        sim.set_rate(-1.0);
        sim.tick(INTERVAL, &idle());
        assert!((sim.rotation() + 0.5).abs() < EPS);
        assert!(sim.planet_position().z > 0.0);
    }

    #[test]
    fn test_planet_position_follows_rotation() {
        let mut sim = simulator();
        for _ in 0..180 {
            sim.tick(INTERVAL, &idle());
        }
        // 90 degrees
        assert!((sim.planet_position() - Vec3::new(0.0, 0.0, -25.0)).length() < EPS);
    }

    #[test]
    fn test_meteor_not_drawn_before_launch() {
        let mut sim = simulator();
        let update = sim.tick(INTERVAL, &idle());
        assert!(update.meteor_model.is_none());
        assert!(!sim.meteor().is_launched());
    }

    #[test]
    fn test_launch_captures_camera_position() {
        let mut sim = simulator();
        let camera = Vec3::new(0.0, 0.0, 80.0);
        let update = sim.tick(INTERVAL, &launch_from(camera));
        let model = update.meteor_model.unwrap();
        assert!((model.w_axis.truncate() - camera).length() < EPS);
    }

    #[test]
    fn test_launch_is_idempotent() {
        let mut sim = simulator();
        sim.tick(INTERVAL, &launch_from(Vec3::new(0.0, 0.0, 80.0)));
        let MeteorState::Launched {
            origin, velocity, ..
        } = *sim.meteor()
        else {
            panic!("expected launched meteor");
        };

        sim.tick(INTERVAL, &launch_from(Vec3::new(50.0, 10.0, 0.0)));
        let MeteorState::Launched {
            origin: origin2,
            velocity: velocity2,
            ..
        } = *sim.meteor()
        else {
            panic!("expected launched meteor");
        };
        assert_eq!(origin, origin2);
        assert_eq!(velocity, velocity2);
    }

    #[test]
    fn test_meteor_flies_toward_origin() {
        let mut sim = simulator();
        sim.tick(0.0, &launch_from(Vec3::new(0.0, 0.0, 80.0)));
        for _ in 0..10 {
            sim.tick(0.5, &idle());
        }
        let pos = sim.meteor().position().unwrap();
        assert!((pos - Vec3::new(0.0, 0.0, 30.0)).length() < EPS);
        assert!(!sim.flags().meteor_crashed);
    }

    #[test]
    fn test_sun_boundary_is_inclusive() {
        let mut sim = simulator();
        let update = sim.tick(0.0, &launch_from(Vec3::new(17.0, 2.0, 2.0)));
        assert!(update.flags.meteor_crashed);
        assert!(!update.flags.planet_crashed);
        assert!(update.meteor_model.is_none());
    }

    #[test]
    fn test_just_outside_sun_is_a_miss() {
        let mut sim = simulator();
        let update = sim.tick(0.0, &launch_from(Vec3::new(17.0001, 2.0, 2.0)));
        assert!(!update.flags.meteor_crashed);
        assert!(update.meteor_model.is_some());
    }

    #[test]
    fn test_meteor_reaches_sun() {
        let mut sim = simulator();
        sim.tick(0.0, &launch_from(Vec3::new(0.0, 0.0, 80.0)));
        let mut crashed_at = None;
        for i in 0..200 {
            if sim.tick(0.1, &idle()).flags.meteor_crashed {
                crashed_at = Some(i);
                break;
            }
        }
        // Sphere surface toward the camera is near z = 2 + sqrt(15^2 - 8).
        let ticks = crashed_at.expect("meteor never hit the sun");
        assert!((60..70).contains(&ticks));
        assert!(!sim.flags().planet_crashed);
    }

    #[test]
    fn test_planet_hit_is_terminal() {
        let mut sim = simulator();
        let target = sim.planet_position() + Vec3::splat(2.0);
        let update = sim.tick(0.0, &launch_from(target));
        assert!(update.flags.meteor_crashed);
        assert!(update.flags.planet_crashed);
        assert!(!update.draw_planet());

        let frozen = sim.planet_position();
        for _ in 0..60 {
            let update = sim.tick(INTERVAL, &idle());
            assert!(update.flags.planet_crashed);
            assert!(update.meteor_model.is_none());
        }
        assert_eq!(sim.planet_position(), frozen);
        assert!(sim.rotation() > 0.0);
    }

    #[test]
    fn test_planet_sphere_uses_offset() {
        let sim = simulator();
        let sphere = sim.planet_sphere();
        assert!((sphere.center - Vec3::new(27.0, 2.0, 2.0)).length() < EPS);
        assert!((sphere.radius - 5.0).abs() < EPS);
    }

    #[test]
    fn test_no_relaunch_after_impact() {
        let mut sim = simulator();
        sim.tick(0.0, &launch_from(Vec3::new(2.0, 2.0, 2.0)));
        assert!(sim.flags().meteor_crashed);
        let before = *sim.meteor();

        let update = sim.tick(INTERVAL, &launch_from(Vec3::new(0.0, 0.0, 80.0)));
        assert!(update.meteor_model.is_none());
        assert_eq!(*sim.meteor(), before);
    }

    #[test]
    fn test_crashed_meteor_stops_moving() {
        let mut sim = simulator();
        sim.tick(0.0, &launch_from(Vec3::new(2.0, 2.0, 10.0)));
        let before = sim.meteor().position();
        sim.tick(5.0, &idle());
        assert_eq!(sim.meteor().position(), before);
    }
}
