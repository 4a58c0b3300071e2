//! One iteration of the scene: camera, simulation, draw, present.

use glam::Mat4;
use orrery_input::{Action, ActionState};
use orrery_player::CameraController;
use orrery_render::{MeshHandle, RenderBackend, TextureHandle};
use orrery_space::{OrbitalSimulator, SceneUpdate, SimulationInput};
use tracing::{error, info, warn};

/// Whether the session keeps running after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Exit,
}

/// A mesh and the texture it is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneObject {
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
}

/// Backend handles for everything the scene draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneAssets {
    pub sun: SceneObject,
    pub planet: SceneObject,
    pub meteor: SceneObject,
}

pub struct FrameDriver {
    camera: CameraController,
    simulator: OrbitalSimulator,
    assets: SceneAssets,
    last_update: Option<SceneUpdate>,
}

impl FrameDriver {
    pub fn new(camera: CameraController, simulator: OrbitalSimulator, assets: SceneAssets) -> Self {
        Self {
            camera,
            simulator,
            assets,
            last_update: None,
        }
    }

    /// Run one frame of `dt` seconds against `backend`.
    ///
    /// Draw order is fixed: sun, then the planet unless it was destroyed,
    /// then the meteor while it is in flight.
    pub fn frame<B: RenderBackend>(
        &mut self,
        dt: f32,
        actions: &ActionState,
        backend: &mut B,
    ) -> FrameOutcome {
        let matrices = self.camera.advance(actions, dt);

        let input = SimulationInput {
            rate_up: actions.is_action_active(Action::RateUp),
            rate_down: actions.is_action_active(Action::RateDown),
            launch: actions.is_action_active(Action::Launch),
            camera_position: self.camera.position(),
        };
        let update = self.simulator.tick(self.camera.last_elapsed(), &input);
        self.log_transitions(&update);

        backend.begin_frame(matrices.view_projection());
        let SceneAssets {
            sun,
            planet,
            meteor,
        } = self.assets;
        backend.draw_object(sun.mesh, sun.texture, Mat4::IDENTITY);
        if update.draw_planet() {
            backend.draw_object(planet.mesh, planet.texture, update.planet_model);
        }
        if let Some(model) = update.meteor_model {
            backend.draw_object(meteor.mesh, meteor.texture, model);
        }
        self.last_update = Some(update);

        match backend.end_frame() {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => warn!("Surface {e}, skipping frame"),
            Err(e) => {
                error!("Rendering failed: {e}");
                return FrameOutcome::Exit;
            }
        }

        if actions.is_action_active(Action::Exit) {
            info!("Exit requested");
            return FrameOutcome::Exit;
        }
        FrameOutcome::Continue
    }

    fn log_transitions(&self, update: &SceneUpdate) {
        let before = self.last_update.map(|u| u.flags).unwrap_or_default();
        if update.flags.planet_crashed && !before.planet_crashed {
            info!("Planet destroyed, no longer drawn");
        } else if update.flags.meteor_crashed && !before.meteor_crashed {
            info!("Meteor destroyed");
        }
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Mutable camera, for mouse look between frames.
    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn simulator(&self) -> &OrbitalSimulator {
        &self.simulator
    }

    /// Result of the most recent frame, if any has run.
    pub fn last_update(&self) -> Option<&SceneUpdate> {
        self.last_update.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_config::{CameraConfig, SimulationConfig};
    use orrery_render::{DrawCommand, SurfaceError};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Begin(Mat4),
        Draw(DrawCommand),
        End,
    }

    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<Call>,
        fail_with: Option<SurfaceError>,
    }

    impl RecordingBackend {
        fn draws(&self) -> Vec<DrawCommand> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw(d) => Some(*d),
                    _ => None,
                })
                .collect()
        }

        fn clear(&mut self) {
            self.calls.clear();
        }
    }

    impl RenderBackend for RecordingBackend {
        fn begin_frame(&mut self, view_proj: Mat4) {
            self.calls.push(Call::Begin(view_proj));
        }

        fn draw_object(&mut self, mesh: MeshHandle, texture: TextureHandle, model: Mat4) {
            self.calls.push(Call::Draw(DrawCommand {
                mesh,
                texture,
                model,
            }));
        }

        fn end_frame(&mut self) -> Result<(), SurfaceError> {
            self.calls.push(Call::End);
            match self.fail_with {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn assets() -> SceneAssets {
        let object = |i| SceneObject {
            mesh: MeshHandle(i),
            texture: TextureHandle(i),
        };
        SceneAssets {
            sun: object(0),
            planet: object(1),
            meteor: object(2),
        }
    }

    fn driver_with(simulation: &SimulationConfig) -> FrameDriver {
        FrameDriver::new(
            CameraController::from_config(&CameraConfig::default()),
            OrbitalSimulator::from_config(simulation),
            assets(),
        )
    }

    fn driver() -> FrameDriver {
        driver_with(&SimulationConfig::default())
    }

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_frame_brackets_draws() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        let outcome = driver.frame(DT, &ActionState::new(), &mut backend);

        assert_eq!(outcome, FrameOutcome::Continue);
        assert!(matches!(backend.calls.first(), Some(Call::Begin(_))));
        assert_eq!(backend.calls.last(), Some(&Call::End));
    }

    #[test]
    fn test_sun_then_planet_without_meteor() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        driver.frame(DT, &ActionState::new(), &mut backend);

        let draws = backend.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].mesh, MeshHandle(0));
        assert_eq!(draws[0].model, Mat4::IDENTITY);
        assert_eq!(draws[1].mesh, MeshHandle(1));
        assert_eq!(draws[1].texture, TextureHandle(1));
    }

    #[test]
    fn test_view_projection_comes_from_camera() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        driver.frame(0.0, &ActionState::new(), &mut backend);

        let expected = driver.camera().view_projection();
        assert_eq!(backend.calls[0], Call::Begin(expected));
    }

    #[test]
    fn test_launch_draws_meteor_last() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        let launch = ActionState::with_active([Action::Launch]);
        driver.frame(DT, &launch, &mut backend);

        let draws = backend.draws();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[2].mesh, MeshHandle(2));
        let origin = draws[2].model.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, 80.0)).length() < 1e-4);
    }

    #[test]
    fn test_meteor_moves_toward_origin() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        driver.frame(DT, &ActionState::with_active([Action::Launch]), &mut backend);
        for _ in 0..60 {
            backend.clear();
            driver.frame(DT, &ActionState::new(), &mut backend);
        }

        let meteor = backend.draws()[2].model.transform_point3(Vec3::ZERO);
        assert!((meteor.z - 70.0).abs() < 0.01, "meteor at {meteor}");
    }

    #[test]
    fn test_planet_hit_stops_planet_and_meteor_draws() {
        let simulation = SimulationConfig {
            sun_center: [1000.0, 0.0, 0.0],
            sun_radius: 0.0,
            planet_radius: 1000.0,
            ..SimulationConfig::default()
        };
        let mut driver = driver_with(&simulation);
        let mut backend = RecordingBackend::default();
        driver.frame(DT, &ActionState::with_active([Action::Launch]), &mut backend);

        let draws = backend.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].mesh, MeshHandle(0));
        assert!(driver.simulator().flags().planet_crashed);

        backend.clear();
        driver.frame(DT, &ActionState::with_active([Action::Launch]), &mut backend);
        assert_eq!(backend.draws().len(), 1);
    }

    #[test]
    fn test_sun_hit_keeps_planet() {
        let simulation = SimulationConfig {
            sun_radius: 1000.0,
            ..SimulationConfig::default()
        };
        let mut driver = driver_with(&simulation);
        let mut backend = RecordingBackend::default();
        driver.frame(DT, &ActionState::with_active([Action::Launch]), &mut backend);

        let meshes: Vec<_> = backend.draws().iter().map(|d| d.mesh).collect();
        assert_eq!(meshes, vec![MeshHandle(0), MeshHandle(1)]);
        assert!(driver.simulator().flags().meteor_crashed);
        assert!(!driver.simulator().flags().planet_crashed);
    }

    #[test]
    fn test_exit_binding_ends_after_presenting() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        let outcome = driver.frame(DT, &ActionState::with_active([Action::Exit]), &mut backend);

        assert_eq!(outcome, FrameOutcome::Exit);
        assert_eq!(backend.calls.last(), Some(&Call::End));
    }

    #[test]
    fn test_timeout_skips_frame_and_continues() {
        let mut driver = driver();
        let mut backend = RecordingBackend {
            fail_with: Some(SurfaceError::Timeout),
            ..Default::default()
        };
        let outcome = driver.frame(DT, &ActionState::new(), &mut backend);
        assert_eq!(outcome, FrameOutcome::Continue);
    }

    #[test]
    fn test_lost_surface_ends_session() {
        for error in [SurfaceError::Lost, SurfaceError::OutOfMemory] {
            let mut driver = driver();
            let mut backend = RecordingBackend {
                fail_with: Some(error),
                ..Default::default()
            };
            let outcome = driver.frame(DT, &ActionState::new(), &mut backend);
            assert_eq!(outcome, FrameOutcome::Exit);
        }
    }

    #[test]
    fn test_rate_keys_reach_simulator() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        driver.frame(DT, &ActionState::with_active([Action::RateUp]), &mut backend);
        assert!((driver.simulator().rate() - 1.01).abs() < 1e-6);

        driver.frame(DT, &ActionState::with_active([Action::RateDown]), &mut backend);
        driver.frame(DT, &ActionState::with_active([Action::RateDown]), &mut backend);
        assert!((driver.simulator().rate() - 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_forward_moves_camera() {
        let mut driver = driver();
        let mut backend = RecordingBackend::default();
        let forward = ActionState::with_active([Action::MoveForward]);
        for _ in 0..10 {
            driver.frame(0.1, &forward, &mut backend);
        }
        let moved = (driver.camera().position() - Vec3::new(0.0, 0.0, 80.0)).length();
        assert!((moved - 30.0).abs() < 1e-3);
    }
}
