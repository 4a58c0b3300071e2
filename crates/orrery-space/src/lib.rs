//! Orbital simulation: planet rotation, the meteor, and bounding-sphere impacts.

pub mod collision;
pub mod meteor;
pub mod orbit;
pub mod simulator;

pub use collision::{CollisionFlags, CollisionSphere};
pub use meteor::MeteorState;
pub use orbit::OrbitState;
pub use simulator::{OrbitalSimulator, SceneUpdate, SimulationInput};
