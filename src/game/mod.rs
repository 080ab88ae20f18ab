// Game modules: character, physics, collisions and the simulation context

pub mod characters;
pub mod collision;
pub mod config;
pub mod obstacles;
pub mod physics;
pub mod simulation;
pub mod sink;
pub mod status;

pub use config::SimConfig;
pub use simulation::Simulation;
pub use sink::{RenderSink, WorldBounds};
pub use status::{DinoSkin, StatusChange};
