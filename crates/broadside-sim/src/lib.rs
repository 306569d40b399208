//! Headless skirmish harness for BROADSIDE.
//!
//! Owns a hecs ECS world of ships, runs targeting, behaviors, weapons and
//! kinematics at a fixed tick, and produces serializable snapshots.

pub mod components;
pub mod engine;
pub mod error;
pub mod state;
pub mod systems;
pub mod world_setup;

pub use broadside_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use error::SimError;
