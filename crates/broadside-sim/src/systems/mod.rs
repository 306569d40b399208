//! ECS systems that operate on the skirmish world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! Behavior state lives in components; loadouts live in the engine's
//! armament map and are passed in explicitly.

pub mod behavior;
pub mod kinematics;
pub mod snapshot;
pub mod targeting;
pub mod weapons;
