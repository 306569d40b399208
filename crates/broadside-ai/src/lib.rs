//! Combat and formation behaviors for BROADSIDE ships.
//!
//! Pure decision logic: every behavior reads plain ship/target state, drives
//! the weapons of a `Loadout` and returns control outputs. Nothing here owns
//! a clock; callers tick with their own `dt` and RNG.

pub mod combat;
pub mod fire_control;
pub mod formation;
pub mod pid;
pub mod snapshot;
pub mod steering;

pub use broadside_core as core;
