//! Weapons for BROADSIDE.
//!
//! Trigger cadence, multi-unit weapon coordination, resource gating and
//! the firing-solution check used by the AI.

pub mod loadout;
pub mod resource;
pub mod solution;
pub mod trigger;
pub mod unit;
pub mod weapon;

pub use broadside_core as core;

#[cfg(test)]
mod tests;
