//! Core types and definitions for the BROADSIDE combat AI.
//!
//! This crate defines the vocabulary shared across all other crates:
//! poses and ship state, control outputs, enums, events, tunables and
//! their defaults. It has no dependency on any host engine.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod types;
