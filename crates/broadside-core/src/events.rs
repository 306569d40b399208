//! Events emitted by triggers and weapons for feedback layers.
//!
//! Owners buffer these per tick and hand them out through `drain_events`,
//! so audio/UI hooks never sit inside the decision logic.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponSlot;

/// Signals from a single trigger state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    Started,
    Stopped,
    /// One discrete action (a shot).
    Action,
}

/// Signals from a multi-unit weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WeaponEvent {
    FiringStarted,
    FiringStopped,
    /// Fire permission was denied. Emitted once per denial edge.
    FiringFailed,
    /// Unit at `unit` index discharged once.
    UnitFired { unit: usize },
    /// Unit at `unit` index started a continuous discharge.
    UnitBeamOn { unit: usize },
    /// Unit at `unit` index stopped a continuous discharge.
    UnitBeamOff { unit: usize },
}

/// A weapon event tagged with the slot it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEvent {
    pub slot: WeaponSlot,
    pub event: WeaponEvent,
}
