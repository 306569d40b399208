//! Enumeration types used throughout the combat AI.

use serde::{Deserialize, Serialize};

/// Firing cadence of a single trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerMode {
    /// One action per start, then back to idle.
    Single,
    /// `burst_size` actions, optionally repeated while held.
    Burst,
    /// One action every `action_interval` while held.
    #[default]
    Automatic,
    /// Held state is itself the firing signal (beams, flamers).
    OnOff,
}

/// Phase of the trigger schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPhase {
    #[default]
    Idle,
    /// Continuous (OnOff) firing.
    Firing,
    /// Waiting `action_interval` before the next action.
    WaitingBetweenShots,
    /// Waiting `burst_interval` before the next burst.
    WaitingBetweenBursts,
}

/// How a multi-unit weapon drives its units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringMode {
    /// Every unit fires together.
    #[default]
    Simultaneous,
    /// Units fire one after another, following the cursor.
    Sequential,
}

/// When a resource handler charges its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumptionPolicy {
    /// Fixed amount per firing round.
    #[default]
    PerUse,
    /// Amount per second while the weapon is held.
    PerSecond,
}

/// Which steering target the combat loop chose this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Maneuver {
    /// Fly directly at the target.
    #[default]
    Pursue,
    /// Circle the target keeping a flank toward it.
    Broadside,
    /// Hold station on a leader.
    Formation,
}

/// Which weapon slot of a loadout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSlot {
    Primary,
    Secondary,
}

/// Side in a skirmish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub fn is_hostile_to(self, other: Team) -> bool {
        self != other
    }
}
