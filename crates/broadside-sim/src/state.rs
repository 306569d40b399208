//! Skirmish snapshot: the complete visible state after each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use broadside_core::enums::{Maneuver, Team, WeaponSlot};
use broadside_core::events::WeaponEvent;
use broadside_core::types::ControlOutputs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub tick: u64,
    pub elapsed_secs: f64,
    pub ships: Vec<ShipView>,
    pub events: Vec<SimEvent>,
}

impl SimSnapshot {
    pub fn ship(&self, name: &str) -> Option<&ShipView> {
        self.ships.iter().find(|ship| ship.name == name)
    }

    /// Surviving ships per team.
    pub fn alive(&self, team: Team) -> usize {
        self.ships
            .iter()
            .filter(|ship| ship.team == team && !ship.destroyed)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub id: u32,
    pub name: String,
    pub team: Team,
    pub position: Vec3,
    pub forward: Vec3,
    pub velocity: Vec3,
    pub hull: f32,
    pub destroyed: bool,
    /// Name of the locked target or formation leader.
    pub target: Option<String>,
    /// Maneuver chosen this tick; `None` when the pilot is idle.
    pub maneuver: Option<Maneuver>,
    pub primary_firing: bool,
    pub secondary_firing: bool,
    pub controls: ControlOutputs,
}

/// Things that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    Weapon {
        ship: String,
        slot: WeaponSlot,
        event: WeaponEvent,
    },
    Hit {
        attacker: String,
        target: String,
        damage: f32,
    },
    ShipDestroyed {
        ship: String,
    },
}
