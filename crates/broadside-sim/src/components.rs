//! ECS components for ships in the skirmish world.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use broadside_ai::combat::CombatBehavior;
use broadside_ai::formation::FormationBehavior;
use broadside_core::enums::{Maneuver, Team};
use broadside_core::types::{ControlOutputs, Pose, ShipState, TargetState};

/// Identity of a ship.
#[derive(Debug, Clone)]
pub struct Ship {
    pub name: String,
    pub team: Team,
}

/// Pose and motion of a ship.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kinematics {
    pub pose: Pose,
    /// World-space velocity (m/s).
    pub velocity: Vec3,
    /// Local angular velocity (rad/s): x pitch, y yaw, z roll.
    pub angular_velocity: Vec3,
}

impl Kinematics {
    pub fn new(position: Vec3, rotation: Quat, velocity: Vec3) -> Self {
        Self {
            pose: Pose::new(position, rotation),
            velocity,
            angular_velocity: Vec3::ZERO,
        }
    }

    pub fn ship_state(&self) -> ShipState {
        ShipState {
            pose: self.pose,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
        }
    }

    pub fn target_state(&self) -> TargetState {
        TargetState {
            pose: self.pose,
            velocity: self.velocity,
        }
    }
}

/// How hard a ship can push and turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Performance {
    /// Acceleration at full movement output (m/s²).
    pub max_thrust: f32,
    /// Turn rate at full steering output (rad/s).
    pub max_turn_rate: f32,
    /// Fraction of velocity shed per second.
    pub linear_drag: f32,
}

impl Default for Performance {
    fn default() -> Self {
        Self {
            max_thrust: 40.0,
            max_turn_rate: 1.2,
            linear_drag: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hull {
    pub integrity: f32,
    pub max_integrity: f32,
}

impl Hull {
    pub fn new(max_integrity: f32) -> Self {
        Self {
            integrity: max_integrity,
            max_integrity,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.integrity <= 0.0
    }

    /// Apply damage. Returns true if this hit destroyed the hull.
    pub fn apply_damage(&mut self, damage: f32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.integrity = (self.integrity - damage).max(0.0);
        self.is_destroyed()
    }
}

/// The behavior flying a ship.
#[derive(Debug, Clone)]
pub enum Pilot {
    Combat(CombatBehavior),
    Formation {
        behavior: FormationBehavior,
        leader: hecs::Entity,
    },
}

/// Currently selected target, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetLock(pub Option<hecs::Entity>);

/// Control outputs written by the behavior system, read by kinematics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls(pub ControlOutputs);

/// Maneuver the pilot flew this tick; `None` while idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveManeuver(pub Option<Maneuver>);
