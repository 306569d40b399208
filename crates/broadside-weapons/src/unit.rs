//! Weapon units: the individual barrels, launchers and emitters of a weapon.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use broadside_core::config::TriggerSettings;
use broadside_core::types::{angle_between_deg, Pose};

use crate::trigger::Trigger;

/// Where a unit sits on the ship and how far it can swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GimbalMount {
    /// Mount position in ship-local space.
    pub offset: Vec3,
    /// Rest direction in ship-local space.
    pub rest_forward: Vec3,
    /// How far the gimbal can traverse from rest (degrees). 0 = fixed mount.
    pub traverse_limit_deg: f32,
    /// Aimed by its own controller (a player turret); ignored by the AI's
    /// solution check.
    pub independent: bool,
}

impl Default for GimbalMount {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rest_forward: Vec3::Z,
            traverse_limit_deg: 0.0,
            independent: false,
        }
    }
}

impl GimbalMount {
    pub fn fixed(offset: Vec3) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    pub fn turret(offset: Vec3, rest_forward: Vec3, traverse_limit_deg: f32) -> Self {
        Self {
            offset,
            rest_forward,
            traverse_limit_deg,
            independent: false,
        }
    }

    /// World position of the mount.
    pub fn world_position(&self, ship: &Pose) -> Vec3 {
        ship.transform_point(self.offset)
    }

    /// Angle (degrees) between the rest direction and the line to `target`.
    pub fn offset_angle(&self, ship: &Pose, target: Vec3) -> f32 {
        let rest = ship.rotation * self.rest_forward;
        angle_between_deg(rest, target - self.world_position(ship))
    }

    /// Angle left over once the gimbal has swung as far as it can.
    pub fn tracking_error(&self, ship: &Pose, target: Vec3) -> f32 {
        (self.offset_angle(ship, target) - self.traverse_limit_deg).max(0.0)
    }
}

/// One firing unit with its own trigger cadence.
#[derive(Debug, Clone)]
pub struct WeaponUnit {
    pub name: String,
    trigger: Trigger,
    ready: bool,
    pub mount: Option<GimbalMount>,
    /// Damage dealt by one action (or per second for continuous units).
    pub damage: f32,
}

impl WeaponUnit {
    pub fn new(name: impl Into<String>, settings: TriggerSettings) -> Self {
        Self {
            name: name.into(),
            trigger: Trigger::new(settings),
            ready: true,
            mount: None,
            damage: 1.0,
        }
    }

    pub fn with_mount(mut self, mount: GimbalMount) -> Self {
        self.mount = Some(mount);
        self
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    /// Unit-level readiness (reloaded, not jammed, enabled).
    pub fn can_fire(&self) -> bool {
        self.ready && self.trigger.is_enabled()
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn trigger_mut(&mut self) -> &mut Trigger {
        &mut self.trigger
    }

    /// Counts toward the AI firing solution.
    pub fn is_solution_eligible(&self) -> bool {
        matches!(self.mount, Some(m) if !m.independent)
    }
}
