//! Per-tick view of the engagement, recomputed before every decision.

use glam::Vec3;

use broadside_core::enums::WeaponSlot;
use broadside_core::types::{angle_between_deg, ShipState, TargetState};
use broadside_weapons::loadout::Loadout;
use broadside_weapons::solution::{firing_solution_quality, SolutionParams};
use broadside_weapons::weapon::Weapon;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDecisionSnapshot {
    pub to_target: Vec3,
    pub target_position: Vec3,
    pub distance: f32,
    /// Own forward · direction to target: 1 = nose on.
    pub facing_dot: f32,
    /// Own forward · target forward: 1 = same heading.
    pub heading_alignment: f32,
    /// Target forward · direction back to us: 1 = target is facing us.
    pub target_facing_dot: f32,
    /// Angle (degrees) between own forward and the line to the target.
    pub angle_deg: f32,
    pub primary_quality: f32,
    pub secondary_quality: f32,
}

impl TargetDecisionSnapshot {
    pub fn capture(own: &ShipState, target: &TargetState, loadout: &Loadout, params: &SolutionParams) -> Self {
        let to_target = target.position() - own.pose.position;
        let direction = to_target.normalize_or_zero();
        let forward = own.pose.forward();
        let target_forward = target.pose.forward();

        let quality = |weapon: Option<&Weapon>| {
            weapon.map_or(0.0, |weapon| {
                firing_solution_quality(weapon, &own.pose, target.position(), params)
            })
        };

        Self {
            to_target,
            target_position: target.position(),
            distance: to_target.length(),
            facing_dot: forward.dot(direction),
            heading_alignment: forward.dot(target_forward),
            target_facing_dot: target_forward.dot(-direction),
            angle_deg: angle_between_deg(forward, to_target),
            primary_quality: quality(loadout.primary.as_ref()),
            secondary_quality: quality(loadout.secondary.as_ref()),
        }
    }

    pub fn quality(&self, slot: WeaponSlot) -> f32 {
        match slot {
            WeaponSlot::Primary => self.primary_quality,
            WeaponSlot::Secondary => self.secondary_quality,
        }
    }
}
