//! Firing solution: can the weapon's gimballed units hit the target?

use glam::Vec3;
use serde::{Deserialize, Serialize};

use broadside_core::types::Pose;

use crate::unit::WeaponUnit;
use crate::weapon::Weapon;

/// Thresholds for the solution check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolutionParams {
    /// Residual angle (degrees) below which a unit counts as on target.
    pub max_firing_angle_deg: f32,
    /// Beyond this range the solution is always zero.
    pub max_engage_distance: f32,
}

/// Fraction of eligible units that can currently track `target`, in [0, 1].
///
/// Units without a mount, or whose mount is independently controlled, are
/// not eligible. No eligible units, or a target beyond engage range,
/// yields 0.
pub fn unit_solution_quality(
    units: &[WeaponUnit],
    ship: &Pose,
    target: Vec3,
    params: &SolutionParams,
) -> f32 {
    if ship.distance_to(target) > params.max_engage_distance {
        return 0.0;
    }

    let mut eligible = 0u32;
    let mut on_target = 0u32;
    for mount in units
        .iter()
        .filter(|unit| unit.is_solution_eligible())
        .filter_map(|unit| unit.mount)
    {
        eligible += 1;
        if mount.tracking_error(ship, target) < params.max_firing_angle_deg {
            on_target += 1;
        }
    }

    if eligible == 0 {
        0.0
    } else {
        on_target as f32 / eligible as f32
    }
}

/// Whether a single unit can currently track `target`.
pub fn unit_in_solution(unit: &WeaponUnit, ship: &Pose, target: Vec3, params: &SolutionParams) -> bool {
    if !unit.is_solution_eligible() || ship.distance_to(target) > params.max_engage_distance {
        return false;
    }
    unit.mount.is_some_and(|mount| {
        mount.tracking_error(ship, target) < params.max_firing_angle_deg
    })
}

/// Solution quality for every unit of `weapon`.
pub fn firing_solution_quality(
    weapon: &Weapon,
    ship: &Pose,
    target: Vec3,
    params: &SolutionParams,
) -> f32 {
    unit_solution_quality(weapon.units(), ship, target, params)
}
