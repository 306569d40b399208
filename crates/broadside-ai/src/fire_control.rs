//! Fire control: when a weapon is allowed to fire, and for how long.
//!
//! Permission comes from the decision snapshot. The cadence breaks
//! permitted fire into randomized firing periods separated by pauses, so
//! AI ships fire in bursts of a few seconds rather than a solid stream.

use rand::Rng;

use broadside_core::config::{CombatConfig, FiringCadenceConfig};
use broadside_core::enums::{Maneuver, WeaponSlot};
use broadside_weapons::weapon::Weapon;

use crate::snapshot::TargetDecisionSnapshot;

/// Uniform sample from `[min, max]`; a degenerate range yields `min`.
pub fn sample_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Randomized open/closed firing windows.
#[derive(Debug, Clone)]
pub struct FiringCadence {
    config: FiringCadenceConfig,
    open: bool,
    remaining: f32,
    /// Permission was held last tick.
    engaged: bool,
}

impl FiringCadence {
    pub fn new(config: FiringCadenceConfig) -> Self {
        Self {
            config,
            open: false,
            remaining: 0.0,
            engaged: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Seconds left in the current period or pause.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance the windows. Returns whether fire is allowed this tick.
    ///
    /// Gaining permission opens a firing period at once; losing it closes
    /// the window and forgets the schedule.
    pub fn update<R: Rng + ?Sized>(&mut self, permitted: bool, dt: f32, rng: &mut R) -> bool {
        if !permitted {
            self.reset();
            return false;
        }

        if !self.engaged {
            self.engaged = true;
            self.open = true;
            self.remaining = sample_range(rng, self.config.period_min, self.config.period_max);
            return true;
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.open = !self.open;
            self.remaining = if self.open {
                sample_range(rng, self.config.period_min, self.config.period_max)
            } else {
                sample_range(rng, self.config.interval_min, self.config.interval_max)
            };
        }
        self.open
    }

    pub fn reset(&mut self) {
        self.open = false;
        self.remaining = 0.0;
        self.engaged = false;
    }
}

/// Whether the snapshot allows `slot` to fire at all.
///
/// Beyond max engage distance nothing fires. While pursuing, the nose must
/// also be within the max firing angle; an orbiting ship presents its flank
/// and relies on the solution score alone.
pub fn firing_permitted(
    snapshot: &TargetDecisionSnapshot,
    slot: WeaponSlot,
    maneuver: Maneuver,
    config: &CombatConfig,
) -> bool {
    if snapshot.distance > config.max_engage_distance {
        return false;
    }
    if snapshot.quality(slot) <= config.firing_solution_threshold {
        return false;
    }
    if maneuver == Maneuver::Pursue && snapshot.angle_deg > config.max_firing_angle_deg {
        return false;
    }
    true
}

/// Toggle the weapon's trigger to follow `permitted`.
///
/// A latched denial is released as soon as permission drops, so the next
/// permitted attempt reports its own failure.
pub fn drive_weapon(weapon: &mut Weapon, permitted: bool) {
    if permitted {
        if !weapon.is_firing() {
            weapon.start_firing();
        }
    } else if weapon.is_firing() || weapon.has_pending_denial() {
        weapon.stop_firing();
    }
}
