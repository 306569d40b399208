//! Combat decision loop.
//!
//! Each tick: capture the snapshot, gate and toggle both weapon slots,
//! pick the maneuver (broadside orbit or direct pursuit), then turn the
//! chosen aim point and throttle into control outputs.

use glam::Vec3;
use rand::Rng;

use broadside_core::config::CombatConfig;
use broadside_core::enums::{Maneuver, WeaponSlot};
use broadside_core::types::{ControlOutputs, ShipState, TargetState};
use broadside_weapons::loadout::Loadout;
use broadside_weapons::solution::SolutionParams;

use crate::fire_control::{drive_weapon, firing_permitted, FiringCadence};
use crate::snapshot::TargetDecisionSnapshot;
use crate::steering::{blended_aim_point, broadside_aim_point, intercept_point, SteeringController};

/// Everything the loop decided this tick.
#[derive(Debug, Clone, Copy)]
pub struct CombatDecision {
    pub snapshot: TargetDecisionSnapshot,
    pub maneuver: Maneuver,
    pub aim_point: Vec3,
    pub throttle: f32,
    pub primary_permitted: bool,
    pub secondary_permitted: bool,
    pub controls: ControlOutputs,
}

/// Throttle from the target's position inside the engage band.
///
/// 0 at or inside `min`, 1 at or beyond `max`. A collapsed band is a step
/// at `min`.
pub fn engage_throttle(distance: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return if distance > min { 1.0 } else { 0.0 };
    }
    ((distance - min) / (max - min)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct CombatBehavior {
    config: CombatConfig,
    controller: SteeringController,
    primary_cadence: FiringCadence,
    secondary_cadence: FiringCadence,
    running: bool,
}

impl CombatBehavior {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            controller: SteeringController::new(config.steering),
            primary_cadence: FiringCadence::new(config.firing),
            secondary_cadence: FiringCadence::new(config.firing),
            config,
            running: false,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn solution_params(&self) -> SolutionParams {
        SolutionParams {
            max_firing_angle_deg: self.config.max_firing_angle_deg,
            max_engage_distance: self.config.max_engage_distance,
        }
    }

    pub fn initialize(&mut self) {
        self.controller.reset();
        self.primary_cadence.reset();
        self.secondary_cadence.reset();
        self.running = true;
    }

    /// Release every trigger and forget controller history. The behavior
    /// keeps running and resumes once a target is supplied again.
    pub fn stand_down(&mut self, loadout: &mut Loadout) {
        loadout.stop_all();
        self.controller.reset();
        self.primary_cadence.reset();
        self.secondary_cadence.reset();
    }

    pub fn shutdown(&mut self, loadout: &mut Loadout) {
        self.stand_down(loadout);
        self.running = false;
        log::debug!("combat behavior shut down");
    }

    /// Run one decision tick.
    ///
    /// Returns `None` without touching any state when the behavior is not
    /// running or there is no target.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        own: &ShipState,
        target: Option<&TargetState>,
        loadout: &mut Loadout,
        rng: &mut R,
        dt: f32,
    ) -> Option<CombatDecision> {
        if !self.running {
            return None;
        }
        let target = target?;

        let snapshot = TargetDecisionSnapshot::capture(own, target, loadout, &self.solution_params());

        let maneuver = if self.config.broadside.enabled {
            Maneuver::Broadside
        } else {
            Maneuver::Pursue
        };

        let primary_permitted = self.update_slot(WeaponSlot::Primary, &snapshot, maneuver, loadout, rng, dt);
        let secondary_permitted =
            self.update_slot(WeaponSlot::Secondary, &snapshot, maneuver, loadout, rng, dt);

        let steering_config = self.controller.config();
        let (aim_point, target_point) = match maneuver {
            Maneuver::Broadside => {
                let aim = broadside_aim_point(
                    own.pose.position,
                    target.position(),
                    target.pose.up(),
                    &self.config.broadside,
                    steering_config.turn_toward_threshold,
                );
                (aim, aim)
            }
            Maneuver::Pursue | Maneuver::Formation => {
                let lead = intercept_point(
                    own.pose.position,
                    own.velocity.length(),
                    target.position(),
                    target.velocity,
                );
                let aim = blended_aim_point(own.pose.position, lead, target.pose.forward(), steering_config);
                (aim, lead)
            }
        };

        let mut throttle = engage_throttle(
            snapshot.distance,
            self.config.min_engage_distance,
            self.config.max_engage_distance,
        );
        if maneuver == Maneuver::Broadside {
            throttle = throttle.max(self.config.broadside.throttle_floor);
        }

        let steering = self.controller.turn_toward(own, aim_point, target.pose.up(), dt);
        let mut movement = self.controller.move_toward(own, target_point, dt);
        movement.z = throttle;
        let movement = self.controller.clamp_movement(movement);

        let controls = ControlOutputs { steering, movement };
        log::trace!(
            "combat {:?}: d={:.0} angle={:.1} q=({:.2},{:.2}) steer={:?} move={:?}",
            maneuver,
            snapshot.distance,
            snapshot.angle_deg,
            snapshot.primary_quality,
            snapshot.secondary_quality,
            steering,
            movement,
        );

        Some(CombatDecision {
            snapshot,
            maneuver,
            aim_point,
            throttle,
            primary_permitted,
            secondary_permitted,
            controls,
        })
    }

    fn update_slot<R: Rng + ?Sized>(
        &mut self,
        slot: WeaponSlot,
        snapshot: &TargetDecisionSnapshot,
        maneuver: Maneuver,
        loadout: &mut Loadout,
        rng: &mut R,
        dt: f32,
    ) -> bool {
        let Some(weapon) = loadout.get_mut(slot) else {
            return false;
        };
        let allowed = firing_permitted(snapshot, slot, maneuver, &self.config);
        let cadence = match slot {
            WeaponSlot::Primary => &mut self.primary_cadence,
            WeaponSlot::Secondary => &mut self.secondary_cadence,
        };
        let permitted = cadence.update(allowed, dt, rng);
        drive_weapon(weapon, permitted);
        permitted
    }
}
