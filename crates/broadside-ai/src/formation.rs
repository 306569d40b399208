//! Formation keeping on a leader.

use glam::Vec3;

use broadside_core::config::FormationConfig;
use broadside_core::types::{ControlOutputs, ShipState, TargetState};

use crate::steering::{blended_aim_point, SteeringController};

#[derive(Debug, Clone, Copy)]
pub struct FormationDecision {
    /// World position of the station.
    pub formation_point: Vec3,
    pub aim_point: Vec3,
    pub on_station: bool,
    pub controls: ControlOutputs,
}

#[derive(Debug, Clone)]
pub struct FormationBehavior {
    config: FormationConfig,
    controller: SteeringController,
    running: bool,
}

impl FormationBehavior {
    pub fn new(config: FormationConfig) -> Self {
        Self {
            controller: SteeringController::new(config.steering),
            config,
            running: false,
        }
    }

    pub fn config(&self) -> &FormationConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn initialize(&mut self) {
        self.controller.reset();
        self.running = true;
    }

    pub fn shutdown(&mut self) {
        self.controller.reset();
        self.running = false;
    }

    /// Steer onto the station behind `leader`. `None` with no leader.
    pub fn tick(&mut self, own: &ShipState, leader: Option<&TargetState>, dt: f32) -> Option<FormationDecision> {
        if !self.running {
            return None;
        }
        let leader = leader?;

        let formation_point = leader.pose.transform_point(self.config.offset);
        let aim_point = blended_aim_point(
            own.pose.position,
            formation_point,
            leader.pose.forward(),
            self.controller.config(),
        );

        let steering = self.controller.turn_toward(own, aim_point, leader.pose.up(), dt);
        let mut movement = self.controller.move_toward(own, formation_point, dt);

        let on_station = own.pose.position.distance(formation_point) <= self.config.arrive_distance;
        if on_station {
            // Match the leader's forward speed once in position.
            let leader_speed = leader.velocity.dot(leader.pose.forward());
            let own_speed = own.velocity.dot(own.pose.forward());
            movement.z += (leader_speed - own_speed) * self.config.speed_match_gain;
        }
        let movement = self.controller.clamp_movement(movement);

        Some(FormationDecision {
            formation_point,
            aim_point,
            on_station,
            controls: ControlOutputs { steering, movement },
        })
    }
}
