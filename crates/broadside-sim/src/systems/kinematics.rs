//! Kinematic integration: turns control outputs into motion.
//!
//! Steering outputs scale the turn rate about the local axes; movement
//! outputs scale thrust along them. Velocity bleeds off with linear drag.

use glam::{Quat, Vec3};
use hecs::World;

use crate::components::{Controls, Hull, Kinematics, Performance};

pub fn run(world: &mut World, dt: f32) {
    for (_entity, (kinematics, performance, controls, hull)) in
        world.query_mut::<(&mut Kinematics, &Performance, &Controls, &Hull)>()
    {
        if hull.is_destroyed() {
            // Wrecks drift.
            kinematics.angular_velocity = Vec3::ZERO;
            kinematics.pose.position += kinematics.velocity * dt;
            continue;
        }

        let outputs = controls.0;
        kinematics.angular_velocity = outputs.steering * performance.max_turn_rate;
        let delta = Quat::from_scaled_axis(kinematics.angular_velocity * dt);
        kinematics.pose.rotation = (kinematics.pose.rotation * delta).normalize();

        let thrust = kinematics.pose.rotation * (outputs.movement * performance.max_thrust);
        kinematics.velocity += thrust * dt;
        kinematics.velocity *= (1.0 - performance.linear_drag * dt).max(0.0);
        kinematics.pose.position += kinematics.velocity * dt;
    }
}
