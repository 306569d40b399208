//! Steering and movement control toward moving target points.
//!
//! Aim points blend between the target point and a far lookahead along the
//! target's heading. A distant ship steers straight at the point; as it
//! closes, the aim slides onto the target's heading so the ship settles in
//! behind (or alongside) instead of swinging around the point.

use glam::Vec3;

use broadside_core::config::{BroadsideConfig, SteeringConfig};
use broadside_core::types::{Pose, ShipState};

use crate::pid::Pid3;

/// Blend weight of the direct target point: clamp(distance / threshold, 0, 1).
///
/// A non-positive threshold means "always direct".
pub fn blend_factor(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (distance / threshold).clamp(0.0, 1.0)
}

/// Point far ahead of `target_point` along `target_forward`.
pub fn lookahead_point(target_point: Vec3, target_forward: Vec3, lookahead: f32) -> Vec3 {
    target_point + target_forward.normalize_or_zero() * lookahead
}

/// Aim point for steering toward a moving point.
///
/// `blend * target + (1 - blend) * lookahead`, with the blend taken from
/// the distance between the ship and the target point.
pub fn blended_aim_point(
    ship_position: Vec3,
    target_point: Vec3,
    target_forward: Vec3,
    config: &SteeringConfig,
) -> Vec3 {
    let distance = ship_position.distance(target_point);
    let blend = blend_factor(distance, config.turn_toward_threshold);
    let ahead = lookahead_point(target_point, target_forward, config.lookahead_distance);
    target_point * blend + ahead * (1.0 - blend)
}

/// Point on the orbit circle a quarter turn ahead of the ship.
///
/// The orbit lies in the plane perpendicular to `orbit_up`; `side` picks
/// the direction of travel (+1 keeps the target on the right).
pub fn orbit_point(ship_position: Vec3, target_position: Vec3, orbit_up: Vec3, radius: f32, side: f32) -> Vec3 {
    let away = ship_position - target_position;
    let away = if away.length_squared() > 1e-6 {
        away.normalize()
    } else {
        Vec3::X
    };
    let mut tangent = orbit_up.cross(away);
    if tangent.length_squared() < 1e-6 {
        tangent = away.any_orthonormal_vector();
    }
    target_position + tangent.normalize() * side.signum() * radius
}

/// Broadside aim point: direct at the target when far, the orbit point
/// once within `turn_toward_threshold` of the orbit radius.
pub fn broadside_aim_point(
    ship_position: Vec3,
    target_position: Vec3,
    orbit_up: Vec3,
    broadside: &BroadsideConfig,
    turn_toward_threshold: f32,
) -> Vec3 {
    let distance = ship_position.distance(target_position);
    let blend = blend_factor(distance - broadside.distance, turn_toward_threshold);
    let orbit = orbit_point(
        ship_position,
        target_position,
        orbit_up,
        broadside.distance,
        broadside.orbit_side,
    );
    target_position * blend + orbit * (1.0 - blend)
}

/// Lead point for intercepting a moving target at `closing_speed`.
///
/// Two refinement passes, falling back to the target's position when the
/// closing speed is negligible.
pub fn intercept_point(own_position: Vec3, closing_speed: f32, target_position: Vec3, target_velocity: Vec3) -> Vec3 {
    if closing_speed < 1.0 {
        return target_position;
    }
    let mut time = own_position.distance(target_position) / closing_speed;
    for _ in 0..2 {
        let predicted = target_position + target_velocity * time;
        time = own_position.distance(predicted) / closing_speed;
    }
    target_position + target_velocity * time
}

/// Pitch/yaw/roll angle errors (radians) for pointing `pose` at `aim`.
///
/// Positive yaw turns right, negative pitch lifts the nose; roll levels the
/// ship's up toward `roll_reference`.
pub fn steering_errors(pose: &Pose, aim: Vec3, roll_reference: Vec3) -> Vec3 {
    let local = pose.inverse_transform_point(aim);
    let (pitch, yaw) = if local.length_squared() < 1e-6 {
        (0.0, 0.0)
    } else {
        let horizontal = (local.x * local.x + local.z * local.z).sqrt();
        (-local.y.atan2(horizontal), local.x.atan2(local.z))
    };

    let up = pose.inverse_transform_direction(roll_reference);
    let roll = if up.x.abs() < 1e-6 && up.y.abs() < 1e-6 {
        0.0
    } else {
        (-up.x).atan2(up.y)
    };

    Vec3::new(pitch, yaw, roll)
}

/// Orientation and translation PID pair with actuator clamping.
#[derive(Debug, Clone)]
pub struct SteeringController {
    config: SteeringConfig,
    steering: Pid3,
    movement: Pid3,
}

impl SteeringController {
    pub fn new(config: SteeringConfig) -> Self {
        Self {
            steering: Pid3::new(config.steering_gains),
            movement: Pid3::new(config.movement_gains),
            config,
        }
    }

    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    /// Steering outputs in [-1, 1] for turning toward `aim`.
    pub fn turn_toward(&mut self, ship: &ShipState, aim: Vec3, roll_reference: Vec3, dt: f32) -> Vec3 {
        let errors = steering_errors(&ship.pose, aim, roll_reference);
        self.steering
            .update(errors, dt)
            .clamp(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    /// Movement outputs for translating toward `point`, clamped to limits.
    pub fn move_toward(&mut self, ship: &ShipState, point: Vec3, dt: f32) -> Vec3 {
        let local = ship.pose.inverse_transform_point(point);
        let raw = self.movement.update(local, dt);
        self.config.movement_limits.clamp(raw)
    }

    /// Clamp a hand-built movement vector to the actuator limits.
    pub fn clamp_movement(&self, movement: Vec3) -> Vec3 {
        self.config.movement_limits.clamp(movement)
    }

    pub fn reset(&mut self) {
        self.steering.reset();
        self.movement.reset();
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn test_blend_factor_properties() {
        let t = 300.0;
        assert_eq!(blend_factor(0.0, t), 0.0);
        assert_eq!(blend_factor(t, t), 1.0);
        assert_eq!(blend_factor(2.0 * t, t), 1.0);
        assert!((blend_factor(75.0, t) - 0.25).abs() < 1e-6);
        assert_eq!(blend_factor(50.0, 0.0), 1.0);
    }

    #[test]
    fn test_aim_point_direct_when_far() {
        let config = SteeringConfig::default();
        let target = Vec3::new(0.0, 0.0, 5000.0);
        let aim = blended_aim_point(Vec3::ZERO, target, Vec3::X, &config);
        assert!((aim - target).length() < 1e-3);
    }

    #[test]
    fn test_aim_point_lookahead_when_on_top() {
        let config = SteeringConfig::default();
        let target = Vec3::new(0.0, 0.0, 100.0);
        let aim = blended_aim_point(target, target, Vec3::X, &config);
        let expected = target + Vec3::X * config.lookahead_distance;
        assert!((aim - expected).length() < 1e-2);
    }

    #[test]
    fn test_aim_point_halfway() {
        let config = SteeringConfig {
            turn_toward_threshold: 200.0,
            lookahead_distance: 1000.0,
            ..Default::default()
        };
        let target = Vec3::new(0.0, 0.0, 100.0);
        let aim = blended_aim_point(Vec3::ZERO, target, Vec3::X, &config);
        assert!((aim - Vec3::new(500.0, 0.0, 100.0)).length() < 1e-3);
    }

    #[test]
    fn test_orbit_point_is_perpendicular() {
        let target = Vec3::ZERO;
        let ship = Vec3::new(0.0, 0.0, -1000.0);
        let p = orbit_point(ship, target, Vec3::Y, 500.0, 1.0);
        assert!((p.length() - 500.0).abs() < 1e-3);
        assert!(p.dot(ship).abs() < 1e-3, "orbit point is a quarter turn ahead");
        let q = orbit_point(ship, target, Vec3::Y, 500.0, -1.0);
        assert!((p + q).length() < 1e-3, "sides mirror each other");
    }

    #[test]
    fn test_broadside_aim_blends_by_proximity() {
        let broadside = BroadsideConfig {
            enabled: true,
            distance: 500.0,
            ..Default::default()
        };
        let target = Vec3::ZERO;

        let far = Vec3::new(0.0, 0.0, -5000.0);
        let aim = broadside_aim_point(far, target, Vec3::Y, &broadside, 300.0);
        assert!(aim.length() < 1e-3, "far away: straight at the target");

        let near = Vec3::new(0.0, 0.0, -400.0);
        let aim = broadside_aim_point(near, target, Vec3::Y, &broadside, 300.0);
        let orbit = orbit_point(near, target, Vec3::Y, 500.0, 1.0);
        assert!((aim - orbit).length() < 1e-3, "inside the orbit: orbit point");
    }

    #[test]
    fn test_intercept_point_leads_target() {
        let target = Vec3::new(0.0, 0.0, 1000.0);
        let velocity = Vec3::new(50.0, 0.0, 0.0);
        let lead = intercept_point(Vec3::ZERO, 200.0, target, velocity);
        assert!(lead.x > 200.0, "lead {lead:?}");
        assert_eq!(intercept_point(Vec3::ZERO, 0.0, target, velocity), target);
    }

    #[test]
    fn test_steering_errors_signs() {
        let pose = Pose::default();
        let right = steering_errors(&pose, Vec3::new(100.0, 0.0, 100.0), Vec3::Y);
        assert!(right.y > 0.0, "target right → positive yaw");
        assert!(right.x.abs() < 1e-6);

        let above = steering_errors(&pose, Vec3::new(0.0, 100.0, 100.0), Vec3::Y);
        assert!(above.x < 0.0, "target above → nose up (negative pitch)");

        let behind = steering_errors(&pose, Vec3::new(0.0, 0.0, -100.0), Vec3::Y);
        assert!((behind.y.abs() - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn test_roll_error_levels_wings() {
        let rolled = Pose::new(Vec3::ZERO, Quat::from_rotation_z(0.3));
        let errors = steering_errors(&rolled, Vec3::new(0.0, 0.0, 100.0), Vec3::Y);
        assert!((errors.z + 0.3).abs() < 1e-4, "roll error {}", errors.z);
    }

    #[test]
    fn test_controller_outputs_are_clamped() {
        let mut controller = SteeringController::new(SteeringConfig::default());
        let ship = ShipState::default();
        let steering = controller.turn_toward(&ship, Vec3::new(0.0, 0.0, -100.0), Vec3::Y, 0.1);
        assert!(steering.abs().max_element() <= 1.0);
        assert!(steering.y.abs() > 0.99, "full yaw to turn around");

        let movement = controller.move_toward(&ship, Vec3::new(0.0, 0.0, 1.0e6), 0.1);
        assert_eq!(movement.z, 1.0);
    }
}
