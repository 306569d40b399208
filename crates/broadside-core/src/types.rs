//! Fundamental geometric and control types.
//!
//! Local axes follow the ship: +Z forward, +X right, +Y up.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space position and orientation of a ship or mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` facing `forward` with world +Y as the up hint.
    pub fn looking(position: Vec3, forward: Vec3) -> Self {
        let forward = forward.normalize_or_zero();
        if forward == Vec3::ZERO {
            return Self::new(position, Quat::IDENTITY);
        }
        let up_hint = if forward.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
        let right = up_hint.cross(forward).normalize();
        let up = forward.cross(right);
        let basis = glam::Mat3::from_cols(right, up, forward);
        Self::new(position, Quat::from_mat3(&basis))
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local-space point to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// World-space point to local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// World-space direction to local space.
    pub fn inverse_transform_direction(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}

/// Own-ship state as seen by the controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    pub pose: Pose,
    /// World-space linear velocity (m/s).
    pub velocity: Vec3,
    /// Local-space angular velocity (rad/s): x pitch, y yaw, z roll.
    pub angular_velocity: Vec3,
}

/// The currently selected target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub pose: Pose,
    /// World-space linear velocity (m/s).
    pub velocity: Vec3,
}

impl TargetState {
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }
}

/// Control signals handed to the actuator each tick.
///
/// `steering` is pitch/yaw/roll in [-1, 1]. `movement` is strafe/lift/throttle,
/// clamped to the per-axis limits configured for the ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlOutputs {
    pub steering: Vec3,
    pub movement: Vec3,
}

/// Per-axis actuator limits for movement outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        }
    }
}

impl AxisLimits {
    pub fn clamp(&self, v: Vec3) -> Vec3 {
        v.clamp(self.min, self.max)
    }
}

/// Angle in degrees between two directions. Zero-length input yields 0.
pub fn angle_between_deg(a: Vec3, b: Vec3) -> f32 {
    let (Some(a), Some(b)) = (a.try_normalize(), b.try_normalize()) else {
        return 0.0;
    };
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}
