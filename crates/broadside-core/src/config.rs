//! Named tunables for triggers, steering and combat behavior.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only
//! needs the fields it overrides. Values are not range-checked here; the
//! configuring side owns that.

use std::path::Path;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::TriggerMode;
use crate::error::ConfigError;
use crate::types::AxisLimits;

/// Cadence settings for one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    pub mode: TriggerMode,
    /// Seconds between actions (Automatic) or between shots of a burst.
    pub action_interval: f32,
    pub burst_size: u32,
    /// Seconds between bursts.
    pub burst_interval: f32,
    /// Keep bursting while held.
    pub repeat_burst: bool,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            mode: TriggerMode::default(),
            action_interval: DEFAULT_ACTION_INTERVAL,
            burst_size: DEFAULT_BURST_SIZE,
            burst_interval: DEFAULT_BURST_INTERVAL,
            repeat_burst: true,
        }
    }
}

impl TriggerSettings {
    pub fn single() -> Self {
        Self {
            mode: TriggerMode::Single,
            ..Default::default()
        }
    }

    pub fn automatic(action_interval: f32) -> Self {
        Self {
            mode: TriggerMode::Automatic,
            action_interval,
            ..Default::default()
        }
    }

    pub fn burst(burst_size: u32, action_interval: f32, burst_interval: f32, repeat: bool) -> Self {
        Self {
            mode: TriggerMode::Burst,
            action_interval,
            burst_size,
            burst_interval,
            repeat_burst: repeat,
        }
    }

    pub fn on_off() -> Self {
        Self {
            mode: TriggerMode::OnOff,
            ..Default::default()
        }
    }
}

/// Gains for one PID axis set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub proportional: f32,
    pub integral: f32,
    pub derivative: f32,
    /// Absolute cap on the integral accumulator.
    pub integral_limit: f32,
}

impl Default for PidGains {
    fn default() -> Self {
        Self::steering()
    }
}

impl PidGains {
    pub fn steering() -> Self {
        Self {
            proportional: STEERING_P,
            integral: STEERING_I,
            derivative: STEERING_D,
            integral_limit: PID_INTEGRAL_LIMIT,
        }
    }

    pub fn movement() -> Self {
        Self {
            proportional: MOVEMENT_P,
            integral: MOVEMENT_I,
            derivative: MOVEMENT_D,
            integral_limit: PID_INTEGRAL_LIMIT,
        }
    }
}

/// Steering and movement controller tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Inside this distance the aim point eases from the target onto its heading.
    pub turn_toward_threshold: f32,
    /// Distance of the lookahead point along the target's forward.
    pub lookahead_distance: f32,
    pub steering_gains: PidGains,
    pub movement_gains: PidGains,
    pub movement_limits: AxisLimits,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            turn_toward_threshold: DEFAULT_TURN_TOWARD_THRESHOLD,
            lookahead_distance: LOOKAHEAD_DISTANCE,
            steering_gains: PidGains::steering(),
            movement_gains: PidGains::movement(),
            movement_limits: AxisLimits::default(),
        }
    }
}

/// Random firing window bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiringCadenceConfig {
    pub period_min: f32,
    pub period_max: f32,
    pub interval_min: f32,
    pub interval_max: f32,
}

impl Default for FiringCadenceConfig {
    fn default() -> Self {
        Self {
            period_min: DEFAULT_FIRING_PERIOD_MIN,
            period_max: DEFAULT_FIRING_PERIOD_MAX,
            interval_min: DEFAULT_FIRING_INTERVAL_MIN,
            interval_max: DEFAULT_FIRING_INTERVAL_MAX,
        }
    }
}

/// Broadside orbit tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadsideConfig {
    pub enabled: bool,
    /// Orbit radius (m).
    pub distance: f32,
    /// Minimum throttle while orbiting.
    pub throttle_floor: f32,
    /// +1 orbits with the target on the right flank, -1 on the left.
    pub orbit_side: f32,
}

impl Default for BroadsideConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            distance: DEFAULT_BROADSIDE_DISTANCE,
            throttle_floor: DEFAULT_ORBIT_THROTTLE_FLOOR,
            orbit_side: 1.0,
        }
    }
}

/// Combat behavior tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub min_engage_distance: f32,
    pub max_engage_distance: f32,
    /// Largest angular offset (degrees) at which the ship may fire.
    pub max_firing_angle_deg: f32,
    /// Solution quality above which a weapon may fire.
    pub firing_solution_threshold: f32,
    pub broadside: BroadsideConfig,
    pub firing: FiringCadenceConfig,
    pub steering: SteeringConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            min_engage_distance: DEFAULT_MIN_ENGAGE_DISTANCE,
            max_engage_distance: DEFAULT_MAX_ENGAGE_DISTANCE,
            max_firing_angle_deg: DEFAULT_MAX_FIRING_ANGLE_DEG,
            firing_solution_threshold: FIRING_SOLUTION_THRESHOLD,
            broadside: BroadsideConfig::default(),
            firing: FiringCadenceConfig::default(),
            steering: SteeringConfig::default(),
        }
    }
}

/// Formation-keeping tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Station offset in the leader's local space.
    pub offset: Vec3,
    pub arrive_distance: f32,
    pub speed_match_gain: f32,
    pub steering: SteeringConfig,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(-50.0, 0.0, -50.0),
            arrive_distance: FORMATION_ARRIVE_DISTANCE,
            speed_match_gain: FORMATION_SPEED_MATCH_GAIN,
            steering: SteeringConfig::default(),
        }
    }
}

/// Parse any tunable struct from a JSON string.
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Load any tunable struct from a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json_str(&text)
}
