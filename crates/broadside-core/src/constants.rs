//! Tuning defaults for triggers, fire control and steering.

/// Simulation tick rate (Hz) used by the harness.
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Triggers ---

/// Seconds between automatic actions.
pub const DEFAULT_ACTION_INTERVAL: f32 = 0.25;

/// Actions per burst.
pub const DEFAULT_BURST_SIZE: u32 = 3;

/// Seconds between the last shot of a burst and the first of the next.
pub const DEFAULT_BURST_INTERVAL: f32 = 1.0;

// --- Fire control ---

/// Firing-solution quality above which a weapon may fire.
pub const FIRING_SOLUTION_THRESHOLD: f32 = 0.5;

/// Maximum angle (degrees) between a mount's rest forward and the target.
pub const DEFAULT_MAX_FIRING_ANGLE_DEG: f32 = 10.0;

/// Closest distance of the engage band (m).
pub const DEFAULT_MIN_ENGAGE_DISTANCE: f32 = 100.0;

/// Furthest distance at which weapons are allowed to fire (m).
pub const DEFAULT_MAX_ENGAGE_DISTANCE: f32 = 1000.0;

/// Random firing period bounds (seconds of continuous fire).
pub const DEFAULT_FIRING_PERIOD_MIN: f32 = 1.0;
pub const DEFAULT_FIRING_PERIOD_MAX: f32 = 3.0;

/// Random pause bounds between firing periods (seconds).
pub const DEFAULT_FIRING_INTERVAL_MIN: f32 = 0.5;
pub const DEFAULT_FIRING_INTERVAL_MAX: f32 = 1.5;

// --- Steering ---

/// Distance inside which steering starts easing onto the target's heading (m).
pub const DEFAULT_TURN_TOWARD_THRESHOLD: f32 = 300.0;

/// How far ahead of the target the lookahead aim point sits (m).
pub const LOOKAHEAD_DISTANCE: f32 = 10_000.0;

pub const STEERING_P: f32 = 3.0;
pub const STEERING_I: f32 = 0.0;
pub const STEERING_D: f32 = 0.6;

pub const MOVEMENT_P: f32 = 0.02;
pub const MOVEMENT_I: f32 = 0.0;
pub const MOVEMENT_D: f32 = 0.05;

/// Absolute cap on any PID integral accumulator.
pub const PID_INTEGRAL_LIMIT: f32 = 10.0;

// --- Broadside ---

/// Orbit radius kept while presenting a flank (m).
pub const DEFAULT_BROADSIDE_DISTANCE: f32 = 600.0;

/// Throttle never drops below this while orbiting.
pub const DEFAULT_ORBIT_THROTTLE_FLOOR: f32 = 0.4;

// --- Formation ---

/// Distance at which a wingman counts as on station (m).
pub const FORMATION_ARRIVE_DISTANCE: f32 = 25.0;

/// Gain applied to leader speed error when on station.
pub const FORMATION_SPEED_MATCH_GAIN: f32 = 0.1;
