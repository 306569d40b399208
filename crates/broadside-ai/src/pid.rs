//! PID controllers for orientation and translation.

use glam::Vec3;

use broadside_core::config::PidGains;

/// Single-axis PID.
#[derive(Debug, Clone, Copy)]
pub struct PidAxis {
    gains: PidGains,
    integral: f32,
    previous_error: Option<f32>,
}

impl PidAxis {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            previous_error: None,
        }
    }

    /// Feed one error sample; returns the raw (unclamped) output.
    ///
    /// The first sample after a reset has no derivative term.
    pub fn update(&mut self, error: f32, dt: f32) -> f32 {
        let g = &self.gains;
        if dt <= 0.0 {
            return g.proportional * error;
        }

        let limit = g.integral_limit.abs();
        self.integral = (self.integral + error * dt).clamp(-limit, limit);

        let derivative = match self.previous_error {
            Some(prev) => (error - prev) / dt,
            None => 0.0,
        };
        self.previous_error = Some(error);

        g.proportional * error + g.integral * self.integral + g.derivative * derivative
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = None;
    }
}

/// Three independent PID axes sharing one set of gains.
#[derive(Debug, Clone, Copy)]
pub struct Pid3 {
    axes: [PidAxis; 3],
}

impl Pid3 {
    pub fn new(gains: PidGains) -> Self {
        Self {
            axes: [PidAxis::new(gains); 3],
        }
    }

    pub fn update(&mut self, error: Vec3, dt: f32) -> Vec3 {
        Vec3::new(
            self.axes[0].update(error.x, dt),
            self.axes[1].update(error.y, dt),
            self.axes[2].update(error.z, dt),
        )
    }

    pub fn reset(&mut self) {
        for axis in &mut self.axes {
            axis.reset();
        }
    }
}
