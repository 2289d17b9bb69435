//! # Wall following controllers module
//!
//! This module provides the PID controller used by the rounding behaviour.
//! Unlike a wall-time controller the integration and differentiation here
//! are per tick: the caller must invoke [`PidController::output`] exactly
//! once per control period for the gains to behave as tuned.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A discrete per-tick PID controller.
#[derive(Debug, Serialize, Clone, Default)]
pub struct PidController {
    /// Magnitude limit on the output
    max_output: f64,

    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation. Unbounded: the only windup protection is
    /// the output clamp.
    integral: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given output limit and gains.
    pub fn new(max_output: f64, k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            max_output,
            k_p, k_i, k_d,
            prev_error: None,
            integral: 0f64
        }
    }

    /// Get the value of the controller for the given error.
    ///
    /// Must be called exactly once per control tick.
    pub fn output(&mut self, error: f64) -> f64 {
        // Accumulate the integral term
        self.integral += error;

        // Difference against the previous tick's error. On the first tick
        // there is nothing to difference against so the term is zero.
        let deriv = match self.prev_error {
            Some(e) => error - e,
            None => 0f64
        };

        self.prev_error = Some(error);

        let out =
            self.k_p * error
            + self.k_i * self.integral
            + self.k_d * deriv;

        out.clamp(-self.max_output, self.max_output)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_constant_error_converges() {
        // The standoff controller's stock tuning
        let mut pid = PidController::new(50.0, 2.0, 0.0, 0.5);

        let mut outputs = vec![];
        for _ in 0..3 {
            outputs.push(pid.output(1.0));
        }

        for out in &outputs {
            assert!(out.abs() <= 50.0);
        }

        // With no integral gain and a constant error the derivative term
        // dies out and the output settles at k_p * error
        assert_eq!(outputs[1], 2.0);
        assert_eq!(outputs[2], 2.0);
    }

    #[test]
    fn test_output_clamped() {
        let mut pid = PidController::new(1.0, 100.0, 0.0, 0.0);

        assert_eq!(pid.output(10.0), 1.0);
        assert_eq!(pid.output(-10.0), -1.0);
    }

    #[test]
    fn test_integral_accumulates_per_tick() {
        let mut pid = PidController::new(50.0, 0.0, 1.0, 0.0);

        assert_eq!(pid.output(1.0), 1.0);
        assert_eq!(pid.output(1.0), 2.0);
        assert_eq!(pid.output(1.0), 3.0);
    }
}
