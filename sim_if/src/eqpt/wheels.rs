//! # Wheel Actuation Equipment

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::ActuatorError;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of the drive wheels available to the agent.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum WheelId {
    Left,
    Right,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demanded angular rates for both drive wheels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct WheelDems {
    /// Left wheel rate demand.
    ///
    /// Units: radians/second
    pub left_rads: f64,

    /// Right wheel rate demand.
    ///
    /// Units: radians/second
    pub right_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The drive wheel actuators.
///
/// Writes are fire-and-forget, an `Ok` return means the demand was handed to
/// the transport, not that the wheel reached the rate.
pub trait WheelActuator {
    /// Demand an angular rate for a single wheel.
    fn set_wheel_velocity(
        &mut self,
        wheel: WheelId,
        rate_rads: f64
    ) -> Result<(), ActuatorError>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WheelDems {
    /// Demands bringing both wheels to a stop.
    pub fn stop() -> Self {
        Self {
            left_rads: 0.0,
            right_rads: 0.0,
        }
    }
}
