//! # Proximity Sensing Equipment

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::SensorError;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The number of proximity sensors in the ring around the agent.
pub const NUM_PROX_SENSORS: usize = 16;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A raw reading from a single proximity sensor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ProxReading {
    /// Distance to the detected point.
    ///
    /// Only meaningful when `detected` is true, adapters may report any
    /// value (including stale data) otherwise.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// True if the sensor detected something within its range.
    pub detected: bool,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The ring of proximity sensors mounted on the agent.
pub trait ProxSensorArray {
    /// Read all sensors in the ring, ordered by sensor index.
    fn read_all(&mut self) -> Result<[ProxReading; NUM_PROX_SENSORS], SensorError>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ProxReading {
    fn default() -> Self {
        Self {
            distance_m: 0.0,
            detected: false,
        }
    }
}
