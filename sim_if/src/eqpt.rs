//! # Equipment Interface
//!
//! This module defines the data structures which cross the sensor/actuator
//! boundary, and the traits a deployment adapter (simulation client or
//! hardware transport) must implement for the navigation executable to drive
//! it.
//!
//! All sensor and actuator calls are synchronous and blocking. The control
//! loop relies on the property that no equipment call overlaps another, so
//! adapters are free to block internally but must not spawn callbacks into
//! the navigation state.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod clock;
pub mod pose;
pub mod prox;
pub mod wheels;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur while reading a sensor.
#[derive(Debug, Error)]
pub enum SensorError {
    /// The transport to the sensor equipment is down. Fatal if raised during
    /// startup, otherwise treated as a missed reading.
    #[error("The sensor transport is not connected")]
    NotConnected,

    /// The named object is not known to the equipment.
    #[error("Unknown object \"{0}\"")]
    UnknownObject(String),

    /// The read itself failed, for instance a timeout or a malformed
    /// response.
    #[error("Sensor read failed: {0}")]
    ReadFailed(String),
}

/// Errors that can occur while commanding an actuator.
#[derive(Debug, Error)]
pub enum ActuatorError {
    /// The transport to the actuator equipment is down.
    #[error("The actuator transport is not connected")]
    NotConnected,

    /// The write was attempted but not acknowledged.
    #[error("Actuator write failed: {0}")]
    WriteFailed(String),
}
