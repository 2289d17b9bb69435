//! # Pose Sensing Equipment

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::SensorError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A raw pose reading for a single named object in the world frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct PoseData {
    /// Position of the object in the world frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// Orientation of the object as intrinsic euler angles (roll, pitch,
    /// yaw).
    ///
    /// Units: radians
    pub euler_rad: [f64; 3],
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A sensor providing the pose of named objects in the world.
pub trait PoseSensor {
    /// Read the current pose of the object with the given name.
    ///
    /// Fails with [`SensorError::UnknownObject`] if the adapter does not
    /// track an object by that name, or [`SensorError::NotConnected`] /
    /// [`SensorError::ReadFailed`] on transport problems.
    fn read_pose(&mut self, object: &str) -> Result<PoseData, SensorError>;
}
