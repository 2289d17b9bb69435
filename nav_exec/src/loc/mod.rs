//! # Localisation module
//!
//! This module provides the pose of the agent in the world frame, as read
//! from the pose sensor, and the derivation of the heading vector from it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use sim_if::eqpt::pose::PoseData;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and attitude in the world frame) of the agent.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default)]
pub struct Pose {
    /// The position in the world frame.
    ///
    /// Units: meters
    pub position_m: Vector3<f64>,

    /// The attitude as intrinsic euler angles (roll, pitch, yaw).
    ///
    /// Units: radians
    pub euler_rad: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Return the heading (yaw, angle to the positive world X axis) of the
    /// agent in radians.
    pub fn get_heading(&self) -> f64 {
        self.euler_rad[2]
    }

    /// Return the unit vector pointing in the agent's forward direction.
    ///
    /// The forward direction is the world X axis rotated about the world Z
    /// axis by the yaw angle (right hand rule). Only yaw is considered, the
    /// navigation is planar.
    pub fn forward(&self) -> Vector3<f64> {
        let q_rot = UnitQuaternion::from_axis_angle(
            &Vector3::z_axis(),
            self.get_heading()
        );

        q_rot * Vector3::x()
    }

    /// Return a copy of this pose with the z component of the position
    /// flattened to zero, for planar computations.
    pub fn flattened(&self) -> Self {
        let mut pose = *self;
        pose.position_m[2] = 0.0;
        pose
    }
}

impl From<PoseData> for Pose {
    fn from(data: PoseData) -> Self {
        Self {
            position_m: Vector3::from(data.position_m),
            euler_rad: Vector3::from(data.euler_rad),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_forward_from_yaw() {
        let mut pose = Pose::default();

        // Zero yaw faces +X
        assert!((pose.forward() - Vector3::x()).norm() < 1e-12);

        // +90 degrees yaw faces +Y (CCW, right hand rule about +Z)
        pose.euler_rad[2] = PI / 2.0;
        assert!((pose.forward() - Vector3::y()).norm() < 1e-12);

        // -90 degrees yaw faces -Y
        pose.euler_rad[2] = -PI / 2.0;
        assert!((pose.forward() + Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn test_flattened() {
        let pose = Pose {
            position_m: Vector3::new(1.0, 2.0, 3.0),
            euler_rad: Vector3::new(0.1, 0.2, 0.3),
        };

        let flat = pose.flattened();
        assert_eq!(flat.position_m[2], 0.0);
        assert_eq!(flat.position_m[0], 1.0);
        assert_eq!(flat.euler_rad, pose.euler_rad);
    }
}
