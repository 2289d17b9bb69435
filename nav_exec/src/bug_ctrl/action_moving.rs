//! Direct approach calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{UnitQuaternion, Vector3};

// Internal imports
use super::*;
use crate::loc::Pose;
use crate::prox_model::DangerFrame;
use sim_if::eqpt::wheels::WheelDems;
use util::maths;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BugCtrl {

    /// Perform the moving state action: drive directly towards the target.
    ///
    /// If an obstacle has closed in front of the forward sensor the state
    /// switches to rotating, with the rotation target set to the current
    /// heading turned by the obstacle turn angle (90 degrees left in the
    /// default tuning). Otherwise the heading error to the target is
    /// corrected by differential steering.
    pub(crate) fn action_moving(
        &mut self,
        pose: &Pose,
        target_pos_m: &Vector3<f64>,
        danger_frame: &DangerFrame
    ) -> Result<WheelDems, BugCtrlError> {

        // An obstacle blocks the direct path, switch to aligning parallel
        // with its boundary. No motion is commanded on the transition tick.
        if danger_frame[FORWARD_SENSOR_IDX] < self.params.forward_danger_limit {
            self.state = NavState::Rotating;

            let q_turn = UnitQuaternion::from_axis_angle(
                &Vector3::z_axis(),
                self.params.obstacle_turn_rad
            );
            self.target_dir = Some(q_turn * pose.forward());

            return Ok(WheelDems::stop())
        }

        let angle = maths::angle_between_signed(
            &pose.forward(),
            &(target_pos_m - pose.position_m)
        )?;

        self.report.angle_to_target_rad = angle;

        // Bias the wheels against the sign of the error to steer back onto
        // the target bearing, or drive straight once close enough
        if angle.abs() > self.params.moving_align_threshold_rad {
            Ok(WheelDems {
                left_rads: self.params.wheel_speed_rads + angle,
                right_rads: self.params.wheel_speed_rads - angle,
            })
        }
        else {
            Ok(WheelDems {
                left_rads: self.params.wheel_speed_rads,
                right_rads: self.params.wheel_speed_rads,
            })
        }
    }
}
