//! Boundary following calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use crate::loc::Pose;
use crate::prox_model::DangerFrame;
use sim_if::eqpt::wheels::WheelDems;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BugCtrl {

    /// Perform the rounding state action: follow the obstacle boundary at
    /// the standoff distance until the start line is crossed again.
    ///
    /// Two controllers act on the flank sensor pair: one drives the closer
    /// flank reading to the standoff level, the other drives the asymmetry
    /// between the flanks to zero, keeping the agent parallel to the wall.
    pub(crate) fn action_rounding(
        &mut self,
        pose: &Pose,
        danger_frame: &DangerFrame
    ) -> Result<WheelDems, BugCtrlError> {

        // Back on the line between the start and target positions: the
        // obstacle has been rounded, hand back to direct approach
        if self.is_on_start_line(&pose.position_m)? {
            self.state = NavState::Moving;
            self.report.on_start_line = true;

            return Ok(WheelDems::stop())
        }

        let delta = danger_frame[FLANK_LEAD_SENSOR_IDX]
            - danger_frame[FLANK_TRAIL_SENSOR_IDX];

        self.report.flank_delta = delta;

        // The standoff error is taken from whichever flank is closer to the
        // wall (the lower danger reading)
        let obstacle_dist = if delta < 0.0 {
            danger_frame[FLANK_LEAD_SENSOR_IDX]
        }
        else {
            danger_frame[FLANK_TRAIL_SENSOR_IDX]
        } - self.params.indent_dist;

        let u_dist_stab = self.dist_stab_pid.output(obstacle_dist);
        let u_follower = self.follower_pid.output(delta);

        // An obstacle looming dead ahead slows the wall side wheel and
        // speeds the other, swerving the agent away independently of the
        // two controllers
        let forward_term = 1.0 - danger_frame[FORWARD_SENSOR_IDX];

        Ok(WheelDems {
            left_rads: self.params.wheel_speed_rads
                + u_follower
                + u_dist_stab
                - forward_term,
            right_rads: self.params.wheel_speed_rads
                - u_follower
                - u_dist_stab
                + forward_term,
        })
    }
}
