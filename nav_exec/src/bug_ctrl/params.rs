//! Parameters structure for BugCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Bug2 navigation control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- DRIVING ----

    /// Nominal wheel rate while driving.
    ///
    /// Units: radians/second
    pub wheel_speed_rads: f64,

    /// Forward danger below which an obstacle is considered to block the
    /// direct path, triggering the switch to wall following.
    pub forward_danger_limit: f64,

    /// Angle error above which the heading is corrected while moving
    /// towards the target.
    ///
    /// Units: radians
    pub moving_align_threshold_rad: f64,

    /// Angle error below which the in-place rotation is considered aligned.
    ///
    /// Units: radians
    pub rotate_align_threshold_rad: f64,

    /// Angle to rotate the heading by when an obstacle is hit. Positive is
    /// a counter-clockwise (left) turn, leaving the obstacle on the right.
    ///
    /// Units: radians
    pub obstacle_turn_rad: f64,

    // ---- WALL FOLLOWING ----

    /// Danger level the flank sensors are driven to hold while following a
    /// wall, setting the standoff distance.
    pub indent_dist: f64,

    /// Magnitude limit applied to both wall following controller outputs.
    pub pid_output_limit: f64,

    /// Standoff distance controller proportional gain
    pub dist_stab_k_p: f64,

    /// Standoff distance controller integral gain
    pub dist_stab_k_i: f64,

    /// Standoff distance controller derivative gain
    pub dist_stab_k_d: f64,

    /// Wall follower controller proportional gain
    pub follower_k_p: f64,

    /// Wall follower controller integral gain
    pub follower_k_i: f64,

    /// Wall follower controller derivative gain
    pub follower_k_d: f64,

    // ---- TERMINATION ----

    /// Tolerance on the parametric line membership test used to detect that
    /// the agent is back on the start line.
    pub start_line_tolerance: f64,

    /// Planar distance to the target below which the run is complete.
    ///
    /// Units: meters
    pub target_reached_dist_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    /// Stock tuning. Gains assume one `proc` call per 0.2 s tick.
    fn default() -> Self {
        Self {
            wheel_speed_rads: 1.0,
            forward_danger_limit: 0.6,
            moving_align_threshold_rad: 1.0 / 180.0 * PI,
            rotate_align_threshold_rad: 5.0 / 180.0 * PI,
            obstacle_turn_rad: PI / 2.0,
            indent_dist: 0.5,
            pid_output_limit: 50.0,
            dist_stab_k_p: 2.0,
            dist_stab_k_i: 0.0,
            dist_stab_k_d: 0.5,
            follower_k_p: 2.0,
            follower_k_i: 0.0,
            follower_k_d: 0.0,
            start_line_tolerance: 0.01,
            target_reached_dist_m: 0.3,
        }
    }
}
