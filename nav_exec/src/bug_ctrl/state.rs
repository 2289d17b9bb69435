//! Implementations for the BugCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::{BugCtrlError, Params, PidController};
use crate::loc::Pose;
use crate::prox_model::DangerFrame;
use sim_if::eqpt::wheels::WheelDems;
use util::{
    maths::DEGENERATE_NORM_LIMIT,
    module::State,
    params,
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Bug2 navigation control module state
#[derive(Debug, Default)]
pub struct BugCtrl {

    pub(crate) params: Params,

    pub(crate) state: NavState,

    pub(crate) report: StatusReport,

    /// Heading to align with while rotating. `Some` if and only if the
    /// state is [`NavState::Rotating`].
    pub(crate) target_dir: Option<Vector3<f64>>,

    /// Agent position captured on the first processed tick, immutable for
    /// the rest of the run.
    pub(crate) start_bot_pos: Option<Vector3<f64>>,

    /// Target position captured on the first processed tick, immutable for
    /// the rest of the run.
    pub(crate) start_target_pos: Option<Vector3<f64>>,

    /// Standoff distance controller, active while rounding.
    pub(crate) dist_stab_pid: PidController,

    /// Wall parallelism controller, active while rounding.
    pub(crate) follower_pid: PidController,
}

/// Input data to Bug2 navigation control.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// The agent's pose as read this tick.
    pub pose: Pose,

    /// The target's position as read this tick.
    ///
    /// Units: meters
    pub target_pos_m: Vector3<f64>,

    /// The danger frame computed from this tick's proximity readings.
    pub danger_frame: DangerFrame,
}

/// Status report for BugCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// The state active at the end of the tick.
    pub state: NavState,

    /// Signed angle between the heading and the direction to the target,
    /// updated while moving.
    ///
    /// Units: radians
    pub angle_to_target_rad: f64,

    /// Danger asymmetry between the flank sensors, updated while rounding.
    pub flank_delta: f64,

    /// True once the agent is within the target-reached distance. The run
    /// is complete and the output demands a stop.
    pub target_reached: bool,

    /// True on the tick the rounding behaviour detected the start line and
    /// handed back to direct approach.
    pub on_start_line: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The navigation states of the Bug2 algorithm.
///
/// Exactly one state is active at a time, and each `proc` either keeps it or
/// replaces it with its successor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum NavState {
    /// Driving directly towards the target.
    Moving,

    /// Turning in place to align parallel to an obstacle boundary.
    Rotating,

    /// Following the obstacle boundary until the start line is crossed.
    Rounding,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for NavState {
    fn default() -> Self {
        NavState::Moving
    }
}

impl State for BugCtrl {
    type InitData = &'static str;
    type InitError = BugCtrlError;

    type InputData = InputData;
    type OutputData = WheelDems;
    type StatusReport = StatusReport;
    type ProcError = BugCtrlError;

    /// Initialise the BugCtrl module.
    ///
    /// Expected init data is the path to the parameter file. Initialisation
    /// constructs the wall following controllers, which are not rebuilt
    /// again for the lifetime of the run.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)
            .map_err(BugCtrlError::ParamLoadError)?;

        self.reset_pids();

        Ok(())
    }

    /// Perform one control tick of Bug2 navigation.
    ///
    /// Dispatches to the active state's action. The output is the wheel
    /// demand for this tick; on a state transition the wheels are demanded
    /// to stop and the new state acts from the next tick.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        // All navigation is planar, so flatten out z before anything else
        let pose = input_data.pose.flattened();
        let mut target_pos_m = input_data.target_pos_m;
        target_pos_m[2] = 0.0;

        // The start line is captured on the first processed tick and held
        // for the rest of the run
        if self.start_bot_pos.is_none() {
            self.start_bot_pos = Some(pose.position_m);
        }
        if self.start_target_pos.is_none() {
            self.start_target_pos = Some(target_pos_m);
        }

        // If the target is within reach the run is over, demand a stop and
        // flag it for the loop driver
        if (target_pos_m - pose.position_m).norm()
            <
            self.params.target_reached_dist_m
        {
            self.report.target_reached = true;
            self.report.state = self.state;

            return Ok((WheelDems::stop(), self.report))
        }

        let output = match self.state {
            NavState::Moving =>
                self.action_moving(&pose, &target_pos_m, &input_data.danger_frame)?,
            NavState::Rotating =>
                self.action_rotating(&pose)?,
            NavState::Rounding =>
                self.action_rounding(&pose, &input_data.danger_frame)?,
        };

        self.report.state = self.state;

        trace!(
            "BugCtrl output: state: {:?}, left: {:.3} rad/s, right: {:.3} rad/s",
            self.state,
            output.left_rads,
            output.right_rads);

        Ok((output, self.report))
    }
}

impl BugCtrl {

    /// Build the module directly from a parameter struct, without touching
    /// the filesystem. Used by tests and embedders.
    pub fn with_params(params: Params) -> Self {
        let mut ctrl = Self {
            params,
            ..Self::default()
        };

        ctrl.reset_pids();
        ctrl
    }

    /// Rebuild the wall following controllers from the parameters.
    ///
    /// This must only be called at the start of a navigation run. Resetting
    /// mid-run would silently discard the controllers' accumulated state.
    pub fn reset_pids(&mut self) {
        self.dist_stab_pid = PidController::new(
            self.params.pid_output_limit,
            self.params.dist_stab_k_p,
            self.params.dist_stab_k_i,
            self.params.dist_stab_k_d,
        );
        self.follower_pid = PidController::new(
            self.params.pid_output_limit,
            self.params.follower_k_p,
            self.params.follower_k_i,
            self.params.follower_k_d,
        );
    }

    /// Test whether the given planar position lies on the infinite line
    /// through the captured start and target positions.
    ///
    /// This is the Bug2 re-acquisition test: the line is the one the agent
    /// was travelling along before it started rounding the obstacle. It is
    /// a line membership test, not a segment test, so it can fire far from
    /// the original segment.
    ///
    /// The test is the parametric equality
    /// `(x - x1)/(x2 - x1) = (y - y1)/(y2 - y1)` within tolerance. When the
    /// start line is axis aligned one of the denominators vanishes; the
    /// test then falls back to membership on the constant coordinate.
    pub(crate) fn is_on_start_line(
        &self,
        position_m: &Vector3<f64>
    ) -> Result<bool, BugCtrlError> {

        let (start_m, target_m) = match (self.start_bot_pos, self.start_target_pos) {
            (Some(s), Some(t)) => (s, t),
            _ => return Err(BugCtrlError::StartLineNotSet)
        };

        let dx = target_m[0] - start_m[0];
        let dy = target_m[1] - start_m[1];

        let tol = self.params.start_line_tolerance;

        if dx.abs() < DEGENERATE_NORM_LIMIT && dy.abs() < DEGENERATE_NORM_LIMIT {
            return Err(BugCtrlError::DegenerateStartLine)
        }

        // Vertical start line
        if dx.abs() < DEGENERATE_NORM_LIMIT {
            return Ok((position_m[0] - start_m[0]).abs() <= tol)
        }

        // Horizontal start line
        if dy.abs() < DEGENERATE_NORM_LIMIT {
            return Ok((position_m[1] - start_m[1]).abs() <= tol)
        }

        let t_x = (position_m[0] - start_m[0]) / dx;
        let t_y = (position_m[1] - start_m[1]) / dy;

        Ok((t_x - t_y).abs() < tol)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bug_ctrl::{
        FLANK_LEAD_SENSOR_IDX, FLANK_TRAIL_SENSOR_IDX, FORWARD_SENSOR_IDX};
    use std::f64::consts::PI;

    /// A frame with nothing in range of any sensor.
    fn clear_frame() -> DangerFrame {
        [1.0; 16]
    }

    fn pose_at(x: f64, y: f64, yaw: f64) -> Pose {
        Pose {
            position_m: Vector3::new(x, y, 0.0),
            euler_rad: Vector3::new(0.0, 0.0, yaw),
        }
    }

    fn input(pose: Pose, target: Vector3<f64>, frame: DangerFrame) -> InputData {
        InputData {
            pose,
            target_pos_m: target,
            danger_frame: frame,
        }
    }

    #[test]
    fn test_moving_straight_at_target() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        // Heading +X, target dead ahead, nothing in range
        let (dems, report) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            clear_frame(),
        )).unwrap();

        assert_eq!(report.state, NavState::Moving);
        assert!(report.angle_to_target_rad.abs() < 1e-12);
        assert_eq!(dems.left_rads, 1.0);
        assert_eq!(dems.right_rads, 1.0);
    }

    #[test]
    fn test_moving_steers_towards_offset_target() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        // Target up and to the left of the heading
        let (dems, _) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(5.0, 5.0, 0.0),
            clear_frame(),
        )).unwrap();

        // A leftwards target gives a negative angle, slowing the left wheel
        // and speeding the right one
        assert!(dems.left_rads < 1.0);
        assert!(dems.right_rads > 1.0);
        assert!((dems.left_rads + dems.right_rads - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_moving_to_rotating_on_forward_obstacle() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        let mut frame = clear_frame();
        frame[FORWARD_SENSOR_IDX] = 0.5;

        let (dems, report) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            frame,
        )).unwrap();

        assert_eq!(report.state, NavState::Rotating);

        // No motion is commanded on the transition tick
        assert_eq!(dems.left_rads, 0.0);
        assert_eq!(dems.right_rads, 0.0);

        // The rotation target is the heading turned 90 degrees left
        let target_dir = ctrl.target_dir.unwrap();
        assert!((target_dir - Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn test_moving_stays_at_danger_limit() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        // Exactly at the limit is not "below" it, the agent keeps moving
        let mut frame = clear_frame();
        frame[FORWARD_SENSOR_IDX] = 0.6;

        let (_, report) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            frame,
        )).unwrap();

        assert_eq!(report.state, NavState::Moving);
    }

    #[test]
    fn test_rotating_spins_proportional_to_error() {
        let mut ctrl = BugCtrl::with_params(Params::default());
        ctrl.state = NavState::Rotating;
        ctrl.target_dir = Some(Vector3::y());

        // Heading +X, rotation target +Y: 90 degrees to go
        let (dems, report) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            clear_frame(),
        )).unwrap();

        assert_eq!(report.state, NavState::Rotating);

        // Pure spin, no forward component
        assert!((dems.left_rads + dems.right_rads).abs() < 1e-12);
        assert!((dems.left_rads + PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotating_to_rounding_when_aligned() {
        let mut ctrl = BugCtrl::with_params(Params::default());
        ctrl.state = NavState::Rotating;
        ctrl.target_dir = Some(Vector3::x());

        // Heading already equals the rotation target
        let (dems, report) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            clear_frame(),
        )).unwrap();

        assert_eq!(report.state, NavState::Rounding);
        assert!(ctrl.target_dir.is_none());
        assert_eq!(dems.left_rads, 0.0);
        assert_eq!(dems.right_rads, 0.0);
    }

    #[test]
    fn test_rounding_back_to_moving_on_start_line() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        // First tick captures the start line y = 0
        ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            clear_frame(),
        )).unwrap();

        // Force rounding and present the agent back at its start position,
        // trivially on the line
        ctrl.state = NavState::Rounding;
        let (dems, report) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            clear_frame(),
        )).unwrap();

        assert_eq!(report.state, NavState::Moving);
        assert!(report.on_start_line);
        assert_eq!(dems.left_rads, 0.0);
        assert_eq!(dems.right_rads, 0.0);
    }

    #[test]
    fn test_rounding_wall_follow_demands() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        // Capture a start line at y = 5 so the origin is well off it
        ctrl.proc(&input(
            pose_at(0.0, 5.0, 0.0),
            Vector3::new(10.0, 5.0, 0.0),
            clear_frame(),
        )).unwrap();

        ctrl.state = NavState::Rounding;

        // Leading flank closer to the wall than the trailing one
        let mut frame = clear_frame();
        frame[FLANK_LEAD_SENSOR_IDX] = 0.4;
        frame[FLANK_TRAIL_SENSOR_IDX] = 0.6;

        let (dems, report) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 5.0, 0.0),
            frame,
        )).unwrap();

        assert_eq!(report.state, NavState::Rounding);
        assert!((report.flank_delta + 0.2).abs() < 1e-12);

        // delta = -0.2 selects the leading flank: standoff error is
        // 0.4 - 0.5 = -0.1. First PID ticks have no derivative, so
        // stab = -0.2 and follow = -0.4, giving left = 0.4, right = 1.6.
        assert!((dems.left_rads - 0.4).abs() < 1e-9);
        assert!((dems.right_rads - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_forward_danger_swerve() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        ctrl.proc(&input(
            pose_at(0.0, 5.0, 0.0),
            Vector3::new(10.0, 5.0, 0.0),
            clear_frame(),
        )).unwrap();

        ctrl.state = NavState::Rounding;

        // Balanced flanks at the standoff distance: both PID errors are
        // zero, leaving only the forward danger term
        let mut frame = clear_frame();
        frame[FLANK_LEAD_SENSOR_IDX] = 0.5;
        frame[FLANK_TRAIL_SENSOR_IDX] = 0.5;
        frame[FORWARD_SENSOR_IDX] = 0.3;

        let (dems, _) = ctrl.proc(&input(
            pose_at(0.0, 0.0, 0.0),
            Vector3::new(10.0, 5.0, 0.0),
            frame,
        )).unwrap();

        assert!((dems.left_rads - (1.0 - 0.7)).abs() < 1e-9);
        assert!((dems.right_rads - (1.0 + 0.7)).abs() < 1e-9);
    }

    #[test]
    fn test_target_reached_stops_and_flags() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        let (dems, report) = ctrl.proc(&input(
            pose_at(9.9, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            clear_frame(),
        )).unwrap();

        assert!(report.target_reached);
        assert_eq!(dems.left_rads, 0.0);
        assert_eq!(dems.right_rads, 0.0);
    }

    #[test]
    fn test_start_positions_captured_once() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        ctrl.proc(&input(
            pose_at(1.0, 2.0, 0.0),
            Vector3::new(10.0, 2.0, 0.0),
            clear_frame(),
        )).unwrap();

        ctrl.proc(&input(
            pose_at(3.0, 4.0, 0.0),
            Vector3::new(12.0, 6.0, 0.0),
            clear_frame(),
        )).unwrap();

        assert_eq!(ctrl.start_bot_pos.unwrap(), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(ctrl.start_target_pos.unwrap(), Vector3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_start_line_membership() {
        let mut ctrl = BugCtrl::with_params(Params::default());
        ctrl.start_bot_pos = Some(Vector3::new(0.0, 0.0, 0.0));
        ctrl.start_target_pos = Some(Vector3::new(10.0, 5.0, 0.0));

        // On the line
        assert!(ctrl.is_on_start_line(&Vector3::new(2.0, 1.0, 0.0)).unwrap());
        assert!(ctrl.is_on_start_line(&Vector3::new(-4.0, -2.0, 0.0)).unwrap());

        // Perpendicular offset well beyond tolerance
        assert!(!ctrl.is_on_start_line(&Vector3::new(2.0, 1.2, 0.0)).unwrap());
    }

    #[test]
    fn test_start_line_axis_aligned() {
        let mut ctrl = BugCtrl::with_params(Params::default());

        // Vertical start line x = 1
        ctrl.start_bot_pos = Some(Vector3::new(1.0, 0.0, 0.0));
        ctrl.start_target_pos = Some(Vector3::new(1.0, 5.0, 0.0));

        assert!(ctrl.is_on_start_line(&Vector3::new(1.0, 3.0, 0.0)).unwrap());
        assert!(ctrl.is_on_start_line(&Vector3::new(1.005, -2.0, 0.0)).unwrap());
        assert!(!ctrl.is_on_start_line(&Vector3::new(1.1, 3.0, 0.0)).unwrap());

        // Coincident start and target is degenerate, not a NaN
        ctrl.start_target_pos = ctrl.start_bot_pos;
        assert!(ctrl.is_on_start_line(&Vector3::new(1.0, 0.0, 0.0)).is_err());
    }
}
