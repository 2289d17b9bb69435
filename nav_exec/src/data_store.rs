//! # Data Store
//!
//! All per-run state lives here, owned by the control loop. Nothing in the
//! navigation core keeps ambient global state, so multiple independent
//! agents are just multiple `DataStore` instances.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;

use crate::{
    bug_ctrl::{self, BugCtrl},
    loc::Pose,
    prox_model::{self, DangerFrame, ProxModel},
};
use sim_if::eqpt::{
    prox::{ProxReading, NUM_PROX_SENSORS},
    wheels::WheelDems,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    // Sensor data
    //
    // These hold the most recent successful reading: on a failed read the
    // previous tick's value is reused.
    /// Latest pose of the agent
    pub bot_pose: Option<Pose>,

    /// Latest position of the target
    pub target_pos_m: Option<Vector3<f64>>,

    /// Latest raw proximity frame
    pub raw_prox: Option<[ProxReading; NUM_PROX_SENSORS]>,

    // ProxModel
    pub prox_model: ProxModel,
    pub danger_frame: DangerFrame,
    pub prox_status_rpt: prox_model::StatusReport,

    // BugCtrl
    pub bug_ctrl: BugCtrl,

    /// Last issued wheel demand. Held and re-issued when a tick's
    /// processing fails.
    pub bug_ctrl_output: WheelDems,
    pub bug_ctrl_status_rpt: bug_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive failed sensor reads
    pub num_consec_sensor_errors: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle. Sensor
    /// data and the last wheel demand are deliberately kept, they are the
    /// fallback when this cycle's reads or processing fail.
    pub fn cycle_start(&mut self) {
        self.prox_status_rpt = prox_model::StatusReport::default();
        self.bug_ctrl_status_rpt = bug_ctrl::StatusReport::default();
    }
}
