//! # Control loop driver
//!
//! Fixed-period tick loop around the navigation modules. Each tick is
//! strictly sequential: cancellation check, sensor reads, proximity model,
//! navigation state machine, actuator writes, sleep. The state machine runs
//! to completion between any two actuator writes, there are no overlapping
//! ticks.
//!
//! The loop is generic over the equipment traits so the same driver runs
//! against the in-process simulation, a remote simulator adapter or real
//! hardware.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info, warn};
use nalgebra::Vector3;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

// Internal
use crate::bug_ctrl;
use crate::data_store::DataStore;
use crate::loc::Pose;
use sim_if::eqpt::{
    clock::Clock,
    pose::PoseSensor,
    prox::ProxSensorArray,
    wheels::{WheelActuator, WheelDems, WheelId},
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the control loop driver.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Target period of one control tick.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Number of consecutive failed sensor reads after which navigation is
    /// abandoned.
    pub max_consec_sensor_errors: u64,

    /// Name of the agent object at the pose sensor.
    pub bot_object_name: String,

    /// Name of the target object at the pose sensor.
    pub target_object_name: String,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Terminal result of a navigation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The agent came within the target-reached distance of the target.
    TargetReached,

    /// The stop signal was raised and the loop exited cooperatively.
    Cancelled,

    /// Sensor reads failed for too many consecutive ticks.
    SensorFailure,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Run the navigation loop to completion.
///
/// Returns when the target is reached, the stop flag is raised, or the
/// sensors become unusable. Errors inside a tick never abort the run: failed
/// reads reuse the previous tick's data, failed processing holds the
/// previous wheel demand, and failed writes are retried implicitly on the
/// next tick.
pub fn run<S>(
    ds: &mut DataStore,
    eqpt: &mut S,
    params: &Params,
    stop: &AtomicBool
) -> NavOutcome
where
    S: PoseSensor + ProxSensorArray + WheelActuator + Clock
{
    // The wall following controllers are built once per navigation run,
    // never mid-run
    ds.bug_ctrl.reset_pids();

    info!("Begining navigation loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- CANCELLATION ----

        if stop.load(Ordering::SeqCst) {
            info!("Stop requested, cancelling navigation");
            stop_wheels(eqpt);
            return NavOutcome::Cancelled
        }

        ds.cycle_start();

        // ---- DATA INPUT ----

        // Wheels are zeroed at the start of every tick, the demands
        // computed below only apply for the remainder of the tick
        stop_wheels(eqpt);

        let mut read_error = false;

        match eqpt.read_pose(&params.bot_object_name) {
            Ok(data) => ds.bot_pose = Some(Pose::from(data)),
            Err(e) => {
                warn!("Could not read bot pose: {}", e);
                read_error = true;
            }
        }

        match eqpt.read_pose(&params.target_object_name) {
            Ok(data) => ds.target_pos_m = Some(Vector3::from(data.position_m)),
            Err(e) => {
                warn!("Could not read target position: {}", e);
                read_error = true;
            }
        }

        match eqpt.read_all() {
            Ok(raw) => ds.raw_prox = Some(raw),
            Err(e) => {
                warn!("Could not read proximity sensors: {}", e);
                read_error = true;
            }
        }

        if read_error {
            ds.num_consec_sensor_errors += 1;

            if ds.num_consec_sensor_errors > params.max_consec_sensor_errors {
                error!(
                    "More than {} consecutive sensor read errors, abandoning \
                    navigation",
                    params.max_consec_sensor_errors
                );
                stop_wheels(eqpt);
                return NavOutcome::SensorFailure
            }
        }
        else {
            ds.num_consec_sensor_errors = 0;
        }

        // On a read error the previous tick's data is reused. Until a first
        // complete set of readings has arrived there is nothing to process.
        let (pose, target_pos_m, raw_prox) =
            match (ds.bot_pose, ds.target_pos_m, ds.raw_prox) {
                (Some(p), Some(t), Some(r)) => (p, t, r),
                _ => {
                    debug!("No complete sensor data yet, skipping tick");
                    eqpt.sleep(Duration::from_secs_f64(params.cycle_period_s));
                    continue
                }
            };

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.prox_model.proc(&raw_prox) {
            Ok((frame, report)) => {
                ds.danger_frame = frame;
                ds.prox_status_rpt = report;
            }
            Err(e) => {
                // Keep the previous frame, the read data was at fault
                warn!("Error during ProxModel processing: {}", e)
            }
        }

        match ds.bug_ctrl.proc(&bug_ctrl::InputData {
            pose,
            target_pos_m,
            danger_frame: ds.danger_frame,
        }) {
            Ok((output, report)) => {
                ds.bug_ctrl_output = output;
                ds.bug_ctrl_status_rpt = report;
            }
            Err(e) => {
                // A failed tick holds the previous demand rather than
                // issuing anything computed from degenerate data
                warn!("Error during BugCtrl processing: {}", e)
            }
        }

        // ---- ACTUATOR OUTPUT ----

        write_wheel_dems(eqpt, &ds.bug_ctrl_output);

        if ds.bug_ctrl_status_rpt.target_reached {
            info!("Target reached after {} cycles", ds.num_cycles);
            return NavOutcome::TargetReached
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;
        if cycle_dur.as_secs_f64() > params.cycle_period_s {
            warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - params.cycle_period_s
            );
        }

        eqpt.sleep(Duration::from_secs_f64(params.cycle_period_s));

        ds.num_cycles += 1;
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Demand a stop on both wheels, best effort.
fn stop_wheels<S: WheelActuator>(eqpt: &mut S) {
    write_wheel_dems(eqpt, &WheelDems::stop())
}

/// Write a wheel demand, best effort.
///
/// A dropped demand is logged and navigation continues, the next tick will
/// issue a fresh one.
fn write_wheel_dems<S: WheelActuator>(eqpt: &mut S, dems: &WheelDems) {
    if let Err(e) = eqpt.set_wheel_velocity(WheelId::Left, dems.left_rads) {
        warn!("Could not set left wheel velocity: {}", e);
    }
    if let Err(e) = eqpt.set_wheel_velocity(WheelId::Right, dems.right_rads) {
        warn!("Could not set right wheel velocity: {}", e);
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.2,
            max_consec_sensor_errors: 25,
            bot_object_name: "Bot".into(),
            target_object_name: "target".into(),
        }
    }
}
