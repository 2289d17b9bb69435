//! Main navigation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and modules
//!     - Build the equipment adapter (the in-process simulation)
//!     - Install the stop signal handler
//!     - Hand over to the control loop driver
//!     - Report the terminal outcome
//!
//! # Modules
//!
//! All cyclic modules (e.g. `bug_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use nav_lib::{
    data_store::DataStore,
    nav_loop::{self, NavOutcome},
    sim_client::SimClient,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "nav_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Bug2 Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let loop_params: nav_loop::Params = util::params::load(
        "nav_exec.toml"
    ).wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.prox_model.init("prox_model.toml", &session)
        .wrap_err("Failed to initialise ProxModel")?;
    info!("ProxModel init complete");

    ds.bug_ctrl.init("bug_ctrl.toml", &session)
        .wrap_err("Failed to initialise BugCtrl")?;
    info!("BugCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE EQUIPMENT ----

    // A failure to bring up the equipment adapter is fatal, there is
    // nothing to retry against.
    let mut sim = SimClient::new("sim.toml")
        .wrap_err("Failed to initialise SimClient")?;
    info!("SimClient initialised");

    // ---- STOP SIGNAL ----

    let stop = Arc::new(AtomicBool::new(false));

    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .wrap_err("Failed to install the stop signal handler")?;
    }

    // ---- MAIN LOOP ----

    let outcome = nav_loop::run(&mut ds, &mut sim, &loop_params, &stop);

    match outcome {
        NavOutcome::TargetReached =>
            info!("Navigation complete: target reached"),
        NavOutcome::Cancelled =>
            info!("Navigation cancelled by operator"),
        NavOutcome::SensorFailure =>
            warn!("Navigation abandoned: sensors unavailable"),
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}
