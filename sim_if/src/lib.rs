//! # Simulation/robot interface crate.
//!
//! Provides the common equipment interface between the navigation software
//! and whatever is actually driving the robot, be that a physics simulation
//! or a real hardware transport.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data and trait definitions for equipment (sensors and actuators)
pub mod eqpt;
