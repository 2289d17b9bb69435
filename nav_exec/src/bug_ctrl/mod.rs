//! Bug2 navigation control module
//!
//! The module alternates between heading straight for the target and
//! following the boundary of whatever obstacle got in the way, until the
//! line between the start position and the target is crossed again. It is
//! purely local and reactive: no map is built, and pathological obstacle
//! shapes can trap it indefinitely, which is an accepted property of the
//! Bug family of algorithms.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod action_moving;
mod action_rotating;
mod action_rounding;
mod controllers;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Index of the forward facing proximity sensor.
pub const FORWARD_SENSOR_IDX: usize = 4;

/// Index of the leading flank sensor used for wall following.
///
/// The machine always rounds obstacles to its own left, so the followed wall
/// is on its right and both flank sensors face that side.
pub const FLANK_LEAD_SENSOR_IDX: usize = 7;

/// Index of the trailing flank sensor used for wall following.
pub const FLANK_TRAIL_SENSOR_IDX: usize = 8;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during BugCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum BugCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    /// A geometric quantity degenerated to zero, for instance the vector
    /// from the agent to the target.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(#[from] util::maths::MathsError),

    /// The start line has not been captured yet. The start positions are
    /// recorded on the first processed tick, so this indicates rounding was
    /// entered without ever processing a tick.
    #[error("The start line has not been captured yet")]
    StartLineNotSet,

    /// The captured start and target positions coincide, so there is no
    /// start line to test against.
    #[error("The captured start and target positions coincide")]
    DegenerateStartLine,

    /// Rotating was entered without a target direction being set.
    #[error("No target direction set while rotating")]
    NoTargetDirection,
}
