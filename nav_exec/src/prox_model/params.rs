//! Parameters structure for the proximity model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the proximity model.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Range below which a sensor is considered saturated (danger 0.0).
    ///
    /// Units: meters
    pub min_detection_dist_m: f64,

    /// Range beyond which a reading is considered clear (danger 1.0).
    ///
    /// Units: meters
    pub max_detection_dist_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            min_detection_dist_m: 0.0,
            max_detection_dist_m: 1.0,
        }
    }
}
