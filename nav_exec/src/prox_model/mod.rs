//! # Proximity model module
//!
//! Converts the raw per-sensor range readings into a frame of normalised
//! "danger" scalars, one per sensor. A danger of 1.0 means the sensor sees
//! nothing (clear), 0.0 means the sensor is saturated at minimum range. The
//! mapping is a linear interpolation between the minimum and maximum
//! detection distances.
//!
//! The model is stateless between ticks: the same raw frame always produces
//! the same danger frame.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
pub use params::Params;
use sim_if::eqpt::prox::{ProxReading, NUM_PROX_SENSORS};
use util::{maths, module::State, params as util_params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A full frame of danger scalars, indexed by sensor number.
///
/// All values lie in [0.0, 1.0].
pub type DangerFrame = [f64; NUM_PROX_SENSORS];

/// Proximity model module state
#[derive(Debug, Default)]
pub struct ProxModel {
    params: Params,
}

/// Status report for proximity model processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Number of sensors currently detecting something within range.
    pub num_detections: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ProxModel operation.
#[derive(Debug, thiserror::Error)]
pub enum ProxModelError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util_params::LoadError),

    #[error(
        "Invalid detection range: min ({0} m) must be below max ({1} m)"
    )]
    InvalidDetectionRange(f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ProxModel {
    type InitData = &'static str;
    type InitError = ProxModelError;

    type InputData = [ProxReading; NUM_PROX_SENSORS];
    type OutputData = DangerFrame;
    type StatusReport = StatusReport;
    type ProcError = ProxModelError;

    /// Initialise the proximity model.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = util_params::load(init_data)
            .map_err(ProxModelError::ParamLoadError)?;

        Self::validate(&params)?;
        self.params = params;

        Ok(())
    }

    /// Convert one raw frame into a danger frame.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let mut frame: DangerFrame = [1.0; NUM_PROX_SENSORS];
        let mut report = StatusReport::default();

        let min = self.params.min_detection_dist_m;
        let max = self.params.max_detection_dist_m;

        for (i, reading) in input_data.iter().enumerate() {
            if reading.detected {
                report.num_detections += 1;
            }

            // Point blank readings should not occur but are guarded, they
            // saturate the sensor rather than wrapping the interpolation.
            let danger = if reading.distance_m < min {
                0.0
            }
            else if reading.distance_m > max || !reading.detected {
                1.0
            }
            else {
                1.0 - ((reading.distance_m - max) / (min - max))
            };

            frame[i] = maths::clamp(&danger, &0.0, &1.0);
        }

        Ok((frame, report))
    }
}

impl ProxModel {
    /// Build a model directly from a parameter struct, without touching the
    /// filesystem. Used by tests and embedders.
    pub fn with_params(params: Params) -> Result<Self, ProxModelError> {
        Self::validate(&params)?;
        Ok(Self { params })
    }

    fn validate(params: &Params) -> Result<(), ProxModelError> {
        if params.min_detection_dist_m >= params.max_detection_dist_m {
            return Err(ProxModelError::InvalidDetectionRange(
                params.min_detection_dist_m,
                params.max_detection_dist_m,
            ))
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reading(distance_m: f64, detected: bool) -> ProxReading {
        ProxReading { distance_m, detected }
    }

    fn proc_one(model: &mut ProxModel, r: ProxReading) -> f64 {
        let mut raw = [ProxReading::default(); NUM_PROX_SENSORS];
        raw[0] = r;
        let (frame, _) = model.proc(&raw).unwrap();
        frame[0]
    }

    #[test]
    fn test_danger_mapping() {
        let mut model = ProxModel::with_params(Params::default()).unwrap();

        // Not detected is clear
        assert_eq!(proc_one(&mut model, reading(0.3, false)), 1.0);

        // Beyond max range is clear
        assert_eq!(proc_one(&mut model, reading(2.0, true)), 1.0);

        // Below min range saturates
        assert_eq!(proc_one(&mut model, reading(-0.1, true)), 0.0);

        // In between the mapping is linear: with the default range
        // [0, 1] the danger equals the distance
        assert!((proc_one(&mut model, reading(0.25, true)) - 0.25).abs() < 1e-12);
        assert!((proc_one(&mut model, reading(0.75, true)) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let mut model = ProxModel::with_params(Params::default()).unwrap();

        let mut prev = -1.0;
        for i in 0..=20 {
            let d = i as f64 * 0.05;
            let danger = proc_one(&mut model, reading(d, true));

            assert!(danger >= 0.0 && danger <= 1.0);
            assert!(danger >= prev, "danger not monotonic at {} m", d);
            prev = danger;
        }
    }

    #[test]
    fn test_idempotent() {
        let mut model = ProxModel::with_params(Params::default()).unwrap();

        let mut raw = [ProxReading::default(); NUM_PROX_SENSORS];
        for (i, r) in raw.iter_mut().enumerate() {
            r.distance_m = i as f64 * 0.06;
            r.detected = i % 3 != 0;
        }

        let (first, _) = model.proc(&raw).unwrap();
        let (second, _) = model.proc(&raw).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let params = Params {
            min_detection_dist_m: 1.0,
            max_detection_dist_m: 0.5,
        };

        assert!(ProxModel::with_params(params).is_err());
    }
}
