//! # Simulation Client
//!
//! The SimClient provides a small in-process planar world implementing the
//! equipment traits, standing in for a remote simulator or real hardware.
//! It is to be used for testing and development of the navigation system
//! rather than actual driving of a robot. It provides:
//!
//! - A kinematic differential-drive model of the agent.
//! - Ray-cast range readings against circular obstacles for each of the 16
//!   proximity sensors.
//! - A simulated clock: sleeping advances simulated time instead of wall
//!   time, so runs and tests execute at full speed.
//!
//! The world is configured from a parameter file: obstacle layout, sensor
//! mount bearings, agent geometry and the object names the loop driver uses
//! to address the agent and the target.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::time::Duration;

use sim_if::eqpt::{
    clock::Clock,
    pose::{PoseData, PoseSensor},
    prox::{ProxReading, ProxSensorArray, NUM_PROX_SENSORS},
    wheels::{WheelActuator, WheelDems, WheelId},
    ActuatorError, SensorError,
};
use util::params as util_params;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum integration step for the kinematic model.
///
/// Sleeps longer than this are integrated in substeps so that turning
/// motion doesn't degrade at the control tick rate.
const MAX_STEP_S: f64 = 0.01;

/// Ray intersections closer than this are ignored as numerical noise.
const MIN_RAY_RANGE_M: f64 = 1e-6;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the simulated world.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Name under which the agent's pose is served.
    pub bot_object_name: String,

    /// Name under which the target's position is served.
    pub target_object_name: String,

    /// Starting position of the agent.
    ///
    /// Units: meters
    pub start_pos_m: [f64; 2],

    /// Starting heading of the agent.
    ///
    /// Units: radians
    pub start_yaw_rad: f64,

    /// Position of the target.
    ///
    /// Units: meters
    pub target_pos_m: [f64; 2],

    /// Radius of the drive wheels.
    ///
    /// Units: meters
    pub wheel_radius_m: f64,

    /// Distance between the two drive wheels.
    ///
    /// Units: meters
    pub track_width_m: f64,

    /// Maximum range of the proximity sensors.
    ///
    /// Units: meters
    pub max_range_m: f64,

    /// Mount bearing of each proximity sensor relative to the agent's
    /// forward direction, ordered by sensor index. Positive bearings are to
    /// the left.
    ///
    /// Units: degrees
    pub sensor_bearings_deg: Vec<f64>,

    /// Circular obstacles in the world.
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

/// A circular obstacle in the simulated world.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Obstacle {
    /// Position of the obstacle's centre.
    ///
    /// Units: meters
    pub pos_m: [f64; 2],

    /// Radius of the obstacle.
    ///
    /// Units: meters
    pub radius_m: f64,
}

/// In-process planar simulation of the agent and its world.
pub struct SimClient {
    params: Params,

    /// Agent position in the world frame
    pos_m: [f64; 2],

    /// Agent heading
    yaw_rad: f64,

    /// Currently commanded wheel rates
    wheel_dems: WheelDems,

    /// Elapsed simulated time
    sim_time_s: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimClientError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util_params::LoadError),

    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimClient {
    /// Create a new simulation from the given parameter file.
    pub fn new(params_path: &str) -> Result<Self, SimClientError> {
        let params = util_params::load(params_path)
            .map_err(SimClientError::ParamLoadError)?;

        Self::with_params(params)
    }

    /// Create a new simulation directly from a parameter struct.
    pub fn with_params(params: Params) -> Result<Self, SimClientError> {
        if params.sensor_bearings_deg.len() != NUM_PROX_SENSORS {
            return Err(SimClientError::InvalidConfig(format!(
                "expected {} sensor bearings, found {}",
                NUM_PROX_SENSORS,
                params.sensor_bearings_deg.len()
            )))
        }
        if params.wheel_radius_m <= 0.0 || params.track_width_m <= 0.0 {
            return Err(SimClientError::InvalidConfig(
                "wheel radius and track width must be positive".into()
            ))
        }
        if params.max_range_m <= 0.0 {
            return Err(SimClientError::InvalidConfig(
                "sensor range must be positive".into()
            ))
        }

        Ok(Self {
            pos_m: params.start_pos_m,
            yaw_rad: params.start_yaw_rad,
            wheel_dems: WheelDems::stop(),
            sim_time_s: 0.0,
            params,
        })
    }

    /// Elapsed simulated time.
    ///
    /// Units: seconds
    pub fn sim_time_s(&self) -> f64 {
        self.sim_time_s
    }

    /// Advance the world by the given duration under the currently
    /// commanded wheel rates.
    pub fn step(&mut self, dt_s: f64) {
        let mut remaining_s = dt_s;

        while remaining_s > 0.0 {
            let step_s = remaining_s.min(MAX_STEP_S);
            self.integrate(step_s);
            remaining_s -= step_s;
        }

        self.sim_time_s += dt_s;
    }

    /// Single Euler step of the differential-drive kinematics.
    fn integrate(&mut self, dt_s: f64) {
        let speed_ms = self.params.wheel_radius_m
            * (self.wheel_dems.left_rads + self.wheel_dems.right_rads)
            / 2.0;

        let turn_rate_rads = self.params.wheel_radius_m
            * (self.wheel_dems.right_rads - self.wheel_dems.left_rads)
            / self.params.track_width_m;

        self.pos_m[0] += speed_ms * self.yaw_rad.cos() * dt_s;
        self.pos_m[1] += speed_ms * self.yaw_rad.sin() * dt_s;
        self.yaw_rad += turn_rate_rads * dt_s;
    }

    /// Cast a ray from the agent's position and return the range to the
    /// nearest obstacle surface within sensor range, if any.
    fn ray_range(&self, direction_rad: f64) -> Option<f64> {
        let (sin_d, cos_d) = direction_rad.sin_cos();

        let mut nearest_m: Option<f64> = None;

        for obstacle in &self.params.obstacles {
            // Solve |o + t*d - c| = r for the smallest positive t
            let to_centre = [
                obstacle.pos_m[0] - self.pos_m[0],
                obstacle.pos_m[1] - self.pos_m[1],
            ];

            let proj = to_centre[0] * cos_d + to_centre[1] * sin_d;
            let closest_sq = to_centre[0] * to_centre[0]
                + to_centre[1] * to_centre[1]
                - proj * proj;

            let disc = obstacle.radius_m * obstacle.radius_m - closest_sq;
            if disc < 0.0 {
                continue
            }

            let range_m = proj - disc.sqrt();
            if range_m < MIN_RAY_RANGE_M || range_m > self.params.max_range_m {
                continue
            }

            if nearest_m.map_or(true, |n| range_m < n) {
                nearest_m = Some(range_m);
            }
        }

        nearest_m
    }
}

impl PoseSensor for SimClient {
    fn read_pose(&mut self, object: &str) -> Result<PoseData, SensorError> {
        if object == self.params.bot_object_name {
            Ok(PoseData {
                position_m: [self.pos_m[0], self.pos_m[1], 0.0],
                euler_rad: [0.0, 0.0, self.yaw_rad],
            })
        }
        else if object == self.params.target_object_name {
            Ok(PoseData {
                position_m: [
                    self.params.target_pos_m[0],
                    self.params.target_pos_m[1],
                    0.0,
                ],
                euler_rad: [0.0; 3],
            })
        }
        else {
            Err(SensorError::UnknownObject(object.to_string()))
        }
    }
}

impl ProxSensorArray for SimClient {
    fn read_all(&mut self) -> Result<[ProxReading; NUM_PROX_SENSORS], SensorError> {
        let mut readings = [ProxReading::default(); NUM_PROX_SENSORS];

        for (i, reading) in readings.iter_mut().enumerate() {
            let direction_rad = self.yaw_rad
                + self.params.sensor_bearings_deg[i].to_radians();

            if let Some(range_m) = self.ray_range(direction_rad) {
                reading.distance_m = range_m;
                reading.detected = true;
            }
        }

        Ok(readings)
    }
}

impl WheelActuator for SimClient {
    fn set_wheel_velocity(
        &mut self,
        wheel: WheelId,
        rate_rads: f64
    ) -> Result<(), ActuatorError> {
        match wheel {
            WheelId::Left => self.wheel_dems.left_rads = rate_rads,
            WheelId::Right => self.wheel_dems.right_rads = rate_rads,
        }

        Ok(())
    }
}

impl Clock for SimClient {
    /// Sleeping advances simulated time under the commanded wheel rates.
    fn sleep(&mut self, duration: Duration) {
        self.step(duration.as_secs_f64());
    }
}

impl Default for Params {
    /// An obstacle-free world with the target two meters ahead of the
    /// agent, with Pioneer-class agent geometry.
    fn default() -> Self {
        Self {
            bot_object_name: "Bot".into(),
            target_object_name: "target".into(),
            start_pos_m: [0.0, 0.0],
            start_yaw_rad: 0.0,
            target_pos_m: [2.0, 0.0],
            wheel_radius_m: 0.0975,
            track_width_m: 0.33,
            max_range_m: 1.0,
            sensor_bearings_deg: vec![
                85.0, 65.0, 40.0, 20.0, 0.0, -20.0, -40.0, -70.0,
                -110.0, -140.0, -160.0, 180.0, 160.0, 140.0, 110.0, 95.0,
            ],
            obstacles: vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_forward_ray_hits_obstacle() {
        let mut params = Params::default();
        params.obstacles.push(Obstacle {
            pos_m: [1.0, 0.0],
            radius_m: 0.3,
        });

        let mut sim = SimClient::with_params(params).unwrap();
        let readings = sim.read_all().unwrap();

        // The forward sensor sees the near face of the obstacle
        let forward = readings[crate::bug_ctrl::FORWARD_SENSOR_IDX];
        assert!(forward.detected);
        assert!((forward.distance_m - 0.7).abs() < 1e-9);

        // A sensor looking the other way sees nothing
        assert!(!readings[11].detected);
    }

    #[test]
    fn test_out_of_range_obstacle_not_detected() {
        let mut params = Params::default();
        params.obstacles.push(Obstacle {
            pos_m: [5.0, 0.0],
            radius_m: 0.3,
        });

        let mut sim = SimClient::with_params(params).unwrap();
        let readings = sim.read_all().unwrap();

        assert!(readings.iter().all(|r| !r.detected));
    }

    #[test]
    fn test_kinematics_straight() {
        let mut sim = SimClient::with_params(Params::default()).unwrap();

        sim.set_wheel_velocity(WheelId::Left, 1.0).unwrap();
        sim.set_wheel_velocity(WheelId::Right, 1.0).unwrap();
        sim.step(2.0);

        // Equal rates drive straight along +X at wheel_radius m/s
        let pose = sim.read_pose("Bot").unwrap();
        assert!((pose.position_m[0] - 2.0 * 0.0975).abs() < 1e-9);
        assert!(pose.position_m[1].abs() < 1e-9);
        assert!(pose.euler_rad[2].abs() < 1e-9);
    }

    #[test]
    fn test_kinematics_spin_in_place() {
        let mut sim = SimClient::with_params(Params::default()).unwrap();

        sim.set_wheel_velocity(WheelId::Left, -1.0).unwrap();
        sim.set_wheel_velocity(WheelId::Right, 1.0).unwrap();
        sim.step(1.0);

        // Opposite rates turn CCW without translating
        let pose = sim.read_pose("Bot").unwrap();
        assert!(pose.position_m[0].abs() < 1e-9);
        assert!(pose.position_m[1].abs() < 1e-9);
        assert!(pose.euler_rad[2] > 0.0);
    }

    #[test]
    fn test_unknown_object_rejected() {
        let mut sim = SimClient::with_params(Params::default()).unwrap();

        assert!(matches!(
            sim.read_pose("NoSuchObject"),
            Err(SensorError::UnknownObject(_))
        ));
    }

    #[test]
    fn test_bearing_count_validated() {
        let mut params = Params::default();
        params.sensor_bearings_deg.pop();

        assert!(SimClient::with_params(params).is_err());
    }
}
