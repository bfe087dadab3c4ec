//! Reference simulator configuration.
//!
//! Every parameter has a default matching a mid-size electric sedan with a
//! single-speed transmission, so a bare `[simulation]` section is enough
//! for basic usage.

use serde::Deserialize;

/// Vehicle longitudinal dynamics parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleConfig {
    /// Peak drive acceleration at full throttle (m/s^2).
    #[serde(default = "default_max_drive_accel")]
    pub max_drive_accel: f64,

    /// Peak service-brake deceleration at full pedal (m/s^2).
    #[serde(default = "default_max_brake_decel")]
    pub max_brake_decel: f64,

    /// Quadratic drag coefficient (1/m), deceleration = drag * v^2.
    #[serde(default = "default_drag")]
    pub drag: f64,

    /// Constant rolling-resistance deceleration while moving (m/s^2).
    #[serde(default = "default_rolling_resistance")]
    pub rolling_resistance: f64,

    /// Hard speed ceiling (m/s).
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
}

fn default_max_drive_accel() -> f64 {
    4.6
}
fn default_max_brake_decel() -> f64 {
    8.0
}
fn default_drag() -> f64 {
    4.0e-4
}
fn default_rolling_resistance() -> f64 {
    0.12
}
fn default_max_speed() -> f64 {
    60.0
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_drive_accel: default_max_drive_accel(),
            max_brake_decel: default_max_brake_decel(),
            drag: default_drag(),
            rolling_resistance: default_rolling_resistance(),
            max_speed: default_max_speed(),
        }
    }
}

/// IMU noise parameters, per axis [x, y, z].
#[derive(Debug, Clone, Deserialize)]
pub struct ImuNoiseConfig {
    /// Accelerometer noise standard deviation (m/s^2).
    #[serde(default = "default_accel_stddev")]
    pub accel_stddev: [f64; 3],

    /// Constant accelerometer bias (m/s^2).
    #[serde(default)]
    pub accel_bias: [f64; 3],

    /// Gyroscope noise standard deviation (rad/s).
    #[serde(default = "default_gyro_stddev")]
    pub gyro_stddev: [f64; 3],

    /// Constant gyroscope bias (rad/s).
    #[serde(default)]
    pub gyro_bias: [f64; 3],
}

fn default_accel_stddev() -> [f64; 3] {
    [0.02, 0.02, 0.04]
}
fn default_gyro_stddev() -> [f64; 3] {
    [0.002, 0.002, 0.004]
}

impl Default for ImuNoiseConfig {
    fn default() -> Self {
        Self {
            accel_stddev: default_accel_stddev(),
            accel_bias: [0.0, 0.0, 0.0],
            gyro_stddev: default_gyro_stddev(),
            gyro_bias: [0.0, 0.0, 0.0],
        }
    }
}

impl ImuNoiseConfig {
    /// Configuration with every noise channel silenced, for deterministic
    /// tests.
    pub fn noiseless() -> Self {
        Self {
            accel_stddev: [0.0; 3],
            accel_bias: [0.0; 3],
            gyro_stddev: [0.0; 3],
            gyro_bias: [0.0; 3],
        }
    }
}

/// Root configuration of the reference simulator.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceSimConfig {
    /// Fixed timestep in seconds.
    #[serde(default = "default_fixed_delta")]
    pub fixed_delta_seconds: f64,

    /// Random seed for sensor noise (0 = entropy each run).
    #[serde(default)]
    pub random_seed: u64,

    /// Speed limit reported for the whole route (km/h).
    #[serde(default = "default_speed_limit")]
    pub speed_limit_kmh: f64,

    /// Vehicle dynamics.
    #[serde(default)]
    pub vehicle: VehicleConfig,

    /// IMU noise model.
    #[serde(default)]
    pub imu: ImuNoiseConfig,
}

fn default_fixed_delta() -> f64 {
    0.005
}
fn default_speed_limit() -> f64 {
    50.0
}

impl Default for ReferenceSimConfig {
    fn default() -> Self {
        Self {
            fixed_delta_seconds: default_fixed_delta(),
            random_seed: 0,
            speed_limit_kmh: default_speed_limit(),
            vehicle: VehicleConfig::default(),
            imu: ImuNoiseConfig::default(),
        }
    }
}
