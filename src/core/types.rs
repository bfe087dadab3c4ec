//! Data types exchanged across the simulator boundary.
//!
//! Everything the generator reads from or writes to the simulation engine
//! passes through these types:
//! - [`VehicleControl`]: normalized actuation command
//! - [`Kinematics`]: vehicle position and speed readback
//! - [`ImuFrame`]: six-axis inertial reading
//! - [`SimSettings`]: simulation clock configuration
//!
//! Units are SI unless a field name says otherwise (speed limits follow road
//! signage convention and are km/h).

use serde::{Deserialize, Serialize};

/// Normalized control command applied to the vehicle.
///
/// Throttle and brake are pedal positions in [0, 1]; steer is a normalized
/// wheel angle in [-1, 1], negative to the left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleControl {
    pub throttle: f64,
    pub brake: f64,
    pub steer: f64,
}

impl VehicleControl {
    /// Command with every actuator released.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Pure braking command.
    pub fn braking(brake: f64) -> Self {
        Self {
            throttle: 0.0,
            brake,
            steer: 0.0,
        }
    }
}

/// 2D world position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another location.
    #[inline]
    pub fn distance(&self, other: &Location) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Six-axis inertial reading in the vehicle body frame.
///
/// Accelerometer in m/s^2 (X forward, Y left, Z up, gravity included on Z),
/// gyroscope in rad/s (Z is yaw rate, CCW positive).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuFrame {
    /// Accelerometer [x, y, z].
    pub accel: [f64; 3],
    /// Gyroscope [x, y, z].
    pub gyro: [f64; 3],
}

/// Kinematic state read back from the simulator each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Vehicle position in the world frame.
    pub location: Location,
    /// Ground speed magnitude (m/s).
    pub speed: f64,
    /// Speed limit of the current road segment (km/h).
    pub speed_limit_kmh: f64,
}

/// Simulation clock settings reported by the engine.
///
/// The generator only accepts synchronous worlds with a fixed timestep, so
/// recorded samples line up tick for tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSettings {
    /// Whether the world advances only on explicit ticks.
    pub synchronous_mode: bool,
    /// Fixed timestep in seconds.
    pub fixed_delta_seconds: f64,
    /// Whether rendering is disabled.
    pub no_rendering_mode: bool,
}
