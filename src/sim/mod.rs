//! Simulator boundary and the reference simulation backend.
//!
//! The generator treats the driving simulator as an external collaborator
//! behind the narrow [`Simulator`] trait: apply a control command, advance
//! one timestep, read back kinematics and inertial data, read or set the
//! navigation plan. Nothing above this module knows which engine is on the
//! other side.
//!
//! [`ReferenceSimulator`] is the shipped backend: a deterministic
//! longitudinal point-mass vehicle following a polyline route, with seeded
//! Gaussian noise on the IMU channels. It exists so the whole pipeline runs
//! and tests end to end without an engine installed; it makes no physics
//! fidelity claims.
//!
//! # Simulation loop
//!
//! ```text
//! Every tick (default 5 ms):
//! 1. Integrate pedal commands into longitudinal acceleration and speed
//! 2. Advance the vehicle along the route polyline
//! 3. Derive yaw rate from the heading change
//! 4. Synthesize a six-axis IMU frame with configured noise
//! ```

pub mod config;
mod imu;
mod noise;
mod reference;
mod vehicle;

pub use config::{ImuNoiseConfig, ReferenceSimConfig, VehicleConfig};
pub use imu::ImuSimulator;
pub use noise::SensorNoise;
pub use reference::ReferenceSimulator;
pub use vehicle::LongitudinalModel;

use crate::core::types::{ImuFrame, Kinematics, Location, SimSettings, VehicleControl};

/// Narrow interface to the driving simulator.
pub trait Simulator {
    /// Simulation clock settings.
    fn settings(&self) -> SimSettings;

    /// Seconds of simulated time since the world started.
    fn elapsed_seconds(&self) -> f64;

    /// Install the control command applied on the next tick.
    fn apply_control(&mut self, control: VehicleControl);

    /// Advance the world by one fixed timestep.
    fn tick(&mut self);

    /// Current vehicle kinematics.
    fn kinematics(&self) -> Kinematics;

    /// Latest inertial reading.
    fn imu(&mut self) -> ImuFrame;

    /// Move the vehicle to a location, zeroing its motion state.
    fn teleport(&mut self, location: Location);

    /// Install the navigation plan the vehicle follows.
    fn set_plan(&mut self, route: Vec<Location>);

    /// The installed navigation plan.
    fn plan(&self) -> &[Location];
}
