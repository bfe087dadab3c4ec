//! Core foundation types shared by every layer.

pub mod types;

pub use types::{ImuFrame, Kinematics, Location, SimSettings, VehicleControl};
