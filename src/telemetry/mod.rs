//! Telemetry samples and the CSV sink.

mod writer;

pub use writer::{CsvRecorder, RecordingInfo, CSV_HEADER};

use crate::core::types::ImuFrame;

/// One recorded tick of the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Seconds since the recording loop started.
    pub time: f64,
    /// Measured ground speed (km/h).
    pub speed_kmh: f64,
    /// Speed the controller was steering toward (km/h).
    pub target_speed_kmh: f64,
    /// Applied throttle pedal [0, 1].
    pub throttle: f64,
    /// Applied brake pedal [0, 1].
    pub brake: f64,
    /// Inertial reading at this tick.
    pub imu: ImuFrame,
}
