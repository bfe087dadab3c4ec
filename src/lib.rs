//! drivestyle - labeled driving-style telemetry generator
//!
//! Drives a simulated vehicle to produce per-tick telemetry (speed,
//! pedals, six-axis inertial data) labeled with a target aggressiveness
//! index. The index is realized by searching longitudinal PID gains
//! against a cubic surrogate model fitted offline to simulation sweeps.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    session/                         │  ← Orchestration
//! │        (tick loop, init cycle, run summary)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────┐   ┌──────────────────────────┐
//! │       driver/        │   │        telemetry/        │  ← Agent + sink
//! │ (gains ↔ controller) │   │  (samples, CSV recorder) │
//! └──────────────────────┘   └──────────────────────────┘
//!                          │
//! ┌──────────────┐  ┌────────────┐  ┌───────────────────┐
//! │    gains/    │  │  control/  │  │      route/       │  ← Algorithms
//! │ (surrogate,  │  │   (PID)    │  │ (planner, stitch) │
//! │  search)     │  └────────────┘  └───────────────────┘
//! └──────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      sim/                           │  ← Engine boundary
//! │      (Simulator trait, reference backend)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      core/                          │  ← Foundation
//! │                     (types)                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Gain search
//!
//! The search inverts the surrogate: sample KP from a target-dependent
//! normal distribution, solve the resulting cubic for KD in closed form,
//! deduplicate by KP proximity, and pick the candidate nearest a set-point
//! that shifts with the normalized target index. Seeded per invocation, so
//! a target index always maps to the same gain triple.

// Layer 1: Core foundation (no internal deps)
pub mod core;

// Layer 2: Simulator boundary (depends on core)
pub mod sim;

// Layer 3: Algorithms (gains, control, routing)
pub mod gains;
pub mod control;
pub mod route;

// Layer 4: Driver agent and telemetry
pub mod driver;
pub mod telemetry;

// Layer 5: Session orchestration
pub mod session;

// Convenience re-exports (flat namespace for common use)

pub use crate::core::types::{ImuFrame, Kinematics, Location, SimSettings, VehicleControl};

pub use gains::{
    CandidateSampler, CandidateSet, GainSearch, GainSearchConfig, GainSearchError, GainTriple,
    SurrogateModel,
};

pub use control::LongitudinalPid;

pub use route::{LinearPlanner, RoutePlanner};

pub use sim::{
    ImuNoiseConfig, ReferenceSimConfig, ReferenceSimulator, Simulator, VehicleConfig,
};

pub use driver::{AgentOptions, DriverAgent, DriverError};

pub use telemetry::{CsvRecorder, RecordingInfo, TelemetrySample};

pub use session::{GenerationSession, RunSummary, SessionConfig, SessionError};
