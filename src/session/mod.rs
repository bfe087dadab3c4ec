//! Generation session: drives one recorded simulation run.
//!
//! A session wires the driver agent, the simulator and the telemetry sink
//! together:
//!
//! ```text
//! ┌──────────────┐  run_step   ┌───────────────┐
//! │ DriverAgent  │────────────▶│   Simulator   │
//! └──────────────┘   control   └───────┬───────┘
//!        ▲                             │ kinematics + IMU
//!        │ target speed                ▼
//! ┌──────┴───────┐  samples    ┌───────────────┐
//! │ tick loop    │────────────▶│ writer thread │──▶ CSV
//! └──────────────┘  (channel)  └───────────────┘
//! ```
//!
//! The tick loop produces one sample per simulation step; a dedicated
//! writer thread drains the bounded channel into the CSV recorder so file
//! I/O never stalls the simulation.
//!
//! A session runs exactly once. Before recording it executes an
//! initialization cycle (speed up, stop, teleport back, hold the brake)
//! that flushes the warm-up artifacts simulators tend to produce on the
//! first moments of a run, mainly spurious velocity spikes.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use serde::Deserialize;
use thiserror::Error;

use crate::core::types::VehicleControl;
use crate::driver::{AgentOptions, DriverAgent};
use crate::gains::GainTriple;
use crate::sim::Simulator;
use crate::telemetry::{CsvRecorder, RecordingInfo, TelemetrySample};

/// Recommended simulation timestep (seconds).
const RECOMMENDED_DT: f64 = 0.005;

/// Initialization cycle: target speed (km/h) and phase durations (s).
const INIT_TARGET_KMH: f64 = 10.0;
const INIT_DRIVE_DURATION: f64 = 10.0;
const INIT_STOP_LEAD: f64 = 3.0;
const INIT_BRAKE_PEDAL: f64 = 0.3;
const INIT_BRAKE_DURATION: f64 = 3.0;

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Expected simulation timestep (s); must match the world settings.
    pub dt: f64,
    /// Longitudinal control update rate (Hz).
    pub control_rate_hz: f64,
    /// Maximum recorded duration (s).
    pub max_duration: f64,
    /// Stop once the vehicle is within 0.5 m of the route end.
    pub stop_at_end: bool,
    /// Desired speed profile (km/h), sampled every `speed_profile_dt`.
    /// When absent the vehicle tracks the posted speed limit.
    pub speed_profile: Option<Vec<f64>>,
    /// Speed profile timestep (s).
    pub speed_profile_dt: f64,
    /// Run the initialization cycle before recording.
    pub init_cycle: bool,
    /// Overwrite an existing output file instead of failing.
    pub overwrite: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dt: RECOMMENDED_DT,
            control_rate_hz: 10.0,
            max_duration: 60.0,
            stop_at_end: true,
            speed_profile: None,
            speed_profile_dt: 0.1,
            init_cycle: true,
            overwrite: false,
        }
    }
}

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The world must tick synchronously for sample alignment.
    #[error("the world must be in synchronous mode")]
    WorldNotSynchronous,

    /// The world timestep differs from the configured one.
    #[error("world timestep {actual} s does not match configured {expected} s")]
    TimestepMismatch { expected: f64, actual: f64 },

    /// Each session records at most one run.
    #[error("this session has already performed its run; create a new one")]
    AlreadyPerformed,

    /// A parameter failed validation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Output exists and overwriting is disabled.
    #[error("output file {0} already exists")]
    OutputExists(PathBuf),

    /// Recorder I/O failure.
    #[error("telemetry I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The writer thread panicked.
    #[error("telemetry writer thread failed")]
    WriterFailed,
}

/// Summary of a completed run, the run's label and provenance.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Target aggressiveness index the driver was configured for.
    pub target_index: i32,
    /// Controller gains that produced the run.
    pub gains: GainTriple,
    /// Agent options active during the run.
    pub options: AgentOptions,
    /// Seconds of telemetry recorded.
    pub recorded_duration: f64,
    /// Output file details.
    pub recording: RecordingInfo,
}

/// One-shot generation session.
pub struct GenerationSession {
    config: SessionConfig,
    performed: bool,
}

impl GenerationSession {
    /// Validate the world settings and build a session.
    pub fn new(
        config: SessionConfig,
        sim: &dyn Simulator,
    ) -> Result<Self, SessionError> {
        let settings = sim.settings();
        if !settings.synchronous_mode {
            return Err(SessionError::WorldNotSynchronous);
        }
        if (settings.fixed_delta_seconds - config.dt).abs() > 1e-9 {
            return Err(SessionError::TimestepMismatch {
                expected: config.dt,
                actual: settings.fixed_delta_seconds,
            });
        }
        if !settings.no_rendering_mode {
            log::warn!("rendering is on; the simulation may run slower and samples may drift");
        }
        if (config.dt - RECOMMENDED_DT).abs() > 1e-9 {
            log::warn!(
                "timestep {} s differs from the recommended {} s",
                config.dt,
                RECOMMENDED_DT
            );
        }
        Ok(Self {
            config,
            performed: false,
        })
    }

    /// Run the session and write telemetry to `output`.
    ///
    /// Clearing `running` stops the loop at the next tick.
    pub fn run(
        &mut self,
        sim: &mut dyn Simulator,
        driver: &mut DriverAgent,
        output: &Path,
        running: Arc<AtomicBool>,
    ) -> Result<RunSummary, SessionError> {
        if self.performed {
            return Err(SessionError::AlreadyPerformed);
        }
        if self.config.max_duration <= 0.0 {
            return Err(SessionError::InvalidParameter(
                "max_duration must be positive".into(),
            ));
        }
        if self.config.speed_profile_dt <= 0.0 {
            return Err(SessionError::InvalidParameter(
                "speed_profile_dt must be positive".into(),
            ));
        }
        if let Some(profile) = &self.config.speed_profile {
            if profile.is_empty() {
                return Err(SessionError::InvalidParameter(
                    "speed_profile must not be empty".into(),
                ));
            }
        }
        if output.exists() {
            if !self.config.overwrite {
                return Err(SessionError::OutputExists(output.to_path_buf()));
            }
            log::warn!("overwriting existing output file {}", output.display());
        }
        if !self.config.stop_at_end {
            log::warn!(
                "stop_at_end disabled: past the route end the vehicle holds its final position"
            );
        }
        self.performed = true;

        // Writer thread drains samples into the CSV sink.
        let recorder = CsvRecorder::create(output)?;
        let (sample_tx, sample_rx) = bounded::<TelemetrySample>(1024);
        let writer = thread::Builder::new()
            .name("telemetry-writer".into())
            .spawn(move || -> std::io::Result<RecordingInfo> {
                let mut recorder = recorder;
                for sample in sample_rx {
                    recorder.record(&sample)?;
                }
                recorder.finish()
            })
            .expect("failed to spawn telemetry writer thread");

        if self.config.init_cycle {
            self.run_init_cycle(sim, driver, &running);
        }

        // With no profile the agent tracks the posted limits.
        let follow_limits = self.config.speed_profile.is_none();
        driver.set_options(AgentOptions {
            follow_speed_limits: follow_limits,
            ..driver.options()
        });

        log::info!("starting recording loop");
        let control_period = 1.0 / self.config.control_rate_hz;
        let end_location = driver.end_location();
        let t0 = sim.elapsed_seconds();
        let mut last_control_t = 0.0;
        let mut control = VehicleControl::idle();
        let mut recorded_duration = 0.0;

        loop {
            let t = sim.elapsed_seconds() - t0;
            let kinematics = sim.kinematics();
            let speed_kmh = kinematics.speed * 3.6;

            let target_kmh = match &self.config.speed_profile {
                Some(profile) => {
                    let index = (t / self.config.speed_profile_dt) as usize;
                    profile[index.min(profile.len() - 1)]
                }
                None => kinematics.speed_limit_kmh,
            };
            driver.set_target_speed(target_kmh);

            let imu = sim.imu();
            let sample = TelemetrySample {
                time: t,
                speed_kmh,
                target_speed_kmh: target_kmh,
                throttle: control.throttle,
                brake: control.brake,
                imu,
            };
            if sample_tx.send(sample).is_err() {
                log::error!("telemetry writer stopped early, aborting run");
                break;
            }
            recorded_duration = t;

            // Longitudinal control refreshes at the control rate; between
            // updates the previous command keeps being applied.
            if t - last_control_t >= control_period - 1e-9 {
                last_control_t = t;
                control = driver.run_step(speed_kmh);
            }
            sim.apply_control(control);
            sim.tick();

            if t >= self.config.max_duration {
                log::info!("maximum duration reached");
                break;
            }
            if self.config.stop_at_end {
                if let Some(end) = end_location {
                    if sim.kinematics().location.distance(&end) < 0.5 {
                        log::info!("route end reached");
                        break;
                    }
                }
            }
            if !running.load(Ordering::Relaxed) {
                log::info!("stop requested, ending run");
                break;
            }
        }

        drop(sample_tx);
        let recording = writer
            .join()
            .map_err(|_| SessionError::WriterFailed)??;
        log::info!(
            "run complete: {} rows, {:.1} s of telemetry",
            recording.rows,
            recorded_duration
        );

        Ok(RunSummary {
            target_index: driver.target_index(),
            gains: driver.gains(),
            options: driver.options(),
            recorded_duration,
            recording,
        })
    }

    /// Warm-up cycle: accelerate toward a low target, command a stop,
    /// teleport back to the start and hold the brake.
    fn run_init_cycle(
        &self,
        sim: &mut dyn Simulator,
        driver: &mut DriverAgent,
        running: &Arc<AtomicBool>,
    ) {
        log::info!("starting initialization cycle");
        driver.set_options(AgentOptions {
            follow_speed_limits: false,
            ..driver.options()
        });

        let t0 = sim.elapsed_seconds();
        loop {
            let t = sim.elapsed_seconds() - t0;
            let target = if t >= INIT_DRIVE_DURATION - INIT_STOP_LEAD {
                0.0
            } else {
                INIT_TARGET_KMH
            };
            driver.set_target_speed(target);
            let speed_kmh = sim.kinematics().speed * 3.6;
            let control = driver.run_step(speed_kmh);
            sim.apply_control(control);
            sim.tick();
            if t >= INIT_DRIVE_DURATION || !running.load(Ordering::Relaxed) {
                break;
            }
        }

        driver.reset(sim);

        let t0 = sim.elapsed_seconds();
        loop {
            let t = sim.elapsed_seconds() - t0;
            sim.apply_control(VehicleControl::braking(INIT_BRAKE_PEDAL));
            sim.tick();
            if t >= INIT_BRAKE_DURATION || !running.load(Ordering::Relaxed) {
                sim.apply_control(VehicleControl::idle());
                break;
            }
        }
        log::info!("initialization cycle complete");
    }
}
