//! drivestyle - labeled driving-style telemetry generator
//!
//! Runs one generation session against the reference simulator: picks PID
//! gains for the configured aggressiveness index, drives the configured
//! route and writes per-tick telemetry to CSV.
//!
//! ```bash
//! # With default config
//! cargo run --release
//!
//! # With custom config file
//! cargo run --release -- --config drivestyle.toml
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use drivestyle::core::types::Location;
use drivestyle::driver::{AgentOptions, DriverAgent};
use drivestyle::gains::{GainSearch, GainSearchConfig};
use drivestyle::route::LinearPlanner;
use drivestyle::session::{GenerationSession, SessionConfig};
use drivestyle::sim::{ReferenceSimConfig, ReferenceSimulator};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct Config {
    #[serde(default)]
    driver: DriverConfig,
    #[serde(default)]
    route: RouteConfig,
    #[serde(default)]
    simulation: ReferenceSimConfig,
    #[serde(default)]
    session: SessionConfig,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DriverConfig {
    /// Target aggressiveness index (70-160).
    target_index: i32,
    /// Agent behavior toggles.
    options: AgentOptions,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            target_index: 107,
            options: AgentOptions::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RouteConfig {
    /// Waypoints as [x, y] pairs in meters. The first one is the spawn
    /// point; the route runs through the rest.
    waypoints: Vec<[f64; 2]>,
    /// Route sampling resolution handed to the planner (meters).
    resolution: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            // 1.2 km straight, long enough for a few minutes of driving.
            waypoints: vec![[0.0, 0.0], [400.0, 0.0], [800.0, 0.0], [1200.0, 0.0]],
            resolution: 2.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OutputConfig {
    /// Telemetry CSV path.
    path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "telemetry.csv".to_string(),
        }
    }
}

// ============================================================================
// CLI Arguments
// ============================================================================

struct Args {
    config_path: Option<String>,
    target_index: Option<i32>,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        config_path: None,
        target_index: None,
        output: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    result.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--target" | "-t" => {
                if i + 1 < args.len() {
                    result.target_index = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--output" | "-o" => {
                if i + 1 < args.len() {
                    result.output = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    result
}

fn print_help() {
    println!("drivestyle - labeled driving-style telemetry generator");
    println!();
    println!("USAGE:");
    println!("    drivestyle [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (default: drivestyle.toml)");
    println!("    -t, --target <INDEX>    Target aggressiveness index override (70-160)");
    println!("    -o, --output <FILE>     Telemetry CSV path override");
    println!("    -h, --help              Print help information");
    println!();
    println!("CONFIGURATION:");
    println!("    All settings are configured via the TOML config file:");
    println!("    - [driver] target_index, options");
    println!("    - [route] waypoints, resolution");
    println!("    - [simulation] timestep, vehicle and IMU noise parameters");
    println!("    - [session] duration, speed profile, init cycle");
    println!("    - [output] path");
}

fn load_config(args: &Args) -> Config {
    match &args.config_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => {
                    log::info!("Loaded config from {}", path);
                    cfg
                }
                Err(e) => {
                    log::warn!("Failed to parse config {}: {}", path, e);
                    Config::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path, e);
                Config::default()
            }
        },
        None => {
            for path in &["drivestyle.toml", "/etc/drivestyle.toml"] {
                if let Ok(contents) = fs::read_to_string(path) {
                    if let Ok(cfg) = toml::from_str(&contents) {
                        log::info!("Loaded config from {}", path);
                        return cfg;
                    }
                }
            }
            Config::default()
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = parse_args();
    let mut config = load_config(&args);
    if let Some(target) = args.target_index {
        config.driver.target_index = target;
    }
    if let Some(output) = args.output {
        config.output.path = output;
    }

    log::info!("drivestyle starting");
    log::info!("  Target index: {}", config.driver.target_index);
    log::info!("  Output: {}", config.output.path);
    log::info!("  Timestep: {} s", config.simulation.fixed_delta_seconds);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");

    if let Err(e) = run(&config, running) {
        log::error!("Generation failed: {}", e);
        std::process::exit(1);
    }

    log::info!("drivestyle done");
}

fn run(
    config: &Config,
    running: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = ReferenceSimulator::new(config.simulation.clone());

    let search = GainSearch::new(GainSearchConfig::default());
    let mut driver = DriverAgent::new(
        search,
        config.driver.target_index,
        1.0 / config.session.control_rate_hz,
        config.driver.options,
    )?;

    let waypoints: Vec<Location> = config
        .route
        .waypoints
        .iter()
        .map(|wp| Location::new(wp[0], wp[1]))
        .collect();
    let planner = LinearPlanner::new(config.route.resolution);
    driver.install_plan(&mut sim, &planner, &waypoints)?;
    log::info!(
        "  Route: {} waypoints, {:.0} m planned",
        waypoints.len(),
        sim.plan_length()
    );

    let mut session = GenerationSession::new(config.session.clone(), &sim)?;
    let summary = session.run(
        &mut sim,
        &mut driver,
        Path::new(&config.output.path),
        running,
    )?;

    log::info!("Run summary:");
    log::info!("  Target index: {}", summary.target_index);
    log::info!(
        "  Gains: KP {:.4}, KI {:.4}, KD {:.4}",
        summary.gains.kp,
        summary.gains.ki,
        summary.gains.kd
    );
    log::info!(
        "  Recorded: {} rows, {:.1} s -> {}",
        summary.recording.rows,
        summary.recorded_duration,
        summary.recording.path.display()
    );
    Ok(())
}
