//! Longitudinal point-mass vehicle model.
//!
//! Pedal commands map to accelerations, quadratic drag and rolling
//! resistance oppose motion, and the speed never goes negative (the model
//! has no reverse gear, matching a single-speed transmission in drive).

use super::config::VehicleConfig;

/// Longitudinal dynamics state.
#[derive(Debug, Clone)]
pub struct LongitudinalModel {
    config: VehicleConfig,
    /// Current speed (m/s), never negative.
    speed: f64,
    /// Acceleration applied during the last update (m/s^2).
    acceleration: f64,
}

impl LongitudinalModel {
    pub fn new(config: VehicleConfig) -> Self {
        Self {
            config,
            speed: 0.0,
            acceleration: 0.0,
        }
    }

    /// Current speed (m/s).
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Acceleration of the last update (m/s^2), signed.
    #[inline]
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Zero the motion state (teleport, reset).
    pub fn stop(&mut self) {
        self.speed = 0.0;
        self.acceleration = 0.0;
    }

    /// Integrate one timestep with the given pedal positions.
    pub fn update(&mut self, throttle: f64, brake: f64, dt: f64) {
        let throttle = throttle.clamp(0.0, 1.0);
        let brake = brake.clamp(0.0, 1.0);

        let drive = throttle * self.config.max_drive_accel;
        let braking = brake * self.config.max_brake_decel;
        let drag = self.config.drag * self.speed * self.speed;
        let rolling = if self.speed > 0.0 {
            self.config.rolling_resistance
        } else {
            0.0
        };

        let accel = drive - braking - drag - rolling;
        let new_speed = (self.speed + accel * dt).clamp(0.0, self.config.max_speed);
        // Report the realized acceleration so a wheel-stop reads as zero,
        // not as continued braking.
        self.acceleration = (new_speed - self.speed) / dt;
        self.speed = new_speed;
    }
}
