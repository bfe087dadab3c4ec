//! Discrete longitudinal speed controller.
//!
//! Classic PID on the speed error in km/h, evaluated at the fixed control
//! update period. The output is a single pedal value in [-1, 1] split into
//! throttle (positive) and brake (negative). The integral term is clamped
//! so it can never demand more than full pedal on its own (anti-windup).

use crate::core::types::VehicleControl;
use crate::gains::GainTriple;

/// PID speed controller with anti-windup.
#[derive(Debug, Clone)]
pub struct LongitudinalPid {
    gains: GainTriple,
    /// Control update period in seconds.
    dt: f64,
    integral: f64,
    previous_error: f64,
    has_previous: bool,
}

impl LongitudinalPid {
    /// Controller with the given gains, updated every `dt` seconds.
    pub fn new(gains: GainTriple, dt: f64) -> Self {
        Self {
            gains,
            dt,
            integral: 0.0,
            previous_error: 0.0,
            has_previous: false,
        }
    }

    /// Current gains.
    pub fn gains(&self) -> GainTriple {
        self.gains
    }

    /// Replace the gains and clear the accumulated state.
    pub fn set_gains(&mut self, gains: GainTriple) {
        self.gains = gains;
        self.reset();
    }

    /// Clear integral and derivative history, e.g. after a teleport.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
        self.has_previous = false;
    }

    /// One control step toward `target_kmh` given the measured speed.
    pub fn step(&mut self, target_kmh: f64, current_kmh: f64) -> VehicleControl {
        let error = target_kmh - current_kmh;

        let windup_limit = if self.gains.ki > 0.0 {
            1.0 / self.gains.ki
        } else {
            f64::INFINITY
        };
        self.integral = (self.integral + error * self.dt).clamp(-windup_limit, windup_limit);

        let derivative = if self.has_previous {
            (error - self.previous_error) / self.dt
        } else {
            0.0
        };
        self.previous_error = error;
        self.has_previous = true;

        let output = self.gains.kp * error
            + self.gains.ki * self.integral
            + self.gains.kd * derivative;
        let pedal = output.clamp(-1.0, 1.0);

        if pedal >= 0.0 {
            VehicleControl {
                throttle: pedal,
                brake: 0.0,
                steer: 0.0,
            }
        } else {
            VehicleControl {
                throttle: 0.0,
                brake: -pedal,
                steer: 0.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> LongitudinalPid {
        LongitudinalPid::new(GainTriple::new(0.5, 0.01, 0.1), 0.1)
    }

    #[test]
    fn test_accelerates_when_below_target() {
        let mut pid = controller();
        let control = pid.step(30.0, 0.0);
        assert!(control.throttle > 0.0);
        assert_eq!(control.brake, 0.0);
    }

    #[test]
    fn test_brakes_when_above_target() {
        let mut pid = controller();
        let control = pid.step(0.0, 30.0);
        assert_eq!(control.throttle, 0.0);
        assert!(control.brake > 0.0);
    }

    #[test]
    fn test_output_is_saturated() {
        let mut pid = LongitudinalPid::new(GainTriple::new(2.0, 0.01, 0.0), 0.1);
        let control = pid.step(120.0, 0.0);
        assert_eq!(control.throttle, 1.0);
        let control = pid.step(0.0, 120.0);
        assert_eq!(control.brake, 1.0);
    }

    #[test]
    fn test_integral_windup_is_clamped() {
        let mut pid = LongitudinalPid::new(GainTriple::new(0.0, 0.01, 0.0), 0.1);
        // Large persistent error; without the clamp the integral would
        // keep growing past the pedal range.
        for _ in 0..100_000 {
            pid.step(50.0, 0.0);
        }
        let control = pid.step(50.0, 0.0);
        assert!(control.throttle <= 1.0);
        // Clamp bites at 1/ki worth of integral, i.e. full pedal.
        assert!((control.throttle - 1.0).abs() < 1e-9);
        // Recovery is immediate once the error flips.
        pid.reset();
        let control = pid.step(0.0, 10.0);
        assert!(control.brake > 0.0);
    }

    #[test]
    fn test_first_step_skips_derivative_kick() {
        let mut with_kd = LongitudinalPid::new(GainTriple::new(0.5, 0.0, 10.0), 0.1);
        let mut without_kd = LongitudinalPid::new(GainTriple::new(0.5, 0.0, 0.0), 0.1);
        let a = with_kd.step(10.0, 0.0);
        let b = without_kd.step(10.0, 0.0);
        assert!((a.throttle - b.throttle).abs() < 1e-12);
    }

    #[test]
    fn test_set_gains_clears_state() {
        let mut pid = controller();
        for _ in 0..10 {
            pid.step(50.0, 0.0);
        }
        pid.set_gains(GainTriple::new(1.0, 0.01, 0.2));
        // Fresh state: derivative suppressed, integral restarted.
        let control = pid.step(10.0, 0.0);
        let expected: f64 = 1.0 * 10.0 + 0.01 * (10.0 * 0.1);
        assert!((control.throttle - expected.min(1.0)).abs() < 1e-9);
    }
}
