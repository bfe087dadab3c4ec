//! Reference simulation backend.
//!
//! Deterministic stand-in for an external driving engine: a longitudinal
//! point-mass vehicle glued to a polyline route. Lateral control is assumed
//! perfect, so the vehicle never leaves the route and the steer channel of
//! the control command is accepted but unused.

use std::f64::consts::{PI, TAU};

use super::config::ReferenceSimConfig;
use super::imu::ImuSimulator;
use super::noise::SensorNoise;
use super::vehicle::LongitudinalModel;
use super::Simulator;
use crate::core::types::{ImuFrame, Kinematics, Location, SimSettings, VehicleControl};

/// Reference simulator implementing the [`Simulator`] boundary.
pub struct ReferenceSimulator {
    config: ReferenceSimConfig,
    elapsed: f64,
    control: VehicleControl,
    vehicle: LongitudinalModel,
    imu: ImuSimulator,
    route: Vec<Location>,
    /// Cumulative arc length at each route point; empty when no plan is set.
    cumulative: Vec<f64>,
    /// Distance traveled along the current plan.
    arc: f64,
    location: Location,
    heading: f64,
    yaw_rate: f64,
}

impl ReferenceSimulator {
    pub fn new(config: ReferenceSimConfig) -> Self {
        let vehicle = LongitudinalModel::new(config.vehicle.clone());
        let imu = ImuSimulator::new(config.imu.clone(), SensorNoise::new(config.random_seed));
        Self {
            config,
            elapsed: 0.0,
            control: VehicleControl::idle(),
            vehicle,
            imu,
            route: Vec::new(),
            cumulative: Vec::new(),
            arc: 0.0,
            location: Location::new(0.0, 0.0),
            heading: 0.0,
            yaw_rate: 0.0,
        }
    }

    /// Total length of the installed plan in meters.
    pub fn plan_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn rebuild_cumulative(&mut self) {
        self.cumulative.clear();
        if self.route.is_empty() {
            return;
        }
        self.cumulative.reserve(self.route.len());
        let mut total = 0.0;
        self.cumulative.push(0.0);
        for pair in self.route.windows(2) {
            total += pair[0].distance(&pair[1]);
            self.cumulative.push(total);
        }
    }

    /// Position and segment heading at arc length `s` along the plan.
    fn point_at_arc(&self, s: f64) -> (Location, f64) {
        debug_assert!(!self.route.is_empty());
        if self.route.len() == 1 {
            return (self.route[0], self.heading);
        }

        let total = self.plan_length();
        let s = s.clamp(0.0, total);
        // Find the segment containing s.
        let mut index = match self.cumulative.binary_search_by(|c| c.total_cmp(&s)) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        index = index.min(self.route.len() - 2);

        let a = self.route[index];
        let b = self.route[index + 1];
        let segment_len = b.distance(&a);
        let heading = (b.y - a.y).atan2(b.x - a.x);
        if segment_len < 1e-12 {
            return (a, heading);
        }
        let t = ((s - self.cumulative[index]) / segment_len).clamp(0.0, 1.0);
        let location = Location::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        (location, heading)
    }

    /// Arc length of the plan point nearest to `location`.
    fn nearest_arc(&self, location: Location) -> f64 {
        let mut best_arc = 0.0;
        let mut best_distance = f64::INFINITY;
        for (index, pair) in self.route.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            let seg_x = b.x - a.x;
            let seg_y = b.y - a.y;
            let len_sq = seg_x * seg_x + seg_y * seg_y;
            let t = if len_sq < 1e-12 {
                0.0
            } else {
                (((location.x - a.x) * seg_x + (location.y - a.y) * seg_y) / len_sq).clamp(0.0, 1.0)
            };
            let projected = Location::new(a.x + seg_x * t, a.y + seg_y * t);
            let distance = location.distance(&projected);
            if distance < best_distance {
                best_distance = distance;
                best_arc = self.cumulative[index] + len_sq.sqrt() * t;
            }
        }
        best_arc
    }
}

impl Simulator for ReferenceSimulator {
    fn settings(&self) -> SimSettings {
        SimSettings {
            synchronous_mode: true,
            fixed_delta_seconds: self.config.fixed_delta_seconds,
            no_rendering_mode: true,
        }
    }

    fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    fn apply_control(&mut self, control: VehicleControl) {
        self.control = control;
    }

    fn tick(&mut self) {
        let dt = self.config.fixed_delta_seconds;
        self.vehicle
            .update(self.control.throttle, self.control.brake, dt);

        if self.route.len() >= 2 {
            self.arc = (self.arc + self.vehicle.speed() * dt).min(self.plan_length());
            let (location, heading) = self.point_at_arc(self.arc);
            self.location = location;
            self.yaw_rate = normalize_angle(heading - self.heading) / dt;
            self.heading = heading;
        } else {
            // No plan: drift straight along the current heading.
            let step = self.vehicle.speed() * dt;
            self.location.x += step * self.heading.cos();
            self.location.y += step * self.heading.sin();
            self.yaw_rate = 0.0;
        }

        self.elapsed += dt;
    }

    fn kinematics(&self) -> Kinematics {
        Kinematics {
            location: self.location,
            speed: self.vehicle.speed(),
            speed_limit_kmh: self.config.speed_limit_kmh,
        }
    }

    fn imu(&mut self) -> ImuFrame {
        self.imu
            .generate(self.vehicle.acceleration(), self.vehicle.speed(), self.yaw_rate)
    }

    fn teleport(&mut self, location: Location) {
        self.vehicle.stop();
        self.control = VehicleControl::idle();
        self.yaw_rate = 0.0;
        if self.route.len() >= 2 {
            self.arc = self.nearest_arc(location);
            let (snapped, heading) = self.point_at_arc(self.arc);
            self.location = snapped;
            self.heading = heading;
        } else {
            self.location = location;
        }
    }

    fn set_plan(&mut self, route: Vec<Location>) {
        self.route = route;
        self.rebuild_cumulative();
        if self.route.len() >= 2 {
            // Resume from the closest point of the new plan.
            self.arc = self.nearest_arc(self.location);
            let (snapped, heading) = self.point_at_arc(self.arc);
            self.location = snapped;
            self.heading = heading;
        }
    }

    fn plan(&self) -> &[Location] {
        &self.route
    }
}

/// Normalize an angle difference to [-pi, pi).
fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a >= PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::ImuNoiseConfig;

    fn quiet_sim() -> ReferenceSimulator {
        let config = ReferenceSimConfig {
            random_seed: 1,
            imu: ImuNoiseConfig::noiseless(),
            ..ReferenceSimConfig::default()
        };
        ReferenceSimulator::new(config)
    }

    fn straight_route(length: f64) -> Vec<Location> {
        let mut route = Vec::new();
        let mut x = 0.0;
        while x <= length {
            route.push(Location::new(x, 0.0));
            x += 2.0;
        }
        route
    }

    #[test]
    fn test_settings_report_synchronous_fixed_step() {
        let sim = quiet_sim();
        let settings = sim.settings();
        assert!(settings.synchronous_mode);
        assert_eq!(settings.fixed_delta_seconds, 0.005);
    }

    #[test]
    fn test_vehicle_advances_along_plan() {
        let mut sim = quiet_sim();
        sim.set_plan(straight_route(500.0));
        sim.teleport(Location::new(0.0, 0.0));
        sim.apply_control(VehicleControl {
            throttle: 1.0,
            brake: 0.0,
            steer: 0.0,
        });
        for _ in 0..2000 {
            sim.tick();
        }
        let kin = sim.kinematics();
        assert!(kin.speed > 5.0, "speed {}", kin.speed);
        assert!(kin.location.x > 10.0, "x {}", kin.location.x);
        assert_eq!(kin.location.y, 0.0);
        assert!((sim.elapsed_seconds() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_vehicle_stops_at_plan_end() {
        let mut sim = quiet_sim();
        sim.set_plan(straight_route(20.0));
        sim.teleport(Location::new(0.0, 0.0));
        sim.apply_control(VehicleControl {
            throttle: 1.0,
            brake: 0.0,
            steer: 0.0,
        });
        for _ in 0..20_000 {
            sim.tick();
        }
        let kin = sim.kinematics();
        assert!((kin.location.x - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_teleport_resets_motion() {
        let mut sim = quiet_sim();
        sim.set_plan(straight_route(100.0));
        sim.apply_control(VehicleControl {
            throttle: 1.0,
            brake: 0.0,
            steer: 0.0,
        });
        for _ in 0..1000 {
            sim.tick();
        }
        sim.teleport(Location::new(0.0, 0.0));
        let kin = sim.kinematics();
        assert_eq!(kin.speed, 0.0);
        assert_eq!(kin.location.x, 0.0);
    }

    #[test]
    fn test_straight_plan_has_zero_yaw_rate() {
        let mut sim = quiet_sim();
        sim.set_plan(straight_route(100.0));
        sim.teleport(Location::new(0.0, 0.0));
        sim.apply_control(VehicleControl {
            throttle: 0.8,
            brake: 0.0,
            steer: 0.0,
        });
        for _ in 0..500 {
            sim.tick();
        }
        let frame = sim.imu();
        assert_eq!(frame.gyro[2], 0.0);
        assert!(frame.accel[0] > 0.0);
    }

    #[test]
    fn test_corner_produces_yaw() {
        let mut sim = quiet_sim();
        // Right-angle corner at x = 20.
        let mut route = straight_route(20.0);
        let mut y = 2.0;
        while y <= 40.0 {
            route.push(Location::new(20.0, y));
            y += 2.0;
        }
        sim.set_plan(route);
        sim.teleport(Location::new(0.0, 0.0));
        sim.apply_control(VehicleControl {
            throttle: 1.0,
            brake: 0.0,
            steer: 0.0,
        });
        let mut saw_yaw = false;
        for _ in 0..20_000 {
            sim.tick();
            if sim.imu().gyro[2].abs() > 1e-6 {
                saw_yaw = true;
            }
        }
        assert!(saw_yaw);
        let kin = sim.kinematics();
        assert!(kin.location.y > 20.0, "vehicle made the turn: {:?}", kin.location);
    }
}
