//! Aggressive driver agent.
//!
//! Binds a target aggressiveness index to a configured longitudinal
//! controller. The agent owns the current (target, gains) pair and the
//! controller built from it; changing the target recomputes the gains fully
//! off to the side and only then swaps the controller, so an observer never
//! sees a half-updated configuration.

mod options;

pub use options::AgentOptions;

use thiserror::Error;

use crate::control::LongitudinalPid;
use crate::core::types::{Location, VehicleControl};
use crate::gains::{GainSearch, GainSearchError, GainTriple};
use crate::route::{stitch_route, RoutePlanner};
use crate::sim::Simulator;

/// Driver agent errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Gain search failed for the requested index.
    #[error(transparent)]
    Gains(#[from] GainSearchError),

    /// Waypoint list too short to plan a route.
    #[error("route needs at least {required} waypoints, got {got}")]
    TooFewWaypoints { required: usize, got: usize },

    /// Planner produced an empty route.
    #[error("route planner returned no route points")]
    EmptyRoute,
}

/// Driver with gains matched to a target aggressiveness index.
pub struct DriverAgent {
    search: GainSearch,
    target_index: i32,
    gains: GainTriple,
    controller: LongitudinalPid,
    control_dt: f64,
    options: AgentOptions,
    target_speed_kmh: f64,
    start_location: Option<Location>,
    end_location: Option<Location>,
}

impl DriverAgent {
    /// Build a driver for `target_index`, computing its gains immediately.
    ///
    /// `control_dt` is the longitudinal control update period in seconds.
    pub fn new(
        search: GainSearch,
        target_index: i32,
        control_dt: f64,
        options: AgentOptions,
    ) -> Result<Self, DriverError> {
        let gains = search.compute_gains(target_index)?;
        log::info!(
            "driver configured: index {} -> KP {:.4}, KI {:.4}, KD {:.4}",
            target_index,
            gains.kp,
            gains.ki,
            gains.kd
        );
        let controller = LongitudinalPid::new(gains, control_dt);
        Ok(Self {
            search,
            target_index,
            gains,
            controller,
            control_dt,
            options,
            target_speed_kmh: 0.0,
            start_location: None,
            end_location: None,
        })
    }

    /// Plan a route through `waypoints` and install it into the simulator.
    ///
    /// The vehicle teleports to the first waypoint; the stitched route runs
    /// through the rest.
    pub fn install_plan(
        &mut self,
        sim: &mut dyn Simulator,
        planner: &dyn RoutePlanner,
        waypoints: &[Location],
    ) -> Result<(), DriverError> {
        if waypoints.len() < 3 {
            return Err(DriverError::TooFewWaypoints {
                required: 3,
                got: waypoints.len(),
            });
        }
        let route = stitch_route(planner, waypoints);
        if route.is_empty() {
            return Err(DriverError::EmptyRoute);
        }

        self.start_location = Some(waypoints[0]);
        self.end_location = route.last().copied();
        sim.set_plan(route);
        sim.teleport(waypoints[0]);
        self.controller.reset();
        Ok(())
    }

    /// Teleport back to the route start and clear controller state.
    pub fn reset(&mut self, sim: &mut dyn Simulator) {
        if let Some(start) = self.start_location {
            sim.teleport(start);
        }
        self.controller.reset();
    }

    /// Change the target index, recomputing and swapping the gains.
    ///
    /// On failure the previous configuration stays active.
    pub fn set_target_index(&mut self, target_index: i32) -> Result<(), DriverError> {
        let gains = self.search.compute_gains(target_index)?;
        log::info!(
            "driver reconfigured: index {} -> KP {:.4}, KI {:.4}, KD {:.4}",
            target_index,
            gains.kp,
            gains.ki,
            gains.kd
        );
        self.target_index = target_index;
        self.gains = gains;
        self.controller = LongitudinalPid::new(gains, self.control_dt);
        Ok(())
    }

    /// Set the speed the controller steers toward (km/h).
    pub fn set_target_speed(&mut self, target_kmh: f64) {
        self.target_speed_kmh = target_kmh;
    }

    /// One longitudinal control step against the measured speed (km/h).
    pub fn run_step(&mut self, current_kmh: f64) -> VehicleControl {
        self.controller.step(self.target_speed_kmh, current_kmh)
    }

    /// Merge option updates into the agent options.
    pub fn set_options(&mut self, options: AgentOptions) {
        self.options = options;
    }

    #[inline]
    pub fn target_index(&self) -> i32 {
        self.target_index
    }

    #[inline]
    pub fn gains(&self) -> GainTriple {
        self.gains
    }

    #[inline]
    pub fn options(&self) -> AgentOptions {
        self.options
    }

    #[inline]
    pub fn start_location(&self) -> Option<Location> {
        self.start_location
    }

    #[inline]
    pub fn end_location(&self) -> Option<Location> {
        self.end_location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gains::GainSearchConfig;
    use crate::route::LinearPlanner;
    use crate::sim::{ImuNoiseConfig, ReferenceSimConfig, ReferenceSimulator};

    fn driver(target: i32) -> DriverAgent {
        let search = GainSearch::new(GainSearchConfig::default());
        DriverAgent::new(search, target, 0.1, AgentOptions::default()).unwrap()
    }

    fn sim() -> ReferenceSimulator {
        ReferenceSimulator::new(ReferenceSimConfig {
            random_seed: 1,
            imu: ImuNoiseConfig::noiseless(),
            ..ReferenceSimConfig::default()
        })
    }

    #[test]
    fn test_construction_computes_gains() {
        let agent = driver(107);
        let gains = agent.gains();
        assert!(gains.kp >= 0.0 && gains.kp <= 2.0);
        assert!(gains.kd >= 0.0 && gains.kd <= 1.0);
        assert_eq!(agent.target_index(), 107);
    }

    #[test]
    fn test_out_of_range_index_rejected_at_construction() {
        let search = GainSearch::new(GainSearchConfig::default());
        let result = DriverAgent::new(search, 300, 0.1, AgentOptions::default());
        assert!(matches!(
            result,
            Err(DriverError::Gains(GainSearchError::OutOfRangeTarget { .. }))
        ));
    }

    #[test]
    fn test_set_target_index_swaps_gains() {
        let mut agent = driver(80);
        let before = agent.gains();
        agent.set_target_index(150).unwrap();
        let after = agent.gains();
        assert_eq!(agent.target_index(), 150);
        assert!(before != after);
    }

    #[test]
    fn test_failed_retarget_keeps_previous_gains() {
        let mut agent = driver(107);
        let before = agent.gains();
        assert!(agent.set_target_index(9999).is_err());
        assert_eq!(agent.target_index(), 107);
        assert_eq!(agent.gains(), before);
    }

    #[test]
    fn test_install_plan_requires_waypoints() {
        let mut agent = driver(107);
        let mut world = sim();
        let planner = LinearPlanner::default();
        let result = agent.install_plan(
            &mut world,
            &planner,
            &[Location::new(0.0, 0.0), Location::new(10.0, 0.0)],
        );
        assert!(matches!(result, Err(DriverError::TooFewWaypoints { .. })));
    }

    #[test]
    fn test_install_plan_teleports_to_spawn() {
        let mut agent = driver(107);
        let mut world = sim();
        let planner = LinearPlanner::default();
        let waypoints = [
            Location::new(0.0, 0.0),
            Location::new(50.0, 0.0),
            Location::new(100.0, 0.0),
        ];
        agent.install_plan(&mut world, &planner, &waypoints).unwrap();
        assert_eq!(agent.start_location(), Some(waypoints[0]));
        assert_eq!(agent.end_location().unwrap().x, 100.0);
        assert!(!world.plan().is_empty());
    }
}
