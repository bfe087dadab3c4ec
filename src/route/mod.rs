//! Route planning delegation.
//!
//! Real deployments hand waypoint pairs to the simulator's own routing
//! library and only stitch the returned segments together. The stitching
//! rules live here; the planner itself stays behind a trait so the engine's
//! router can be dropped in. [`LinearPlanner`] is the shipped fallback for
//! worlds without a road graph: dense points on the straight line between
//! the pair.

use crate::core::types::Location;

/// External route planner boundary.
///
/// `trace_route` returns a dense point list from `from` to `to`, both
/// endpoints included.
pub trait RoutePlanner {
    fn trace_route(&self, from: Location, to: Location) -> Vec<Location>;
}

/// Straight-line planner sampling at a fixed resolution.
#[derive(Debug, Clone)]
pub struct LinearPlanner {
    resolution: f64,
}

impl LinearPlanner {
    /// Planner emitting a point every `resolution` meters.
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution: resolution.max(1e-3),
        }
    }
}

impl Default for LinearPlanner {
    fn default() -> Self {
        // Matches the sampling resolution handed to the engine's router.
        Self::new(2.0)
    }
}

impl RoutePlanner for LinearPlanner {
    fn trace_route(&self, from: Location, to: Location) -> Vec<Location> {
        let distance = from.distance(&to);
        let steps = (distance / self.resolution).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            points.push(Location::new(
                from.x + (to.x - from.x) * t,
                from.y + (to.y - from.y) * t,
            ));
        }
        points
    }
}

/// Stitch a full route through `waypoints`.
///
/// The first waypoint is the spawn point and contributes no route segment;
/// the route runs through the remaining waypoints pairwise. Each segment
/// drops its first point so shared waypoints are not inserted twice, which
/// would otherwise read as sudden decelerations at every junction.
///
/// Returns an empty route when fewer than three waypoints are given.
pub fn stitch_route(planner: &dyn RoutePlanner, waypoints: &[Location]) -> Vec<Location> {
    let mut route = Vec::new();
    if waypoints.len() < 3 {
        return route;
    }
    let targets = &waypoints[1..];
    for pair in targets.windows(2) {
        let mut segment = planner.trace_route(pair[0], pair[1]);
        if !segment.is_empty() {
            segment.remove(0);
        }
        route.extend(segment);
    }
    route
}
