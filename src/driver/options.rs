//! Agent behavior options.

use serde::Deserialize;

/// Behavior toggles forwarded to the driving agent.
///
/// Mirrors the options a traffic-aware agent accepts; the reference
/// simulator has no traffic, so only `follow_speed_limits` changes behavior
/// there, but all four are carried and reported so recorded runs document
/// the full agent configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentOptions {
    /// Drive through red lights.
    pub ignore_traffic_lights: bool,
    /// Drive through stop signs.
    pub ignore_stop_signs: bool,
    /// Ignore other vehicles when planning speed.
    pub ignore_vehicles: bool,
    /// Track the posted speed limit when no speed profile is given.
    pub follow_speed_limits: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            ignore_traffic_lights: false,
            ignore_stop_signs: false,
            ignore_vehicles: false,
            follow_speed_limits: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_speed_limits() {
        let options = AgentOptions::default();
        assert!(options.follow_speed_limits);
        assert!(!options.ignore_traffic_lights);
        assert!(!options.ignore_stop_signs);
        assert!(!options.ignore_vehicles);
    }
}
