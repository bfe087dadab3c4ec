//! Gain-search configuration.
//!
//! The gain bounds, index range and surrogate coefficients are the fitted
//! configuration of the search. They are constants of the deployment, not
//! user tunables, but they are carried as an explicit immutable struct so
//! the sampler and selector never reach for global state.

/// Configuration for the surrogate-driven gain search.
///
/// The defaults match the fitted setup this crate ships: a degree-3
/// surrogate over KP in [0, 2] and KD in [0, 1], monotone increasing in
/// both gains, covering aggressiveness indices 70 to 160.
#[derive(Debug, Clone, PartialEq)]
pub struct GainSearchConfig {
    /// Lower KP bound (inclusive).
    pub kp_min: f64,
    /// Upper KP bound (inclusive).
    pub kp_max: f64,
    /// Lower KD bound (inclusive).
    pub kd_min: f64,
    /// Upper KD bound (inclusive).
    pub kd_max: f64,
    /// Lowest valid aggressiveness index.
    pub agg_min: i32,
    /// Highest valid aggressiveness index.
    pub agg_max: i32,
    /// Integral gain shared by every candidate; the surrogate was fitted
    /// with KI fixed at this value.
    pub ki: f64,
    /// Surrogate coefficients c0..c9, see [`SurrogateModel`](super::SurrogateModel).
    pub coefficients: [f64; 10],
    /// Seed for the per-search random generator. The sampler reseeds on
    /// every invocation, so equal targets produce equal candidate sets.
    pub seed: u64,
    /// Number of candidates the sampler aims to collect.
    pub max_candidates: usize,
    /// Hard cap on sampling iterations.
    pub max_iterations: u32,
    /// Two candidates closer than this in KP count as duplicates.
    pub kp_tolerance: f64,
}

impl Default for GainSearchConfig {
    fn default() -> Self {
        Self {
            kp_min: 0.0,
            kp_max: 2.0,
            kd_min: 0.0,
            kd_max: 1.0,
            agg_min: 70,
            agg_max: 160,
            ki: 0.01,
            coefficients: [64.0, 48.0, 24.0, 2.0, -4.0, -6.0, 0.8, 4.0, 1.5, -1.2],
            seed: 88,
            max_candidates: 10,
            max_iterations: 300,
            kp_tolerance: 0.003,
        }
    }
}

impl GainSearchConfig {
    /// Normalized position of `target` inside the index range, in [0, 1].
    #[inline]
    pub fn normalized_index(&self, target: i32) -> f64 {
        (target - self.agg_min) as f64 / (self.agg_max - self.agg_min) as f64
    }

    /// Width of the KP range.
    #[inline]
    pub fn kp_span(&self) -> f64 {
        self.kp_max - self.kp_min
    }
}
