//! Candidate sampler: stochastic KP draws, deterministic KD solves.
//!
//! For a target index t the sampler draws KP from a normal distribution
//! whose mean slides with the normalized target,
//!
//! ```text
//! mean  = (KP_max - KP_min) * (1 + 2 * norm(t)) / 4
//! sigma = (KP_max - KP_min) / 3
//! ```
//!
//! rejection-resampling until the draw lands inside the KP bounds. Each
//! accepted KP turns the surrogate equation `predict(KP, KD) = t` into a
//! cubic in KD; real roots inside the KD bounds become candidates.
//!
//! Near-duplicate KP values (within the configured tolerance) are rejected,
//! and every rejection shrinks the remaining candidate budget by one. That
//! throttles the search once duplicates dominate, which means a sparse
//! feasible region can legitimately end with fewer candidates than asked
//! for, or none at all. The caller decides whether an empty set is fatal.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::candidate::{CandidateSet, GainTriple};
use super::config::GainSearchConfig;
use super::cubic::real_roots;
use super::surrogate::SurrogateModel;

/// Samples gain candidates for a target aggressiveness index.
pub struct CandidateSampler {
    config: GainSearchConfig,
    surrogate: SurrogateModel,
}

impl CandidateSampler {
    pub fn new(config: GainSearchConfig) -> Self {
        let surrogate = SurrogateModel::new(config.coefficients);
        Self { config, surrogate }
    }

    /// The surrogate this sampler inverts.
    pub fn surrogate(&self) -> &SurrogateModel {
        &self.surrogate
    }

    /// Collect up to `max_candidates` gain candidates for `target`.
    ///
    /// Deterministic: the generator is reseeded from the configured seed on
    /// every call, so the same target always yields the same set. An empty
    /// result means no sampled KP admitted a real in-range KD and is a
    /// valid outcome, not an error.
    pub fn sample_candidates(&self, target: i32) -> CandidateSet {
        let cfg = &self.config;
        let mut rng = SmallRng::seed_from_u64(cfg.seed);

        let span = cfg.kp_span();
        let mean = span * (1.0 + 2.0 * cfg.normalized_index(target)) / 4.0;
        let sigma = span / 3.0;

        let mut set = CandidateSet::new(cfg.kp_tolerance);
        // Signed so duplicate rejections can drive it below the current
        // set size (or zero), which is what ends a saturated search.
        let mut budget = cfg.max_candidates as i64;
        let mut iterations = 0u32;

        while iterations < cfg.max_iterations {
            let found = set.len() as i64;
            if found >= budget && found > 1 {
                break;
            }
            iterations += 1;

            // Truncated normal: redraw until the KP lands in range.
            let kp = loop {
                let z: f64 = rng.sample(StandardNormal);
                let draw = mean + sigma * z;
                if draw >= cfg.kp_min && draw <= cfg.kp_max {
                    break draw;
                }
            };

            let [d0, d1, d2, d3] = self.surrogate.kd_polynomial(kp, target as f64);
            for kd in real_roots(d3, d2, d1, d0) {
                if kd < cfg.kd_min || kd > cfg.kd_max {
                    continue;
                }
                if !set.try_insert(GainTriple::new(kp, cfg.ki, kd)) {
                    budget -= 1;
                }
            }
        }

        log::debug!(
            "gain sampling for index {}: {} candidates after {} iterations (budget {})",
            target,
            set.len(),
            iterations,
            budget
        );
        set
    }
}
