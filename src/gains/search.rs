//! Gain selection and the public search entry point.

use thiserror::Error;

use super::candidate::{CandidateSet, GainTriple};
use super::config::GainSearchConfig;
use super::sampler::CandidateSampler;

/// Errors of the gain search.
///
/// Both are fatal to the requesting configuration step: callers must not
/// drive a vehicle with undefined gains. The iteration cap inside the
/// sampler already is the retry budget, so neither error is retried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GainSearchError {
    /// Target index outside the supported range.
    #[error("aggressiveness index {index} outside supported range [{min}, {max}]")]
    OutOfRangeTarget { index: i32, min: i32, max: i32 },

    /// Sampling produced no usable candidate for the target.
    #[error("no feasible controller gains for aggressiveness index {index}")]
    InfeasibleTarget { index: i32 },
}

/// Surrogate-driven search for the gains matching a target index.
///
/// Synchronous and single-threaded; safe to call from any one context. The
/// only mutable state is the sampler's generator, which is reseeded per
/// invocation, so repeated calls with the same target return the same
/// triple.
pub struct GainSearch {
    config: GainSearchConfig,
    sampler: CandidateSampler,
}

impl GainSearch {
    pub fn new(config: GainSearchConfig) -> Self {
        let sampler = CandidateSampler::new(config.clone());
        Self { config, sampler }
    }

    pub fn config(&self) -> &GainSearchConfig {
        &self.config
    }

    /// Compute the best gain triple for a target aggressiveness index.
    ///
    /// Validates the target range, samples candidates and picks the one
    /// whose KP lies closest to the shifted center point.
    pub fn compute_gains(&self, target: i32) -> Result<GainTriple, GainSearchError> {
        if target < self.config.agg_min || target > self.config.agg_max {
            return Err(GainSearchError::OutOfRangeTarget {
                index: target,
                min: self.config.agg_min,
                max: self.config.agg_max,
            });
        }

        let candidates = self.sampler.sample_candidates(target);
        self.select_best(&candidates, target)
    }

    /// Pick the candidate whose KP minimizes the distance to the shifted
    /// center. Ties go to the earliest-inserted candidate.
    pub fn select_best(
        &self,
        candidates: &CandidateSet,
        target: i32,
    ) -> Result<GainTriple, GainSearchError> {
        let center = self.shifted_center(target);

        let mut best: Option<GainTriple> = None;
        let mut best_distance = f64::INFINITY;
        for candidate in candidates.iter() {
            let distance = (center - candidate.kp).abs();
            if distance < best_distance {
                best_distance = distance;
                best = Some(*candidate);
            }
        }

        best.ok_or(GainSearchError::InfeasibleTarget { index: target })
    }

    /// KP set-point for a target: the range midpoint shifted linearly with
    /// the normalized index across 80% of the KP range.
    pub fn shifted_center(&self, target: i32) -> f64 {
        let cfg = &self.config;
        let span = cfg.kp_span();
        cfg.kp_min + span / 2.0 + span * (cfg.normalized_index(target) - 0.5) * 0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> GainSearch {
        GainSearch::new(GainSearchConfig::default())
    }

    /// Config with a unit KP range for center arithmetic checks.
    fn unit_kp_config() -> GainSearchConfig {
        GainSearchConfig {
            kp_min: 0.0,
            kp_max: 1.0,
            ..GainSearchConfig::default()
        }
    }

    #[test]
    fn test_shifted_center_at_range_ends() {
        let s = GainSearch::new(unit_kp_config());
        // Lowest index shifts 40% below the midpoint: 0.5 - 0.4 = 0.1.
        assert!((s.shifted_center(70) - 0.1).abs() < 1e-12);
        // Highest index mirrors it: 0.5 + 0.4 = 0.9.
        assert!((s.shifted_center(160) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_shifted_center_midpoint() {
        let s = GainSearch::new(unit_kp_config());
        assert!((s.shifted_center(115) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_targets_rejected() {
        let s = search();
        assert!(matches!(
            s.compute_gains(69),
            Err(GainSearchError::OutOfRangeTarget { index: 69, .. })
        ));
        assert!(matches!(
            s.compute_gains(161),
            Err(GainSearchError::OutOfRangeTarget { index: 161, .. })
        ));
    }

    #[test]
    fn test_boundary_targets_accepted() {
        let s = search();
        assert!(s.compute_gains(70).is_ok());
        assert!(s.compute_gains(160).is_ok());
    }

    #[test]
    fn test_compute_gains_is_idempotent() {
        let s = search();
        let first = s.compute_gains(107).unwrap();
        let second = s.compute_gains(107).unwrap();
        assert_eq!(first.kp.to_bits(), second.kp.to_bits());
        assert_eq!(first.kd.to_bits(), second.kd.to_bits());
        assert_eq!(first.ki.to_bits(), second.ki.to_bits());
    }

    #[test]
    fn test_gains_within_bounds_for_valid_targets() {
        let s = search();
        let cfg = GainSearchConfig::default();
        for target in [70, 85, 107, 125, 145, 160] {
            let gains = s.compute_gains(target).unwrap();
            assert!(gains.kp >= cfg.kp_min && gains.kp <= cfg.kp_max);
            assert!(gains.kd >= cfg.kd_min && gains.kd <= cfg.kd_max);
            assert_eq!(gains.ki, cfg.ki);
        }
    }

    #[test]
    fn test_round_trip_against_surrogate() {
        // KD is solved against the continuous model, so the selected pair
        // reproduces the requested index up to solver precision.
        let s = search();
        let model =
            crate::gains::SurrogateModel::new(GainSearchConfig::default().coefficients);
        for target in [80, 107, 140] {
            let gains = s.compute_gains(target).unwrap();
            let predicted = model.predict(gains.kp, gains.kd);
            assert!(
                (predicted - target as f64).abs() < 1e-6,
                "target {}: predicted {}",
                target,
                predicted
            );
        }
    }

    #[test]
    fn test_select_best_prefers_candidate_nearest_center() {
        let s = GainSearch::new(unit_kp_config());
        let mut candidates = CandidateSet::new(0.003);
        candidates.try_insert(GainTriple::new(0.05, 0.01, 0.3));
        candidates.try_insert(GainTriple::new(0.12, 0.01, 0.4));
        candidates.try_insert(GainTriple::new(0.80, 0.01, 0.5));
        // Center for the lowest index is 0.1; 0.12 is nearest.
        let best = s.select_best(&candidates, 70).unwrap();
        assert_eq!(best.kp, 0.12);
    }

    #[test]
    fn test_select_best_tie_goes_to_first_inserted() {
        let s = GainSearch::new(unit_kp_config());
        let mut candidates = CandidateSet::new(0.003);
        // Center for the midpoint index 115 is exactly 0.5; 0.75 and 0.25
        // are exactly equidistant in binary.
        candidates.try_insert(GainTriple::new(0.75, 0.01, 0.3));
        candidates.try_insert(GainTriple::new(0.25, 0.01, 0.4));
        let best = s.select_best(&candidates, 115).unwrap();
        assert_eq!(best.kp, 0.75);
    }

    #[test]
    fn test_empty_candidates_is_infeasible() {
        let s = search();
        let empty = CandidateSet::new(0.003);
        assert_eq!(
            s.select_best(&empty, 107),
            Err(GainSearchError::InfeasibleTarget { index: 107 })
        );
    }
}
