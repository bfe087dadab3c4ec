//! Degree-3 surrogate model mapping controller gains to an aggressiveness
//! index.
//!
//! The polynomial was fitted offline to telemetry from parameter sweeps of
//! the longitudinal controller, with the integral gain held constant. It is
//! cheap enough to invert by brute sampling, which is exactly what the
//! candidate sampler does.

/// Fitted bivariate cubic over (KP, KD).
///
/// `predict` evaluates
///
/// ```text
/// c0 + c1*KP + c2*KD + c3*KP*KD + c4*KP^2 + c5*KD^2
///    + c6*KP^3 + c7*KD^3 + c8*KP*KD^2 + c9*KP^2*KD
/// ```
///
/// in f64, applying the coefficients in exactly this order so results are
/// reproducible bit for bit across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurrogateModel {
    coefficients: [f64; 10],
}

impl SurrogateModel {
    /// Build a model from coefficients c0..c9.
    pub fn new(coefficients: [f64; 10]) -> Self {
        Self { coefficients }
    }

    /// Predicted aggressiveness index for a gain pair.
    ///
    /// Pure function: identical inputs return bit-identical output.
    pub fn predict(&self, kp: f64, kd: f64) -> f64 {
        let c = &self.coefficients;
        c[0] + c[1] * kp
            + c[2] * kd
            + c[3] * kp * kd
            + c[4] * kp * kp
            + c[5] * kd * kd
            + c[6] * kp * kp * kp
            + c[7] * kd * kd * kd
            + c[8] * kp * kd * kd
            + c[9] * kp * kp * kd
    }

    /// Coefficients of `predict(kp, KD) - target` as a cubic in KD.
    ///
    /// Returns `[d0, d1, d2, d3]` with
    /// `d3*KD^3 + d2*KD^2 + d1*KD + d0 = 0` exactly when
    /// `predict(kp, KD) == target`.
    pub fn kd_polynomial(&self, kp: f64, target: f64) -> [f64; 4] {
        let c = &self.coefficients;
        [
            c[0] + c[1] * kp + c[4] * kp * kp + c[6] * kp * kp * kp - target,
            c[2] + c[3] * kp + c[9] * kp * kp,
            c[5] + c[8] * kp,
            c[7],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> SurrogateModel {
        SurrogateModel::new([64.0, 48.0, 24.0, 2.0, -4.0, -6.0, 0.8, 4.0, 1.5, -1.2])
    }

    #[test]
    fn test_predict_at_origin_is_constant_term() {
        assert_eq!(model().predict(0.0, 0.0), 64.0);
    }

    #[test]
    fn test_predict_known_value() {
        // All ten monomials active at (2, 1):
        // 64 + 96 + 24 + 4 - 16 - 6 + 6.4 + 4 + 3 - 4.8
        let value = model().predict(2.0, 1.0);
        assert!((value - 174.6).abs() < 1e-9, "predict(2,1) = {}", value);
    }

    #[test]
    fn test_predict_is_pure() {
        let m = model();
        let first = m.predict(1.234, 0.567);
        for _ in 0..100 {
            let again = m.predict(1.234, 0.567);
            assert_eq!(first.to_bits(), again.to_bits());
        }
    }

    #[test]
    fn test_kd_polynomial_matches_predict() {
        let m = model();
        let kp = 0.9;
        let target = 107.0;
        let [d0, d1, d2, d3] = m.kd_polynomial(kp, target);
        for kd in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let direct = m.predict(kp, kd) - target;
            let expanded = d3 * kd * kd * kd + d2 * kd * kd + d1 * kd + d0;
            assert!(
                (direct - expanded).abs() < 1e-9,
                "kd={}: {} vs {}",
                kd,
                direct,
                expanded
            );
        }
    }
}
