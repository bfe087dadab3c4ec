//! Closed-form real-root solver for cubic polynomials.
//!
//! The gain search only ever solves one polynomial shape, a cubic in KD
//! with coefficients derived from the surrogate at a fixed KP, so a direct
//! solver beats dragging in a general symbolic or iterative package.
//! Depressed-cubic reduction, Cardano for the single-root case and the
//! trigonometric form for three real roots, with a short Newton polish to
//! pull each root back to full double precision.

/// Coefficient magnitudes below this are treated as zero when deciding the
/// polynomial degree.
const DEGENERACY_EPS: f64 = 1e-12;

/// Real roots of `c3*x^3 + c2*x^2 + c1*x + c0 = 0`, unordered.
///
/// Degenerate leading coefficients fall through to the quadratic and linear
/// cases. A constant polynomial has no roots (even when it is identically
/// zero). Multiple roots are reported once.
pub fn real_roots(c3: f64, c2: f64, c1: f64, c0: f64) -> Vec<f64> {
    if c3.abs() < DEGENERACY_EPS {
        return quadratic_roots(c2, c1, c0);
    }

    // Normalize to x^3 + a*x^2 + b*x + c, then depress with x = t - a/3
    // giving t^3 + p*t + q.
    let a = c2 / c3;
    let b = c1 / c3;
    let c = c0 / c3;
    let shift = a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let discriminant = half_q * half_q + third_p * third_p * third_p;

    let mut roots = Vec::with_capacity(3);
    if discriminant > DEGENERACY_EPS {
        // One real root.
        let sqrt_d = discriminant.sqrt();
        let u = (-half_q + sqrt_d).cbrt();
        let v = (-half_q - sqrt_d).cbrt();
        roots.push(u + v - shift);
    } else if discriminant < -DEGENERACY_EPS {
        // Three distinct real roots, casus irreducibilis.
        let r = (-third_p).sqrt();
        let phi = (-half_q / (r * r * r)).clamp(-1.0, 1.0).acos();
        for k in 0..3 {
            let angle = (phi + 2.0 * std::f64::consts::PI * k as f64) / 3.0;
            roots.push(2.0 * r * angle.cos() - shift);
        }
    } else if half_q.abs() < DEGENERACY_EPS && third_p.abs() < DEGENERACY_EPS {
        // Triple root.
        roots.push(-shift);
    } else {
        // Double root plus a simple one.
        let u = (-half_q).cbrt();
        roots.push(2.0 * u - shift);
        roots.push(-u - shift);
    }

    for root in &mut roots {
        *root = polish(c3, c2, c1, c0, *root);
    }
    roots
}

/// Real roots of `a*x^2 + b*x + c = 0`.
fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < DEGENERACY_EPS {
        if b.abs() < DEGENERACY_EPS {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    if discriminant == 0.0 {
        return vec![-b / (2.0 * a)];
    }

    // Citardauq form for the smaller-magnitude root avoids cancellation.
    let sqrt_d = discriminant.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_d);
    vec![q / a, c / q]
}

/// A few Newton iterations against the original cubic. The closed forms are
/// accurate to roughly 1e-10 already; this tightens clustered roots.
fn polish(c3: f64, c2: f64, c1: f64, c0: f64, mut x: f64) -> f64 {
    for _ in 0..3 {
        let f = ((c3 * x + c2) * x + c1) * x + c0;
        let df = (3.0 * c3 * x + 2.0 * c2) * x + c1;
        if df.abs() < DEGENERACY_EPS {
            break;
        }
        let step = f / df;
        x -= step;
        if step.abs() < 1e-15 * x.abs().max(1.0) {
            break;
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roots_close(mut actual: Vec<f64>, mut expected: Vec<f64>) {
        actual.sort_by(|a, b| a.partial_cmp(b).unwrap());
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(actual.len(), expected.len(), "roots: {:?}", actual);
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-9, "{} vs {}", a, e);
        }
    }

    #[test]
    fn test_three_real_roots() {
        // (x - 1)(x - 2)(x - 3) = x^3 - 6x^2 + 11x - 6
        assert_roots_close(
            real_roots(1.0, -6.0, 11.0, -6.0),
            vec![1.0, 2.0, 3.0],
        );
    }

    #[test]
    fn test_single_real_root() {
        // x^3 + x + 1 has one real root near -0.6823
        let roots = real_roots(1.0, 0.0, 1.0, 1.0);
        assert_eq!(roots.len(), 1);
        let x = roots[0];
        assert!((x * x * x + x + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_root() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2
        assert_roots_close(real_roots(1.0, 0.0, -3.0, 2.0), vec![1.0, -2.0]);
    }

    #[test]
    fn test_triple_root() {
        // (x - 2)^3 = x^3 - 6x^2 + 12x - 8
        assert_roots_close(real_roots(1.0, -6.0, 12.0, -8.0), vec![2.0]);
    }

    #[test]
    fn test_quadratic_fallback() {
        // 0*x^3 + x^2 - 5x + 6 = (x - 2)(x - 3)
        assert_roots_close(real_roots(0.0, 1.0, -5.0, 6.0), vec![2.0, 3.0]);
    }

    #[test]
    fn test_quadratic_no_real_roots() {
        assert!(real_roots(0.0, 1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_linear_fallback() {
        assert_roots_close(real_roots(0.0, 0.0, 2.0, -4.0), vec![2.0]);
    }

    #[test]
    fn test_constant_has_no_roots() {
        assert!(real_roots(0.0, 0.0, 0.0, 1.0).is_empty());
        assert!(real_roots(0.0, 0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_scaled_coefficients() {
        // Same roots as (x-1)(x-2)(x-3), scaled by -7.
        assert_roots_close(
            real_roots(-7.0, 42.0, -77.0, 42.0),
            vec![1.0, 2.0, 3.0],
        );
    }

    #[test]
    fn test_residual_after_polish() {
        let roots = real_roots(4.0, -4.65, 25.08, -41.0);
        for x in roots {
            let residual = ((4.0 * x - 4.65) * x + 25.08) * x - 41.0;
            assert!(residual.abs() < 1e-9, "residual {} at {}", residual, x);
        }
    }
}
