//! Adaptive Gauss-Kronrod quadrature.
//!
//! Globally adaptive 7/15-point Gauss-Kronrod integration on finite intervals,
//! with the usual `x = a ± (1 - t) / t` substitution for semi-infinite ranges.
//! The real line is handled by splitting it at caller-supplied breakpoints.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{QUADRATURE_ABS_TOLERANCE, QUADRATURE_MAX_SUBDIVISIONS, QUADRATURE_REL_TOLERANCE};
use crate::error::{InclinationError, Result};

// Kronrod abscissae on [-1, 1]; odd indices are the 7-point Gauss nodes
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Tolerances and budget for adaptive integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadratureConfig {
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    /// Maximum number of bisections per integrated segment
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            abs_tolerance: QUADRATURE_ABS_TOLERANCE,
            rel_tolerance: QUADRATURE_REL_TOLERANCE,
            max_subdivisions: QUADRATURE_MAX_SUBDIVISIONS,
        }
    }
}

/// Result of a quadrature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    pub value: f64,
    pub abs_error: f64,
    pub evaluations: usize,
    pub converged: bool,
}

impl QuadratureResult {
    fn combine(self, other: QuadratureResult) -> QuadratureResult {
        QuadratureResult {
            value: self.value + other.value,
            abs_error: self.abs_error + other.abs_error,
            evaluations: self.evaluations + other.evaluations,
            converged: self.converged && other.converged,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// One 15-point Kronrod pass on [a, b], returning (integral, error estimate)
fn gauss_kronrod_15<F>(f: &F, a: f64, b: f64) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half_length = 0.5 * (b - a);

    let fc = f(center);
    let mut result_gauss = fc * WG[3];
    let mut result_kronrod = fc * WGK[7];

    for j in 0..3 {
        let k = 2 * j + 1;
        let abscissa = half_length * XGK[k];
        let sum = f(center - abscissa) + f(center + abscissa);
        result_gauss += WG[j] * sum;
        result_kronrod += WGK[k] * sum;
    }

    for j in 0..4 {
        let k = 2 * j;
        let abscissa = half_length * XGK[k];
        result_kronrod += WGK[k] * (f(center - abscissa) + f(center + abscissa));
    }

    let value = result_kronrod * half_length;
    let error = ((result_kronrod - result_gauss) * half_length).abs();
    (value, error)
}

/// Integrate `f` over the finite interval [a, b].
///
/// The segment with the largest error estimate is bisected until the summed
/// error drops below `max(abs_tolerance, rel_tolerance * |I|)` or the
/// subdivision budget runs out. Running out of budget is not an error: the
/// best estimate is returned with `converged = false`.
///
/// # Returns
/// * `Err(InclinationError::Integration)` if the estimate is not finite
pub fn integrate<F>(f: F, a: f64, b: f64, config: &QuadratureConfig) -> Result<QuadratureResult>
where
    F: Fn(f64) -> f64,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(InclinationError::Integration(format!(
            "finite integration bounds required, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Ok(QuadratureResult {
            value: 0.0,
            abs_error: 0.0,
            evaluations: 0,
            converged: true,
        });
    }

    let (value, error) = gauss_kronrod_15(&f, a, b);
    let mut segments = vec![Segment { a, b, value, error }];
    let mut evaluations = 15;
    let mut subdivisions = 0;

    let (mut total, mut total_error) = (value, error);
    let mut converged = total_error <= tolerance(config, total);

    while !converged && subdivisions < config.max_subdivisions {
        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.partial_cmp(&y.error).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let segment = segments.swap_remove(worst);

        let mid = 0.5 * (segment.a + segment.b);
        let (left_value, left_error) = gauss_kronrod_15(&f, segment.a, mid);
        let (right_value, right_error) = gauss_kronrod_15(&f, mid, segment.b);
        evaluations += 30;
        subdivisions += 1;

        segments.push(Segment { a: segment.a, b: mid, value: left_value, error: left_error });
        segments.push(Segment { a: mid, b: segment.b, value: right_value, error: right_error });

        total = segments.iter().map(|s| s.value).sum();
        total_error = segments.iter().map(|s| s.error).sum();
        converged = total_error <= tolerance(config, total);
    }

    if !total.is_finite() {
        return Err(InclinationError::Integration(format!(
            "non-finite integral on [{a}, {b}]: {total}"
        )));
    }

    Ok(QuadratureResult {
        value: total,
        abs_error: total_error,
        evaluations,
        converged,
    })
}

fn tolerance(config: &QuadratureConfig, value: f64) -> f64 {
    config.abs_tolerance.max(config.rel_tolerance * value.abs())
}

/// Direction of a semi-infinite interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// [a, +inf)
    Upper,
    /// (-inf, a]
    Lower,
}

/// Integrate `f` over [a, +inf) or (-inf, a].
///
/// Substitutes `x = a ± (1 - t) / t` and integrates over t in (0, 1]. The
/// Kronrod nodes never touch t = 0, but `f` must return 0 rather than NaN for
/// very large |x|.
pub fn integrate_semi_infinite<F>(f: F, a: f64, tail: Tail, config: &QuadratureConfig) -> Result<QuadratureResult>
where
    F: Fn(f64) -> f64,
{
    let sign = match tail {
        Tail::Upper => 1.0,
        Tail::Lower => -1.0,
    };
    let transformed = |t: f64| {
        let x = a + sign * (1.0 - t) / t;
        let fx = f(x);
        if fx == 0.0 {
            0.0
        } else {
            fx / (t * t)
        }
    };
    integrate(transformed, 0.0, 1.0, config)
}

/// Integrate `f` over the whole real line.
///
/// The line is cut at the sorted `breakpoints`: both tails are integrated
/// with [`integrate_semi_infinite`] and every finite piece in between with
/// [`integrate`]. Put breakpoints around the region where `f` has its mass so
/// narrow features are not missed. With no breakpoints the line is split at 0.
pub fn integrate_real_line<F>(f: F, breakpoints: &[f64], config: &QuadratureConfig) -> Result<QuadratureResult>
where
    F: Fn(f64) -> f64,
{
    let mut points: Vec<f64> = breakpoints.iter().copied().filter(|p| p.is_finite()).collect();
    if points.is_empty() {
        points.push(0.0);
    }
    points.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    points.dedup();

    let first = points[0];
    let last = points[points.len() - 1];

    let mut result = integrate_semi_infinite(&f, first, Tail::Lower, config)?;
    for pair in points.windows(2) {
        result = result.combine(integrate(&f, pair[0], pair[1], config)?);
    }
    result = result.combine(integrate_semi_infinite(&f, last, Tail::Upper, config)?);

    if !result.converged {
        warn!(
            value = result.value,
            abs_error = result.abs_error,
            "Quadrature did not reach the requested tolerance"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn gaussian(x: f64, mu: f64, sigma: f64) -> f64 {
        (-0.5 * ((x - mu) / sigma).powi(2)).exp() / (sigma * (2.0 * PI).sqrt())
    }

    #[test]
    fn test_integrate_polynomial_exact() {
        // The 15-point Kronrod rule integrates polynomials up to degree 22 exactly
        let config = QuadratureConfig::default();
        let result = integrate(|x: f64| 3.0 * x * x + 2.0 * x + 1.0, 0.0, 2.0, &config).unwrap();
        assert!((result.value - 14.0).abs() < 1e-12);
        assert!(result.converged);
        assert_eq!(result.evaluations, 15);
    }

    #[test]
    fn test_integrate_sine() {
        let config = QuadratureConfig::default();
        let result = integrate(f64::sin, 0.0, PI, &config).unwrap();
        assert!((result.value - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_integrate_reversed_bounds() {
        let config = QuadratureConfig::default();
        let result = integrate(|x: f64| x, 1.0, 0.0, &config).unwrap();
        assert!((result.value + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_empty_interval() {
        let config = QuadratureConfig::default();
        let result = integrate(|_| 1.0, 3.0, 3.0, &config).unwrap();
        assert_eq!(result.value, 0.0);
        assert_eq!(result.evaluations, 0);
    }

    #[test]
    fn test_integrate_sharp_peak_subdivides() {
        let config = QuadratureConfig::default();
        let result = integrate(|x| gaussian(x, 0.3, 0.01), 0.0, 1.0, &config).unwrap();
        assert!((result.value - 1.0).abs() < 1e-8);
        assert!(result.evaluations > 15);
        assert!(result.converged);
    }

    #[test]
    fn test_integrate_rejects_infinite_bounds() {
        let config = QuadratureConfig::default();
        let result = integrate(|x| x, 0.0, f64::INFINITY, &config);
        assert!(matches!(result, Err(InclinationError::Integration(_))));
    }

    #[test]
    fn test_integrate_non_finite_value() {
        let config = QuadratureConfig::default();
        let result = integrate(|_| f64::NAN, 0.0, 1.0, &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_semi_infinite_exponential() {
        let config = QuadratureConfig::default();
        let upper = integrate_semi_infinite(|x: f64| (-x).exp(), 0.0, Tail::Upper, &config).unwrap();
        assert!((upper.value - 1.0).abs() < 1e-8);

        let lower = integrate_semi_infinite(|x: f64| x.exp(), 1.0, Tail::Lower, &config).unwrap();
        assert!((lower.value - std::f64::consts::E).abs() < 1e-7);
    }

    #[test]
    fn test_real_line_gaussian_moments() {
        let config = QuadratureConfig::default();
        let (mu, sigma) = (70.0, 3.0);
        let breakpoints: Vec<f64> = (0..=20).map(|k| 40.0 + 3.0 * k as f64).collect();

        let mass = integrate_real_line(|x| gaussian(x, mu, sigma), &breakpoints, &config).unwrap();
        assert!((mass.value - 1.0).abs() < 1e-8);

        let second = integrate_real_line(
            |x| gaussian(x, mu, sigma) * (x - mu).powi(2),
            &breakpoints,
            &config,
        )
        .unwrap();
        assert!((second.value - sigma * sigma).abs() < 1e-6);
    }

    #[test]
    fn test_real_line_without_breakpoints() {
        let config = QuadratureConfig::default();
        let result = integrate_real_line(|x| gaussian(x, 0.0, 1.0), &[], &config).unwrap();
        assert!((result.value - 1.0).abs() < 1e-8);
    }
}
