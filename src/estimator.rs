//! Mode and dispersion of the inclination distribution.
//!
//! The accepted angles are smoothed with a Gaussian KDE. The point estimate is
//! the query-grid point of highest density (a discretized mode search, not a
//! mean) and the dispersion is the square root of the density's second moment
//! about that mode, integrated over the whole real line.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{KDE_BANDWIDTH_DEG, QUERY_MAX_DEG, QUERY_MIN_DEG, QUERY_POINTS};
use crate::error::{InclinationError, Result};
use crate::kde::GaussianKde;
use crate::monte_carlo::AngleSamples;
use crate::quadrature::{integrate_real_line, QuadratureConfig};

/// Estimator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Gaussian kernel bandwidth (degrees)
    pub bandwidth: f64,
    /// Number of points in the mode search grid
    pub query_points: usize,
    pub query_min: f64,
    pub query_max: f64,
    pub quadrature: QuadratureConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            bandwidth: KDE_BANDWIDTH_DEG,
            query_points: QUERY_POINTS,
            query_min: QUERY_MIN_DEG,
            query_max: QUERY_MAX_DEG,
            quadrature: QuadratureConfig::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.bandwidth.is_finite() || self.bandwidth <= 0.0 {
            return Err(InclinationError::invalid_parameter(
                "bandwidth",
                format!("must be finite and positive, got {}", self.bandwidth),
            ));
        }
        if self.query_points < 2 {
            return Err(InclinationError::invalid_parameter(
                "query_points",
                format!("need at least 2 query points, got {}", self.query_points),
            ));
        }
        if !self.query_min.is_finite() || !self.query_max.is_finite() || self.query_min >= self.query_max {
            return Err(InclinationError::invalid_parameter(
                "query range",
                format!("invalid range [{}, {}]", self.query_min, self.query_max),
            ));
        }
        Ok(())
    }
}

/// Fitted density with its point estimate and dispersion
#[derive(Debug, Clone)]
pub struct DistributionEstimate {
    pub kde: GaussianKde,
    /// Mode of the density on the query grid (degrees)
    pub mode: f64,
    /// sqrt of the second central moment about the mode (degrees)
    pub dispersion: f64,
    /// Query grid used for the mode search
    pub query: Vec<f64>,
    /// Density at each query point
    pub density: Vec<f64>,
}

impl DistributionEstimate {
    /// (query, density) pairs for plotting the fitted curve
    pub fn curve(&self) -> Vec<(f64, f64)> {
        self.query.iter().copied().zip(self.density.iter().copied()).collect()
    }
}

/// `num` evenly spaced points from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut points: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            points[num - 1] = stop;
            points
        }
    }
}

/// Index of the largest value; ties resolve to the first occurrence.
fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ if v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Discretized mode search over `query`.
pub fn find_mode(kde: &GaussianKde, query: &[f64]) -> Result<(f64, Vec<f64>)> {
    let density = kde.density_over(query);
    let index = argmax(&density).ok_or_else(|| {
        InclinationError::invalid_parameter("query", "empty query grid or all densities NaN")
    })?;
    Ok((query[index], density))
}

/// `sqrt(∫ p(x) (x - mode)² dx)` over the real line.
///
/// Breakpoints cover the KDE support in bandwidth-wide steps so the first
/// Kronrod pass on each piece sees the density mass.
pub fn dispersion_about(kde: &GaussianKde, mode: f64, config: &QuadratureConfig) -> Result<f64> {
    let (lo, hi) = kde.support();
    let width = kde.bandwidth();
    let pieces = ((hi - lo) / width).ceil().max(1.0) as usize;
    let breakpoints = linspace(lo, hi, pieces + 1);

    let integrand = |x: f64| {
        let p = kde.density_at(x);
        if p == 0.0 {
            0.0
        } else {
            p * (x - mode) * (x - mode)
        }
    };

    let result = integrate_real_line(integrand, &breakpoints, config)?;
    debug!(
        second_moment = result.value,
        abs_error = result.abs_error,
        evaluations = result.evaluations,
        "Dispersion integral evaluated"
    );

    // Tiny negative round-off is possible for a near-degenerate density
    Ok(result.value.max(0.0).sqrt())
}

/// Fit the density to the accepted angles and extract mode and dispersion.
///
/// # Arguments
/// * `samples` - Sampler output
/// * `config` - Bandwidth, query grid and quadrature settings
///
/// # Returns
/// * `Err(InclinationError::DegenerateSample)` if no trial was accepted
pub fn estimate_distribution(samples: &AngleSamples, config: &EstimatorConfig) -> Result<DistributionEstimate> {
    if samples.is_empty() {
        return Err(InclinationError::DegenerateSample { trials: samples.trials });
    }
    config.validate()?;

    let kde = GaussianKde::fit(&samples.angles, config.bandwidth)?;
    let query = linspace(config.query_min, config.query_max, config.query_points);
    let (mode, density) = find_mode(&kde, &query)?;
    let dispersion = dispersion_about(&kde, mode, &config.quadrature)?;

    debug!(mode, dispersion, accepted = samples.accepted(), "Distribution estimated");

    Ok(DistributionEstimate {
        kde,
        mode,
        dispersion,
        query,
        density,
    })
}
