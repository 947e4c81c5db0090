//! One-dimensional Gaussian kernel density estimation.

use std::f64::consts::PI;

use crate::constants::KERNEL_CUTOFF_BANDWIDTHS;
use crate::error::{InclinationError, Result};

/// Gaussian KDE with a fixed bandwidth.
///
/// The density is
/// `p(x) = 1 / (n h sqrt(2π)) * Σ_i exp(-(x - s_i)² / (2 h²))`.
/// Samples are kept sorted so an evaluation only visits kernels within
/// `KERNEL_CUTOFF_BANDWIDTHS` bandwidths of the query point; anything further
/// away underflows to zero in f64 anyway.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
    log_norm: f64,
}

impl GaussianKde {
    /// Fit a KDE to `samples`.
    ///
    /// # Arguments
    /// * `samples` - Data points (any order, must be finite)
    /// * `bandwidth` - Kernel standard deviation, must be positive
    ///
    /// # Returns
    /// * `Err(InclinationError::DegenerateSample)` for an empty sample
    pub fn fit(samples: &[f64], bandwidth: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(InclinationError::DegenerateSample { trials: 0 });
        }
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(InclinationError::invalid_parameter(
                "bandwidth",
                format!("must be finite and positive, got {bandwidth}"),
            ));
        }
        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(InclinationError::invalid_parameter(
                "samples",
                format!("non-finite sample {bad}"),
            ));
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len() as f64;
        let log_norm = (n * bandwidth * (2.0 * PI).sqrt()).ln();

        Ok(Self {
            samples: sorted,
            bandwidth,
            log_norm,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Number of fitted samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sorted fitted samples
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Range outside of which the density is exactly zero
    pub fn support(&self) -> (f64, f64) {
        let reach = KERNEL_CUTOFF_BANDWIDTHS * self.bandwidth;
        let lo = self.samples[0] - reach;
        let hi = self.samples[self.samples.len() - 1] + reach;
        (lo, hi)
    }

    /// Log-density at `x`.
    ///
    /// Core evaluator for the density operations below. Sums the kernels with
    /// the log-sum-exp trick so dense regions do not overflow and sparse ones
    /// keep precision. Returns `-inf` where no kernel reaches `x`.
    pub fn log_density_at(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }

        let reach = KERNEL_CUTOFF_BANDWIDTHS * self.bandwidth;
        let lo = self.samples.partition_point(|&s| s < x - reach);
        let hi = self.samples.partition_point(|&s| s <= x + reach);
        if lo >= hi {
            return f64::NEG_INFINITY;
        }

        let window = &self.samples[lo..hi];
        let inv_h = 1.0 / self.bandwidth;
        let exponent = |s: f64| {
            let z = (x - s) * inv_h;
            -0.5 * z * z
        };

        // The largest term comes from the sample nearest to x, which sits on
        // either side of x's insertion point in the sorted window
        let split = window.partition_point(|&s| s < x);
        let mut max_exponent = f64::NEG_INFINITY;
        if split > 0 {
            max_exponent = max_exponent.max(exponent(window[split - 1]));
        }
        if split < window.len() {
            max_exponent = max_exponent.max(exponent(window[split]));
        }

        let sum: f64 = window.iter().map(|&s| (exponent(s) - max_exponent).exp()).sum();

        max_exponent + sum.ln() - self.log_norm
    }

    /// Density at a single point
    pub fn density_at(&self, x: f64) -> f64 {
        self.log_density_at(x).exp()
    }

    /// Density at every point of `xs`, in order
    pub fn density_over(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.density_at(x)).collect()
    }
}
