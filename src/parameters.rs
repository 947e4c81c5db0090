//! Uncertain stellar parameters and their discretized uniform candidate grids.

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CANDIDATE_HALF_STEPS, CANDIDATE_POINTS, DEFAULT_PERIOD_DAYS, DEFAULT_PERIOD_ERR_DAYS,
    DEFAULT_RADIUS_ERR_RSUN, DEFAULT_RADIUS_RSUN, DEFAULT_VSINI_ERR_KMS, DEFAULT_VSINI_KMS,
};
use crate::error::{InclinationError, Result};

/// A measured quantity with a symmetric uncertainty: `value ± uncertainty`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StellarParameter {
    pub value: f64,
    pub uncertainty: f64,
}

impl StellarParameter {
    /// Create a parameter, rejecting negative or non-finite inputs.
    ///
    /// # Arguments
    /// * `name` - Parameter name used in error messages
    /// * `value` - Nominal value
    /// * `uncertainty` - Half-width of the uniform sampling interval
    pub fn new(name: &str, value: f64, uncertainty: f64) -> Result<Self> {
        let param = Self { value, uncertainty };
        param.validate(name)?;
        Ok(param)
    }

    /// Check that both value and uncertainty are finite and non-negative.
    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(InclinationError::invalid_parameter(
                name,
                format!("value must be finite and non-negative, got {}", self.value),
            ));
        }
        if !self.uncertainty.is_finite() || self.uncertainty < 0.0 {
            return Err(InclinationError::invalid_parameter(
                name,
                format!("uncertainty must be finite and non-negative, got {}", self.uncertainty),
            ));
        }
        Ok(())
    }

    /// Grid spacing between neighbouring candidates
    pub fn step(&self) -> f64 {
        self.uncertainty / CANDIDATE_HALF_STEPS as f64
    }

    /// Whether the parameter is known exactly (zero uncertainty)
    pub fn is_exact(&self) -> bool {
        self.uncertainty == 0.0
    }

    /// Discretized uniform candidate set.
    ///
    /// Returns 201 equally spaced points from `value - uncertainty` to
    /// `value + uncertainty`. Each point is computed directly from its index so
    /// the centre point equals `value` exactly. With zero uncertainty the set
    /// collapses to the nominal value alone.
    pub fn candidates(&self) -> Vec<f64> {
        if self.is_exact() {
            return vec![self.value];
        }

        let step = self.step();
        let mut grid = Vec::with_capacity(CANDIDATE_POINTS);
        for k in -CANDIDATE_HALF_STEPS..=CANDIDATE_HALF_STEPS {
            grid.push(self.value + k as f64 * step);
        }
        grid
    }

    /// Draw `n` values with replacement from the candidate set.
    pub fn draw<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        if self.is_exact() {
            return vec![self.value; n];
        }

        let grid = self.candidates();
        let index_dist = Uniform::new(0, grid.len());
        (0..n).map(|_| grid[index_dist.sample(rng)]).collect()
    }
}

/// The three measured inputs of one star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StellarInputs {
    /// Projected rotational velocity, km/s
    pub vsini: StellarParameter,
    /// Rotation period, days
    pub period: StellarParameter,
    /// Stellar radius, solar radii
    pub radius: StellarParameter,
}

impl Default for StellarInputs {
    fn default() -> Self {
        Self {
            vsini: StellarParameter {
                value: DEFAULT_VSINI_KMS,
                uncertainty: DEFAULT_VSINI_ERR_KMS,
            },
            period: StellarParameter {
                value: DEFAULT_PERIOD_DAYS,
                uncertainty: DEFAULT_PERIOD_ERR_DAYS,
            },
            radius: StellarParameter {
                value: DEFAULT_RADIUS_RSUN,
                uncertainty: DEFAULT_RADIUS_ERR_RSUN,
            },
        }
    }
}

impl StellarInputs {
    /// Build validated inputs from the six physical scalars.
    pub fn new(
        vsini: f64,
        vsini_err: f64,
        period: f64,
        period_err: f64,
        radius: f64,
        radius_err: f64,
    ) -> Result<Self> {
        Ok(Self {
            vsini: StellarParameter::new("vsini", vsini, vsini_err)?,
            period: StellarParameter::new("prot", period, period_err)?,
            radius: StellarParameter::new("rad", radius, radius_err)?,
        })
    }

    /// Validate all three parameters.
    pub fn validate(&self) -> Result<()> {
        self.vsini.validate("vsini")?;
        self.period.validate("prot")?;
        self.radius.validate("rad")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_candidate_grid_shape() {
        let p = StellarParameter { value: 10.0, uncertainty: 1.0 };
        let grid = p.candidates();

        assert_eq!(grid.len(), 201);
        assert!((grid[0] - 9.0).abs() < 1e-12);
        assert!((grid[200] - 11.0).abs() < 1e-12);
        assert_eq!(grid[100], 10.0);

        // Equally spaced by uncertainty / 100
        for pair in grid.windows(2) {
            assert!((pair[1] - pair[0] - 0.01).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_uncertainty_is_constant() {
        let p = StellarParameter { value: 0.799503, uncertainty: 0.0 };
        assert_eq!(p.candidates(), vec![0.799503]);

        let mut rng = StdRng::seed_from_u64(7);
        let draws = p.draw(500, &mut rng);
        assert_eq!(draws.len(), 500);
        assert!(draws.iter().all(|&d| d == 0.799503));
    }

    #[test]
    fn test_draws_stay_on_grid() {
        let p = StellarParameter { value: 170.0, uncertainty: 17.0 };
        let grid = p.candidates();
        let mut rng = StdRng::seed_from_u64(11);

        let draws = p.draw(2000, &mut rng);
        assert_eq!(draws.len(), 2000);
        for d in &draws {
            assert!(grid.contains(d), "{d} is not a grid point");
        }

        // With 2000 draws over 201 points both halves should be populated
        assert!(draws.iter().any(|&d| d < 170.0));
        assert!(draws.iter().any(|&d| d > 170.0));
    }

    #[test]
    fn test_draws_are_reproducible() {
        let p = StellarParameter { value: 0.2354, uncertainty: 0.0005 };
        let a = p.draw(100, &mut StdRng::seed_from_u64(3));
        let b = p.draw(100, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert!(StellarParameter::new("vsini", -1.0, 1.0).is_err());
        assert!(StellarParameter::new("vsini", 1.0, -1.0).is_err());
        assert!(StellarParameter::new("vsini", f64::NAN, 1.0).is_err());
        assert!(StellarParameter::new("vsini", 1.0, f64::INFINITY).is_err());
        assert!(StellarParameter::new("vsini", 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_default_inputs_match_documented_values() {
        let inputs = StellarInputs::default();
        assert_eq!(inputs.vsini.value, 170.0);
        assert_eq!(inputs.vsini.uncertainty, 17.0);
        assert_eq!(inputs.period.value, 0.23540915);
        assert_eq!(inputs.period.uncertainty, 4.5929e-04);
        assert_eq!(inputs.radius.value, 0.799503);
        assert_eq!(inputs.radius.uncertainty, 0.0540905);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_inputs_new_keeps_period_uncertainty() {
        let inputs = StellarInputs::new(100.0, 5.0, 1.5, 0.25, 1.0, 0.1).unwrap();
        assert_eq!(inputs.period.uncertainty, 0.25);
    }
}
