use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

use crate::constants::{HIGH_DROP_FRACTION, SECONDS_PER_DAY, SOLAR_RADIUS_KM};
use crate::error::{InclinationError, Result};
use crate::parameters::StellarInputs;

const RADIANS_TO_DEGREES: f64 = 180.0 / PI;

/// Monte-Carlo draws, one entry per trial in each sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub radius: Vec<f64>,   // solar radii
    pub period: Vec<f64>,   // days
    pub velocity: Vec<f64>, // km/s
}

impl SampleSet {
    /// Number of trials
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }
}

/// Inclination angles of the trials that fell inside the arcsine domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSamples {
    /// Accepted angles in degrees, in trial order
    pub angles: Vec<f64>,
    /// Number of Monte-Carlo trials requested
    pub trials: usize,
    /// Number of trials dropped because |sin i| > 1
    pub dropped: usize,
}

impl AngleSamples {
    /// Number of accepted trials
    pub fn accepted(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Fraction of trials that were dropped
    pub fn drop_fraction(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.dropped as f64 / self.trials as f64
    }
}

/// Draw `n` independent triples from the inputs' candidate grids.
///
/// All radii are drawn first, then all periods, then all velocities, so a
/// fixed seed always reproduces the same triples.
pub fn draw_sample_set<R: Rng + ?Sized>(inputs: &StellarInputs, n: usize, rng: &mut R) -> SampleSet {
    let radius = inputs.radius.draw(n, rng);
    let period = inputs.period.draw(n, rng);
    let velocity = inputs.vsini.draw(n, rng);

    SampleSet { radius, period, velocity }
}

/// Sine of the inclination implied by one (velocity, period, radius) triple.
///
/// `sin i = vsin(i) / v_eq` with the equatorial velocity
/// `v_eq = 2π R / P`, converting days to seconds and solar radii to km.
///
/// # Arguments
/// * `velocity` - Projected rotational velocity (km/s)
/// * `period` - Rotation period (days)
/// * `radius` - Stellar radius (solar radii)
pub fn sin_inclination(velocity: f64, period: f64, radius: f64) -> f64 {
    velocity * period * SECONDS_PER_DAY / (2.0 * PI * radius * SOLAR_RADIUS_KM)
}

/// Inclination in degrees, or `None` if the triple is physically inconsistent.
///
/// Arguments with `|sin i| > 1` (and non-finite ones, e.g. from a zero radius)
/// are rejected rather than clamped.
pub fn inclination_deg(velocity: f64, period: f64, radius: f64) -> Option<f64> {
    let argument = sin_inclination(velocity, period, radius);
    if argument.is_finite() && argument.abs() <= 1.0 {
        Some(argument.asin() * RADIANS_TO_DEGREES)
    } else {
        None
    }
}

/// Convert a sample set into accepted inclination angles.
pub fn angles_from_sample_set(samples: &SampleSet) -> AngleSamples {
    let trials = samples.len();
    let mut angles = Vec::with_capacity(trials);

    for i in 0..trials {
        if let Some(angle) = inclination_deg(samples.velocity[i], samples.period[i], samples.radius[i]) {
            angles.push(angle);
        }
    }

    let dropped = trials - angles.len();
    AngleSamples { angles, trials, dropped }
}

/// Run the Monte-Carlo sampler.
///
/// # Arguments
/// * `inputs` - Validated stellar parameters
/// * `trials` - Number of Monte-Carlo trials (must be positive)
/// * `rng` - Random source; seed it for reproducible runs
///
/// # Returns
/// * The accepted angles with trial bookkeeping. The collection may be empty;
///   the estimator reports that case.
pub fn sample_inclinations<R: Rng + ?Sized>(
    inputs: &StellarInputs,
    trials: usize,
    rng: &mut R,
) -> Result<AngleSamples> {
    if trials == 0 {
        return Err(InclinationError::InvalidTrialCount(trials));
    }
    inputs.validate()?;

    let sample_set = draw_sample_set(inputs, trials, rng);
    let result = angles_from_sample_set(&sample_set);

    debug!(
        trials = result.trials,
        accepted = result.accepted(),
        dropped = result.dropped,
        "Monte-Carlo sampling finished"
    );
    if result.drop_fraction() > HIGH_DROP_FRACTION {
        warn!(
            dropped = result.dropped,
            trials = result.trials,
            "More than half of the trials gave |sin i| > 1"
        );
    }

    Ok(result)
}
