// CLI API module - provides the end-to-end pipeline used by the command-line tool
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::constants::DEFAULT_TRIALS;
use crate::error::Result;
use crate::estimator::{estimate_distribution, DistributionEstimate, EstimatorConfig};
use crate::monte_carlo::{sample_inclinations, AngleSamples};
use crate::parameters::StellarInputs;
use crate::report::{format_report, CurvePoint, Histogram, InclinationReport, PlotData, PlotStyle};

// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

// Everything needed for one inclination run
#[derive(Debug, Clone)]
pub struct InclinationRequest {
    pub inputs: StellarInputs,
    pub trials: usize,
    pub seed: Option<u64>,
    pub estimator: EstimatorConfig,
}

impl Default for InclinationRequest {
    fn default() -> Self {
        Self {
            inputs: StellarInputs::default(),
            trials: DEFAULT_TRIALS,
            seed: None,
            estimator: EstimatorConfig::default(),
        }
    }
}

// Result of one run: the accepted samples and the fitted distribution
#[derive(Debug, Clone)]
pub struct InclinationRun {
    pub request: InclinationRequest,
    pub samples: AngleSamples,
    pub estimate: DistributionEstimate,
}

impl InclinationRun {
    /// Point estimate (degrees)
    pub fn mode(&self) -> f64 {
        self.estimate.mode
    }

    /// Dispersion about the mode (degrees)
    pub fn dispersion(&self) -> f64 {
        self.estimate.dispersion
    }

    /// The one-line text report
    pub fn report_line(&self) -> String {
        format_report(self.estimate.mode, self.estimate.dispersion)
    }

    pub fn report(&self) -> InclinationReport {
        InclinationReport {
            mode_deg: self.estimate.mode,
            dispersion_deg: self.estimate.dispersion,
            rounded_mode_deg: self.estimate.mode.round_ties_even(),
            rounded_dispersion_deg: self.estimate.dispersion.round_ties_even(),
            trials: self.samples.trials,
            accepted: self.samples.accepted(),
            dropped: self.samples.dropped,
            seed: self.request.seed,
            inputs: self.request.inputs,
        }
    }

    /// Numeric artifacts for the plotting front end
    pub fn plot_data(&self, style: PlotStyle) -> PlotData {
        PlotData {
            angles: self.samples.angles.clone(),
            histogram: Histogram::auto(&self.samples.angles),
            curve: self
                .estimate
                .curve()
                .into_iter()
                .map(|(x, density)| CurvePoint { x, density })
                .collect(),
            marker_deg: self.estimate.mode.round_ties_even(),
            label: self.report_line(),
            style,
        }
    }
}

/// Random source for a run: seeded when reproducibility is requested,
/// otherwise seeded from OS entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run the Monte-Carlo sampler and the distribution estimator.
///
/// # Returns
/// * `InvalidTrialCount` / `InvalidParameter` for bad configuration
/// * `DegenerateSample` if every trial was physically inconsistent
pub fn run_inclination(request: &InclinationRequest) -> Result<InclinationRun> {
    let mut rng = make_rng(request.seed);
    run_inclination_with_rng(request, &mut rng)
}

/// Same as [`run_inclination`] with a caller-supplied random source.
pub fn run_inclination_with_rng<R: rand::Rng + ?Sized>(
    request: &InclinationRequest,
    rng: &mut R,
) -> Result<InclinationRun> {
    request.estimator.validate()?;

    let samples = sample_inclinations(&request.inputs, request.trials, rng)?;
    let estimate = estimate_distribution(&samples, &request.estimator)?;

    info!(
        trials = samples.trials,
        accepted = samples.accepted(),
        mode = estimate.mode,
        dispersion = estimate.dispersion,
        "Inclination estimated"
    );

    Ok(InclinationRun {
        request: request.clone(),
        samples,
        estimate,
    })
}
