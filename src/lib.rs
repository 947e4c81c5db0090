//! # Stellar Inclination
//!
//! Monte-Carlo estimation of a star's inclination angle from its projected
//! rotational velocity, rotation period and radius, followed by Gaussian
//! kernel density estimation of the resulting angle distribution.

// Re-export the main types and functions
pub use cli_api::{
    make_rng, run_inclination, run_inclination_with_rng, InclinationRequest, InclinationRun, OutputFormat,
};
pub use error::{InclinationError, Result};
pub use estimator::{estimate_distribution, DistributionEstimate, EstimatorConfig};
pub use kde::GaussianKde;
pub use monte_carlo::{sample_inclinations, AngleSamples, SampleSet};
pub use parameters::{StellarInputs, StellarParameter};
pub use report::{format_report, Histogram, InclinationReport, PlotData, PlotStyle};

// Module declarations
pub mod cli_api;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod kde;
pub mod monte_carlo;
pub mod parameters;
pub mod quadrature;
pub mod report;
