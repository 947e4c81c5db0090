use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use stellar_inclination::constants::{
    DEFAULT_PERIOD_DAYS, DEFAULT_PERIOD_ERR_DAYS, DEFAULT_RADIUS_ERR_RSUN, DEFAULT_RADIUS_RSUN, DEFAULT_TRIALS,
    DEFAULT_VSINI_ERR_KMS, DEFAULT_VSINI_KMS,
};
use stellar_inclination::{
    run_inclination, EstimatorConfig, InclinationRequest, InclinationRun, OutputFormat, PlotStyle, StellarInputs,
};

#[derive(Parser)]
#[command(name = "findinc")]
#[command(version)]
#[command(about = "Estimate the inclination angle of a star with Monte-Carlo error propagation", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// vsin(i) of the star (km/s)
    #[arg(long, default_value_t = DEFAULT_VSINI_KMS)]
    vsini: f64,

    /// Uncertainty of vsin(i) (km/s)
    #[arg(long, default_value_t = DEFAULT_VSINI_ERR_KMS)]
    verr: f64,

    /// Rotational period of the star (days)
    #[arg(long, default_value_t = DEFAULT_PERIOD_DAYS)]
    prot: f64,

    /// Uncertainty of the rotational period (days)
    #[arg(long, default_value_t = DEFAULT_PERIOD_ERR_DAYS)]
    perr: f64,

    /// Radius of the star (solar radii)
    #[arg(long, default_value_t = DEFAULT_RADIUS_RSUN)]
    rad: f64,

    /// Uncertainty of the radius (solar radii)
    #[arg(long, default_value_t = DEFAULT_RADIUS_ERR_RSUN)]
    rerr: f64,

    /// Number of Monte-Carlo trials
    #[arg(short = 'n', long, default_value_t = DEFAULT_TRIALS as i64)]
    ntrials: i64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short = 'o', long, default_value = "text")]
    output: OutputArg,

    /// Write histogram and density curve data (JSON) to this file
    #[arg(long, value_name = "FILE")]
    plot: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    Text,
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set logging subscriber")?;
    Ok(())
}

/// Map command-line values onto a request.
///
/// Negative physical values and trial counts are taken by absolute value;
/// a trial count of zero is rejected.
fn build_request(cli: &Cli) -> Result<InclinationRequest> {
    let trials = usize::try_from(cli.ntrials.unsigned_abs()).context("Trial count does not fit in memory")?;
    if trials == 0 {
        bail!("Number of trials has to be a positive integer, got {}", cli.ntrials);
    }

    let inputs = StellarInputs::new(
        cli.vsini.abs(),
        cli.verr.abs(),
        cli.prot.abs(),
        cli.perr.abs(),
        cli.rad.abs(),
        cli.rerr.abs(),
    )?;

    Ok(InclinationRequest {
        inputs,
        trials,
        seed: cli.seed,
        estimator: EstimatorConfig::default(),
    })
}

fn write_plot_data(run: &InclinationRun, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let plot = run.plot_data(PlotStyle::default());
    serde_json::to_writer_pretty(BufWriter::new(file), &plot)
        .with_context(|| format!("Failed to write plot data to {}", path.display()))?;
    debug!(path = %path.display(), "Plot data written");
    Ok(())
}

fn display_results(run: &InclinationRun, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", run.report_line());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&run.report())?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let request = build_request(&cli)?;
    debug!(?request, "Starting inclination run");

    let run = run_inclination(&request)?;
    display_results(&run, cli.output.into())?;

    if let Some(path) = &cli.plot {
        write_plot_data(&run, path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["findinc"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = build_request(&parse(&[])).unwrap();
        assert_eq!(request.inputs, StellarInputs::default());
        assert_eq!(request.trials, 100_000);
        assert_eq!(request.seed, None);
    }

    #[test]
    fn test_negative_values_coerced() {
        let request = build_request(&parse(&["--vsini", "-120", "--perr=-0.01", "--ntrials", "-50"])).unwrap();
        assert_eq!(request.inputs.vsini.value, 120.0);
        assert_eq!(request.inputs.period.uncertainty, 0.01);
        assert_eq!(request.trials, 50);
    }

    #[test]
    fn test_period_uncertainty_is_used() {
        let request = build_request(&parse(&["--perr", "0.002"])).unwrap();
        assert_eq!(request.inputs.period.uncertainty, 0.002);
    }

    #[test]
    fn test_zero_trials_rejected() {
        assert!(build_request(&parse(&["--ntrials", "0"])).is_err());
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert!(Cli::try_parse_from(["findinc", "--vsini", "fast"]).is_err());
        assert!(Cli::try_parse_from(["findinc", "--ntrials", "1.5"]).is_err());
    }
}
