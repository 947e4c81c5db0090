//! Physical and numerical constants used in inclination estimation

/// Seconds in one day, converts rotation periods from days to seconds
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Nominal solar radius in kilometres (IAU 2015 Resolution B3)
pub const SOLAR_RADIUS_KM: f64 = 695_700.0;

/// Number of grid steps on each side of a nominal value.
///
/// A parameter `value ± uncertainty` is discretized as
/// `value + k * uncertainty / CANDIDATE_HALF_STEPS` for
/// `k = -CANDIDATE_HALF_STEPS..=CANDIDATE_HALF_STEPS`, i.e. 201 points.
pub const CANDIDATE_HALF_STEPS: i32 = 100;

/// Total number of candidate points for a parameter with non-zero uncertainty
pub const CANDIDATE_POINTS: usize = (2 * CANDIDATE_HALF_STEPS + 1) as usize;

/// Gaussian kernel bandwidth in degrees
pub const KDE_BANDWIDTH_DEG: f64 = 2.0;

/// Number of query points used for the discretized mode search
pub const QUERY_POINTS: usize = 1000;

/// Lower end of the mode search grid (degrees)
pub const QUERY_MIN_DEG: f64 = 0.0;

/// Upper end of the mode search grid (degrees)
pub const QUERY_MAX_DEG: f64 = 90.0;

/// Kernel cutoff in bandwidths.
///
/// `exp(-z^2 / 2)` underflows to exactly zero in f64 beyond z ≈ 38.6, so
/// kernels further away than this contribute nothing to a density sum.
pub const KERNEL_CUTOFF_BANDWIDTHS: f64 = 40.0;

/// Default relative tolerance for the dispersion quadrature
pub const QUADRATURE_REL_TOLERANCE: f64 = 1e-8;

/// Default absolute tolerance for the dispersion quadrature
pub const QUADRATURE_ABS_TOLERANCE: f64 = 1e-10;

/// Default subdivision budget per quadrature segment
pub const QUADRATURE_MAX_SUBDIVISIONS: usize = 200;

/// Fraction of dropped trials above which sampling logs a warning
pub const HIGH_DROP_FRACTION: f64 = 0.5;

// Documented default configuration (V1 rotator example)
pub const DEFAULT_VSINI_KMS: f64 = 170.0;
pub const DEFAULT_VSINI_ERR_KMS: f64 = 17.0;
pub const DEFAULT_PERIOD_DAYS: f64 = 0.23540915;
pub const DEFAULT_PERIOD_ERR_DAYS: f64 = 4.5929e-04;
pub const DEFAULT_RADIUS_RSUN: f64 = 0.799503;
pub const DEFAULT_RADIUS_ERR_RSUN: f64 = 0.0540905;
pub const DEFAULT_TRIALS: usize = 100_000;
