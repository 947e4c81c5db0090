use rand::rngs::StdRng;
use rand::SeedableRng;
use stellar_inclination::estimator::linspace;
use stellar_inclination::{
    estimate_distribution, run_inclination, sample_inclinations, EstimatorConfig, InclinationError,
    InclinationRequest, StellarInputs, StellarParameter,
};

fn seeded(trials: usize, seed: u64) -> InclinationRequest {
    InclinationRequest {
        trials,
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_documented_defaults_regression() {
    // sin i ≈ 0.99 at the nominal values; about half the trials overshoot 1
    // and the arcsine Jacobian pulls the density peak well below 90°
    let run = run_inclination(&seeded(100_000, 20230419)).unwrap();

    assert_eq!(run.samples.trials, 100_000);
    assert_eq!(run.samples.accepted() + run.samples.dropped, 100_000);
    assert_eq!(run.samples.dropped, 44_736);

    let grid = linspace(0.0, 90.0, 1000);
    assert_eq!(run.mode(), grid[772], "mode {}", run.mode());
    assert!((run.mode() - 69.549_549_549_549_55).abs() < 1e-9);
    assert!(
        (run.dispersion() - 7.700_617_903_240_12).abs() < 1e-6,
        "dispersion {}",
        run.dispersion()
    );
    assert_eq!(run.report_line(), "i = 70 +/- 8 deg");
    assert!(run.samples.angles.iter().all(|&a| (0.0..=90.0).contains(&a)));
}

#[test]
fn test_mode_within_a_degree_when_trials_double() {
    let small = run_inclination(&seeded(25_000, 3)).unwrap();
    let large = run_inclination(&seeded(50_000, 3)).unwrap();
    assert!(
        (small.mode() - large.mode()).abs() < 1.5,
        "{} vs {}",
        small.mode(),
        large.mode()
    );
}

#[test]
fn test_sampler_and_estimator_compose() {
    let inputs = StellarInputs::default();
    let mut rng = StdRng::seed_from_u64(4);
    let samples = sample_inclinations(&inputs, 4_000, &mut rng).unwrap();
    let estimate = estimate_distribution(&samples, &EstimatorConfig::default()).unwrap();

    let run = run_inclination(&seeded(4_000, 4)).unwrap();
    assert_eq!(run.samples, samples);
    assert_eq!(run.mode(), estimate.mode);
    assert_eq!(run.dispersion(), estimate.dispersion);
}

#[test]
fn test_exact_inputs_collapse_to_kernel() {
    // No uncertainty: every trial gives the same angle, so the density is a
    // single Gaussian kernel and the dispersion equals the bandwidth
    let inputs = StellarInputs {
        vsini: StellarParameter { value: 100.0, uncertainty: 0.0 },
        period: StellarParameter { value: 0.3, uncertainty: 0.0 },
        radius: StellarParameter { value: 1.0, uncertainty: 0.0 },
    };
    let run = run_inclination(&InclinationRequest {
        inputs,
        ..seeded(500, 1)
    })
    .unwrap();

    let expected = (100.0_f64 * 0.3 * 86_400.0 / (2.0 * std::f64::consts::PI * 695_700.0))
        .asin()
        .to_degrees();
    assert_eq!(run.samples.accepted(), 500);
    assert!((run.mode() - expected).abs() <= 90.0 / 999.0);
    assert!((run.dispersion() - 2.0).abs() < 0.01);
}

#[test]
fn test_all_invalid_reports_degenerate_sample() {
    let inputs = StellarInputs::new(300.0, 10.0, 3.0, 0.1, 0.9, 0.05).unwrap();
    let err = run_inclination(&InclinationRequest {
        inputs,
        ..seeded(1_000, 9)
    })
    .unwrap_err();

    assert!(matches!(err, InclinationError::DegenerateSample { trials: 1_000 }));
    assert!(err.to_string().contains("1000"));
}
