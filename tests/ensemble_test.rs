use mkscan::ensemble::Ensemble;
use mkscan::transfer::TransferMatrix;
use mkscan::trajectory::TrajectoryConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn double_delta_fraction_converges_to_p() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let ens = Ensemble::double_delta(10_000, 0.3, 1.0, &mut rng);
    let plus = ens.iter().filter(|t| t.coupling() > 0.0).count();
    let fraction = plus as f64 / ens.len() as f64;
    // Binomial std at this size is ~0.005.
    assert!(
        (fraction - 0.3).abs() < 0.02,
        "+K fraction {fraction} too far from p = 0.3"
    );
}

#[test]
fn a_full_draw_returns_every_matrix_once() {
    let matrices: Vec<TransferMatrix> = (1..=30)
        .map(|i| TransferMatrix::from_coupling(i as f64 / 10.0))
        .collect();
    let ens = Ensemble::from_matrices(matrices);
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let picks = ens.draw_distinct(30, &mut rng).unwrap();
    assert_eq!(picks.len(), 30);

    let mut seen: Vec<f64> = picks.iter().map(|t| t.coupling()).collect();
    seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
    for (i, k) in seen.iter().enumerate() {
        assert!(
            (k - (i + 1) as f64 / 10.0).abs() < 1e-12,
            "distinct draw missed a matrix"
        );
    }
}

#[test]
fn census_counts_each_sink() {
    let matrices = vec![
        TransferMatrix::from_coupling(10.0),
        TransferMatrix::from_coupling(10.0),
        TransferMatrix::from_coupling(10.0),
        TransferMatrix::from_coupling(-10.0),
        TransferMatrix::from_coupling(-10.0),
        TransferMatrix::uniform(),
        TransferMatrix::from_coupling(1.0),
    ];
    let census = Ensemble::from_matrices(matrices).census(1e-4, 0.9999);
    assert_eq!(census.ferro, 3);
    assert_eq!(census.aferro, 2);
    assert_eq!(census.disorder, 1);
    assert_eq!(census.flowing, 1);
    assert_eq!(census.total(), 7);
}

#[test]
fn coupling_stats_on_a_symmetric_population() {
    let matrices = vec![
        TransferMatrix::from_coupling(2.0),
        TransferMatrix::from_coupling(2.0),
        TransferMatrix::from_coupling(-2.0),
        TransferMatrix::from_coupling(-2.0),
    ];
    let (mean, std) = Ensemble::from_matrices(matrices).coupling_stats();
    assert!(mean.abs() < 1e-12, "mean {mean} should vanish");
    assert!((std - (16.0f64 / 3.0).sqrt()).abs() < 1e-9, "std {std}");
}

#[test]
fn negation_mirrors_the_census() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let ens = Ensemble::double_delta(200, 0.7, 8.0, &mut rng);
    let census = ens.census(1e-4, 0.9999);
    let mirrored = ens.negated().census(1e-4, 0.9999);
    assert_eq!(census.ferro, mirrored.aferro);
    assert_eq!(census.aferro, mirrored.ferro);
    assert_eq!(census.disorder, mirrored.disorder);
    assert_eq!(census.flowing, mirrored.flowing);
}

#[test]
fn invalid_configurations_are_rejected_up_front() {
    let valid = TrajectoryConfig::default();
    assert!(valid.validate().is_ok());

    let mut cfg = valid.clone();
    cfg.p = 1.5;
    assert!(cfg.validate().is_err(), "p outside [0, 1]");

    let mut cfg = valid.clone();
    cfg.coupling = -1.0;
    assert!(cfg.validate().is_err(), "negative coupling");

    let mut cfg = valid.clone();
    cfg.coupling = 0.0;
    assert!(cfg.validate().is_err(), "zero coupling");

    let mut cfg = valid.clone();
    cfg.lattice_size = 26;
    assert!(cfg.validate().is_err(), "fewer samples than one draw needs");

    let mut cfg = valid.clone();
    cfg.max_iterations = 0;
    assert!(cfg.validate().is_err(), "empty iteration budget");

    let mut cfg = valid;
    cfg.sink_lower = 0.5;
    cfg.sink_upper = 0.4;
    assert!(cfg.validate().is_err(), "inverted sink tolerances");
}
