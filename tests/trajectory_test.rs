use mkscan::rg::RgMode;
use mkscan::trajectory::{run_trajectory, PhaseLabel, TrajectoryConfig};

fn config(p: f64, k: f64) -> TrajectoryConfig {
    TrajectoryConfig {
        lattice_size: 100,
        p,
        coupling: k,
        seed: 19,
        ..TrajectoryConfig::default()
    }
}

#[test]
fn pure_strong_coupling_flows_to_the_ferromagnetic_sink() {
    let run = run_trajectory(&config(1.0, 1.0)).unwrap();
    assert_eq!(run.label, PhaseLabel::Ferromagnetic);
    assert_eq!(run.census.ferro, 100);
}

#[test]
fn pure_negative_coupling_flows_to_the_antiferromagnetic_sink() {
    let run = run_trajectory(&config(0.0, 1.0)).unwrap();
    assert_eq!(run.label, PhaseLabel::Antiferromagnetic);
    assert_eq!(run.census.aferro, 100);
}

#[test]
fn weak_coupling_flows_to_the_disordered_sink() {
    // Well below the d=3 ferromagnetic threshold of the recursion.
    let run = run_trajectory(&config(1.0, 0.01)).unwrap();
    assert_eq!(run.label, PhaseLabel::Disordered);
}

#[test]
fn symmetric_strong_disorder_freezes_into_the_spin_glass() {
    let run = run_trajectory(&config(0.5, 5.0)).unwrap();
    assert_eq!(run.label, PhaseLabel::SpinGlass);
    // Both diagonal patterns must be populated, neither dominating.
    assert!(run.census.ferro > 0 && run.census.aferro > 0);
}

#[test]
fn trajectories_reproduce_exactly_from_their_seed() {
    let cfg = config(0.7, 0.8);
    let a = run_trajectory(&cfg).unwrap();
    let b = run_trajectory(&cfg).unwrap();
    assert_eq!(a.label, b.label);
    assert_eq!(a.iterations, b.iterations);
    assert_eq!(a.ensemble, b.ensemble);
}

#[test]
fn both_orderings_agree_on_the_deep_phases() {
    // bd and db shift the boundary, not the qualitative labels.
    for (p, k) in [(1.0, 1.0), (0.0, 1.0), (1.0, 0.01), (0.5, 5.0)] {
        let mut bd = config(p, k);
        bd.mode = RgMode::BondFirst;
        let mut db = config(p, k);
        db.mode = RgMode::DecimateFirst;
        assert_eq!(
            run_trajectory(&bd).unwrap().label,
            run_trajectory(&db).unwrap().label,
            "modes disagree at (p = {p}, K = {k})"
        );
    }
}

#[test]
fn a_starved_budget_is_reported_as_inconclusive() {
    // One step from a near-critical start cannot reach any sink.
    let mut cfg = config(1.0, 0.04);
    cfg.max_iterations = 1;
    let run = run_trajectory(&cfg).unwrap();
    assert_eq!(run.label, PhaseLabel::Inconclusive);
    assert_eq!(run.iterations, 1);
    assert_eq!(run.census.flowing, 100);
}

#[test]
fn rejected_configurations_never_start() {
    let mut cfg = config(0.5, 1.0);
    cfg.p = -0.1;
    assert!(run_trajectory(&cfg).is_err());
}
