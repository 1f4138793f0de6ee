use mkscan::boundary::{bisect_coupling, scan_grid, GridSpec};
use mkscan::error::ScanError;
use mkscan::trajectory::{PhaseLabel, TrajectoryConfig};

fn base_config() -> TrajectoryConfig {
    TrajectoryConfig {
        lattice_size: 50,
        p: 1.0,
        max_iterations: 60,
        seed: 19,
        ..TrajectoryConfig::default()
    }
}

#[test]
fn bisection_brackets_the_pure_ferromagnetic_threshold() {
    // At p = 1 the recursion is deterministic and the boundary sits at the
    // fixed point of K' = atanh(tanh^3(9K)), near K = 0.039.
    let k_c = bisect_coupling(&base_config(), 0.005, 1.0, 1e-4, 19).unwrap();
    assert!(
        (0.02..0.07).contains(&k_c),
        "K_c = {k_c} outside the expected window"
    );
}

#[test]
fn non_straddling_brackets_are_refused() {
    // Both endpoints deep in the ferromagnetic phase.
    let err = bisect_coupling(&base_config(), 0.5, 1.0, 1e-3, 19).unwrap_err();
    assert!(matches!(err, ScanError::Config(_)));
}

#[test]
fn a_grid_scan_finds_the_boundary_segment() {
    let grid = GridSpec {
        p_min: 1.0,
        p_max: 1.0,
        p_steps: 1,
        k_min: 0.01,
        k_max: 1.0,
        k_steps: 6,
    };
    let diagram = scan_grid(&grid, &base_config(), 19).unwrap();
    assert_eq!(diagram.points.len(), 6);
    assert_eq!(diagram.points[0].label, PhaseLabel::Disordered);
    assert_eq!(diagram.points[5].label, PhaseLabel::Ferromagnetic);

    let edges = diagram.boundaries();
    assert_eq!(edges.len(), 1, "one label change along the K axis");
    assert_eq!(edges[0].from, PhaseLabel::Disordered);
    assert_eq!(edges[0].to, PhaseLabel::Ferromagnetic);
}

#[test]
fn inconclusive_points_do_not_abort_the_sweep() {
    // A one-iteration budget leaves a near-critical point unresolved; the
    // sweep records the marker and completes.
    let mut base = base_config();
    base.max_iterations = 1;
    let grid = GridSpec {
        p_min: 1.0,
        p_max: 1.0,
        p_steps: 1,
        k_min: 0.04,
        k_max: 0.04,
        k_steps: 1,
    };
    let diagram = scan_grid(&grid, &base, 19).unwrap();
    assert_eq!(diagram.points.len(), 1);
    assert_eq!(diagram.points[0].label, PhaseLabel::Inconclusive);
    assert!(diagram.boundaries().is_empty());
}

#[test]
fn grid_points_come_back_in_deterministic_order() {
    let grid = GridSpec {
        p_min: 0.8,
        p_max: 1.0,
        p_steps: 3,
        k_min: 0.5,
        k_max: 1.5,
        k_steps: 2,
    };
    let a = scan_grid(&grid, &base_config(), 7).unwrap();
    let b = scan_grid(&grid, &base_config(), 7).unwrap();
    assert_eq!(a.points, b.points);
    // p-major, K fastest.
    assert!(a.points[0].p <= a.points[2].p);
    assert!(a.points[0].coupling < a.points[1].coupling);
}

#[test]
fn malformed_grids_are_rejected() {
    let mut grid = GridSpec {
        p_min: 0.0,
        p_max: 1.0,
        p_steps: 2,
        k_min: 0.1,
        k_max: 1.0,
        k_steps: 2,
    };
    grid.k_min = -0.5;
    assert!(scan_grid(&grid, &base_config(), 0).is_err());
    grid.k_min = 0.1;
    grid.p_max = 1.4;
    assert!(scan_grid(&grid, &base_config(), 0).is_err());
}
