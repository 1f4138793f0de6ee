// boundary.rs - phase-diagram assembly: parallel grid sweeps and bisection

use rayon::prelude::*;

use crate::error::ScanError;
use crate::trajectory::{run_trajectory, PhaseLabel, TrajectoryConfig};
use crate::utils::rng::derive_seed;

/// Rectangular (p, K) grid, inclusive of both endpoints on each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub p_min: f64,
    pub p_max: f64,
    pub p_steps: usize,
    pub k_min: f64,
    pub k_max: f64,
    pub k_steps: usize,
}

impl GridSpec {
    pub fn validate(&self) -> Result<(), ScanError> {
        if !(0.0..=1.0).contains(&self.p_min)
            || !(0.0..=1.0).contains(&self.p_max)
            || self.p_min > self.p_max
        {
            return Err(ScanError::Config(format!(
                "p range [{}, {}] must be an ordered subrange of [0, 1]",
                self.p_min, self.p_max
            )));
        }
        if !self.k_min.is_finite() || self.k_min <= 0.0 || self.k_min > self.k_max {
            return Err(ScanError::Config(format!(
                "K range [{}, {}] must be ordered and strictly positive",
                self.k_min, self.k_max
            )));
        }
        if self.p_steps == 0 || self.k_steps == 0 {
            return Err(ScanError::Config("grid resolution must be positive".into()));
        }
        Ok(())
    }

    pub fn p_values(&self) -> Vec<f64> {
        linspace(self.p_min, self.p_max, self.p_steps)
    }

    pub fn k_values(&self) -> Vec<f64> {
        linspace(self.k_min, self.k_max, self.k_steps)
    }
}

fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    if steps == 1 {
        return vec![min];
    }
    (0..steps)
        .map(|i| min + (max - min) * i as f64 / (steps - 1) as f64)
        .collect()
}

/// One classified grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDiagramPoint {
    pub p: f64,
    pub coupling: f64,
    pub label: PhaseLabel,
    pub iterations: usize,
}

/// Midpoint between two adjacent grid points whose labels disagree.
/// `from` is the label at the smaller swept coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPoint {
    pub p: f64,
    pub coupling: f64,
    pub from: PhaseLabel,
    pub to: PhaseLabel,
}

/// Classified grid, stored p-major with K varying fastest.
#[derive(Debug, Clone)]
pub struct PhaseDiagram {
    pub points: Vec<PhaseDiagramPoint>,
    p_steps: usize,
    k_steps: usize,
}

impl PhaseDiagram {
    fn at(&self, pi: usize, ki: usize) -> &PhaseDiagramPoint {
        &self.points[pi * self.k_steps + ki]
    }

    /// Boundary estimates along both axes, in deterministic row order.
    /// Pairs touching an inconclusive point are skipped: an unresolved
    /// trajectory is a hole in the diagram, not a phase boundary.
    pub fn boundaries(&self) -> Vec<BoundaryPoint> {
        let mut out = Vec::new();
        for pi in 0..self.p_steps {
            for ki in 0..self.k_steps {
                let here = self.at(pi, ki);
                if here.label == PhaseLabel::Inconclusive {
                    continue;
                }
                if ki + 1 < self.k_steps {
                    let next = self.at(pi, ki + 1);
                    if next.label != PhaseLabel::Inconclusive && next.label != here.label {
                        out.push(BoundaryPoint {
                            p: here.p,
                            coupling: (here.coupling + next.coupling) / 2.0,
                            from: here.label,
                            to: next.label,
                        });
                    }
                }
                if pi + 1 < self.p_steps {
                    let next = self.at(pi + 1, ki);
                    if next.label != PhaseLabel::Inconclusive && next.label != here.label {
                        out.push(BoundaryPoint {
                            p: (here.p + next.p) / 2.0,
                            coupling: here.coupling,
                            from: here.label,
                            to: next.label,
                        });
                    }
                }
            }
        }
        out
    }
}

/// Runs one trajectory per grid point, in parallel, and collects the
/// classified diagram. See [`scan_grid_with`] for the progress hook.
pub fn scan_grid(
    grid: &GridSpec,
    base: &TrajectoryConfig,
    master_seed: u64,
) -> Result<PhaseDiagram, ScanError> {
    scan_grid_with(grid, base, master_seed, |_| {})
}

/// [`scan_grid`] with a per-point callback (progress bars). The callback
/// runs on worker threads and must be `Sync`.
///
/// Trajectories are statistically independent; each point derives its own
/// stream from `(master_seed, point index)`, so the diagram is reproducible
/// on any thread count. A trajectory that fails mid-flow is recorded as
/// inconclusive and the sweep continues.
pub fn scan_grid_with(
    grid: &GridSpec,
    base: &TrajectoryConfig,
    master_seed: u64,
    progress: impl Fn(&PhaseDiagramPoint) + Sync,
) -> Result<PhaseDiagram, ScanError> {
    grid.validate()?;
    base.validate()?;
    let ps = grid.p_values();
    let ks = grid.k_values();
    let points: Vec<PhaseDiagramPoint> = (0..ps.len() * ks.len())
        .into_par_iter()
        .map(|idx| {
            let (pi, ki) = (idx / ks.len(), idx % ks.len());
            let mut cfg = base.clone();
            cfg.p = ps[pi];
            cfg.coupling = ks[ki];
            cfg.seed = derive_seed(master_seed, idx);
            let point = match run_trajectory(&cfg) {
                Ok(t) => PhaseDiagramPoint {
                    p: cfg.p,
                    coupling: cfg.coupling,
                    label: t.label,
                    iterations: t.iterations,
                },
                Err(_) => PhaseDiagramPoint {
                    p: cfg.p,
                    coupling: cfg.coupling,
                    label: PhaseLabel::Inconclusive,
                    iterations: 0,
                },
            };
            progress(&point);
            point
        })
        .collect();
    Ok(PhaseDiagram {
        points,
        p_steps: ps.len(),
        k_steps: ks.len(),
    })
}

/// Binary-searches the label change along K at fixed p, to precision `tol`.
///
/// Requires the endpoint labels to differ; assumes the phase regions are
/// contiguous along the axis (an assumption of the search, not a proven
/// property of the model). Returns the bracket midpoint.
pub fn bisect_coupling(
    base: &TrajectoryConfig,
    k_lo: f64,
    k_hi: f64,
    tol: f64,
    master_seed: u64,
) -> Result<f64, ScanError> {
    if !(k_lo > 0.0) || !(k_lo < k_hi) || !(tol > 0.0) {
        return Err(ScanError::Config(format!(
            "coupling bracket [{k_lo}, {k_hi}] with tolerance {tol} is malformed"
        )));
    }
    let mut evals = 0usize;
    let mut label_at = |k: f64| -> Result<PhaseLabel, ScanError> {
        let mut cfg = base.clone();
        cfg.coupling = k;
        cfg.seed = derive_seed(master_seed, evals);
        evals += 1;
        Ok(run_trajectory(&cfg)?.label)
    };
    let lo_label = label_at(k_lo)?;
    let hi_label = label_at(k_hi)?;
    if lo_label == hi_label {
        return Err(ScanError::Config(format!(
            "bracket does not straddle a boundary: both ends are {}",
            lo_label.as_str()
        )));
    }
    let (mut lo, mut hi) = (k_lo, k_hi);
    while hi - lo > tol {
        let mid = (lo + hi) / 2.0;
        if label_at(mid)? == lo_label {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok((lo + hi) / 2.0)
}

/// Binary-searches the label change along p at fixed K. Same contract as
/// [`bisect_coupling`].
pub fn bisect_probability(
    base: &TrajectoryConfig,
    p_lo: f64,
    p_hi: f64,
    tol: f64,
    master_seed: u64,
) -> Result<f64, ScanError> {
    if !(0.0..=1.0).contains(&p_lo) || !(0.0..=1.0).contains(&p_hi) || !(p_lo < p_hi) || !(tol > 0.0)
    {
        return Err(ScanError::Config(format!(
            "probability bracket [{p_lo}, {p_hi}] with tolerance {tol} is malformed"
        )));
    }
    let mut evals = 0usize;
    let mut label_at = |p: f64| -> Result<PhaseLabel, ScanError> {
        let mut cfg = base.clone();
        cfg.p = p;
        cfg.seed = derive_seed(master_seed, evals);
        evals += 1;
        Ok(run_trajectory(&cfg)?.label)
    };
    let lo_label = label_at(p_lo)?;
    let hi_label = label_at(p_hi)?;
    if lo_label == hi_label {
        return Err(ScanError::Config(format!(
            "bracket does not straddle a boundary: both ends are {}",
            lo_label.as_str()
        )));
    }
    let (mut lo, mut hi) = (p_lo, p_hi);
    while hi - lo > tol {
        let mid = (lo + hi) / 2.0;
        if label_at(mid)? == lo_label {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok((lo + hi) / 2.0)
}
