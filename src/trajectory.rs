// trajectory.rs - iterate the RG map to a sink and name the phase

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::ensemble::{Ensemble, SinkCensus};
use crate::error::ScanError;
use crate::rg::{rg_step, RgGeometry, RgMode};

/// Phase read off the asymptotic ensemble pattern.
///
/// `Inconclusive` marks a trajectory that exhausted its iteration budget
/// without matching any sink template, or that was aborted by a numeric
/// failure mid-flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseLabel {
    Ferromagnetic,
    Antiferromagnetic,
    SpinGlass,
    Disordered,
    Inconclusive,
}

impl PhaseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseLabel::Ferromagnetic => "ferro",
            PhaseLabel::Antiferromagnetic => "aferro",
            PhaseLabel::SpinGlass => "spin-glass",
            PhaseLabel::Disordered => "disorder",
            PhaseLabel::Inconclusive => "inconclusive",
        }
    }
}

/// Run parameters for a single trajectory (single source of truth).
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryConfig {
    /// Number of quenched samples in every generation.
    pub lattice_size: usize,
    /// Probability of a +K bond in the initial double-delta distribution.
    pub p: f64,
    /// Dimensionless coupling strength K = J/T, strictly positive.
    pub coupling: f64,
    /// Operation ordering, fixed for the whole trajectory.
    pub mode: RgMode,
    pub geometry: RgGeometry,
    /// Hard iteration cutoff; the runner never loops past it.
    pub max_iterations: usize,
    /// Entry below this counts as 0 in the sink test.
    pub sink_lower: f64,
    /// Entry above this counts as 1 in the sink test.
    pub sink_upper: f64,
    /// Fraction of the ensemble that must sit at one sink to call the phase.
    pub sink_fraction: f64,
    /// Fraction of stragglers tolerated while calling it.
    pub stray_fraction: f64,
    /// Seed of the trajectory's private random stream.
    pub seed: u64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            lattice_size: 1000,
            p: 0.5,
            coupling: 1.0,
            mode: RgMode::BondFirst,
            geometry: RgGeometry::default(),
            max_iterations: 30,
            sink_lower: 1e-4,
            sink_upper: 0.9999,
            sink_fraction: 0.95,
            stray_fraction: 0.05,
            seed: 0,
        }
    }
}

impl TrajectoryConfig {
    /// Rejects parameters before any trajectory starts.
    pub fn validate(&self) -> Result<(), ScanError> {
        self.geometry.validate()?;
        if !(0.0..=1.0).contains(&self.p) {
            return Err(ScanError::Config(format!(
                "probability p must lie in [0, 1], got {}",
                self.p
            )));
        }
        if !self.coupling.is_finite() || self.coupling <= 0.0 {
            return Err(ScanError::Config(format!(
                "coupling K must be finite and positive, got {}",
                self.coupling
            )));
        }
        if self.lattice_size < self.geometry.draws_per_sample() {
            return Err(ScanError::Config(format!(
                "lattice size {} is smaller than the {} distinct draws one sample needs",
                self.lattice_size,
                self.geometry.draws_per_sample()
            )));
        }
        if self.max_iterations == 0 {
            return Err(ScanError::Config("iteration budget must be positive".into()));
        }
        if !(0.0 < self.sink_lower && self.sink_lower < self.sink_upper && self.sink_upper < 1.0) {
            return Err(ScanError::Config(format!(
                "sink tolerances must satisfy 0 < lower < upper < 1, got {} / {}",
                self.sink_lower, self.sink_upper
            )));
        }
        if !(0.0..=1.0).contains(&self.stray_fraction)
            || !(0.0..=1.0).contains(&self.sink_fraction)
            || self.stray_fraction >= self.sink_fraction
        {
            return Err(ScanError::Config(format!(
                "sink/stray fractions must satisfy 0 <= stray < sink <= 1, got {} / {}",
                self.stray_fraction, self.sink_fraction
            )));
        }
        Ok(())
    }
}

/// Completed trajectory: the label, how many steps it took, and the final
/// generation for diagnostics.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub label: PhaseLabel,
    /// RG iterations applied (equals the budget for inconclusive runs).
    pub iterations: usize,
    pub census: SinkCensus,
    pub ensemble: Ensemble,
}

/// Tests the aggregate census against the four sink templates.
///
/// Arms are ordered so at most one template can match: a census that reaches
/// the spin-glass arm has already failed both pure diagonal arms, so neither
/// pattern dominates and the ensemble is split between them.
pub fn classify(census: &SinkCensus, sink_fraction: f64, stray_fraction: f64) -> Option<PhaseLabel> {
    let n = census.total() as f64;
    let sink = sink_fraction * n;
    let stray = stray_fraction * n;
    let (ferro, aferro) = (census.ferro as f64, census.aferro as f64);
    let (disorder, flowing) = (census.disorder as f64, census.flowing as f64);
    if flowing > stray {
        None
    } else if ferro >= sink {
        Some(PhaseLabel::Ferromagnetic)
    } else if aferro >= sink {
        Some(PhaseLabel::Antiferromagnetic)
    } else if disorder >= sink {
        Some(PhaseLabel::Disordered)
    } else if disorder <= stray {
        Some(PhaseLabel::SpinGlass)
    } else {
        None
    }
}

/// Runs one trajectory from the double-delta start to a sink or the budget.
///
/// Pure up to consumption of the seeded stream: identical configurations
/// give bit-identical trajectories. A numeric overflow inside a step aborts
/// this trajectory as `Inconclusive` instead of propagating, so one bad
/// point cannot take down a whole boundary sweep.
pub fn run_trajectory(config: &TrajectoryConfig) -> Result<Trajectory, ScanError> {
    config.validate()?;
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
    let mut ensemble = Ensemble::double_delta(
        config.lattice_size,
        config.p,
        config.coupling,
        &mut rng,
    );
    for iteration in 1..=config.max_iterations {
        ensemble = match rg_step(&ensemble, config.mode, &config.geometry, &mut rng) {
            Ok(next) => next,
            Err(ScanError::NumericOverflow { .. }) => {
                let census = ensemble.census(config.sink_lower, config.sink_upper);
                return Ok(Trajectory {
                    label: PhaseLabel::Inconclusive,
                    iterations: iteration,
                    census,
                    ensemble,
                });
            }
            Err(err) => return Err(err),
        };
        let census = ensemble.census(config.sink_lower, config.sink_upper);
        if let Some(label) = classify(&census, config.sink_fraction, config.stray_fraction) {
            return Ok(Trajectory {
                label,
                iterations: iteration,
                census,
                ensemble,
            });
        }
    }
    let census = ensemble.census(config.sink_lower, config.sink_upper);
    Ok(Trajectory {
        label: PhaseLabel::Inconclusive,
        iterations: config.max_iterations,
        census,
        ensemble,
    })
}
