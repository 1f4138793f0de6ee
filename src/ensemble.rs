// ensemble.rs - quenched-disorder population of transfer matrices

use rand::Rng;

use crate::error::ScanError;
use crate::transfer::{SinkClass, TransferMatrix};

/// Per-generation count of matrices at each sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkCensus {
    pub ferro: usize,
    pub aferro: usize,
    pub disorder: usize,
    pub flowing: usize,
}

impl SinkCensus {
    /// Total number of matrices counted.
    pub fn total(&self) -> usize {
        self.ferro + self.aferro + self.disorder + self.flowing
    }
}

/// Empirical coupling distribution at one length scale: a fixed-size,
/// ordered collection of transfer matrices.
///
/// The size never changes along a trajectory; each RG step replaces the
/// whole population with a fresh one of the same size.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    matrices: Vec<TransferMatrix>,
}

impl Ensemble {
    /// Double-delta initial distribution: each of `size` entries is an
    /// independent +k kernel with probability `p` and a -k kernel otherwise.
    pub fn double_delta(size: usize, p: f64, k: f64, rng: &mut impl Rng) -> Self {
        let ferro = TransferMatrix::from_coupling(k);
        let aferro = TransferMatrix::from_coupling(-k);
        let matrices = (0..size)
            .map(|_| if rng.gen_bool(p) { ferro } else { aferro })
            .collect();
        Self { matrices }
    }

    /// Wraps an explicit population (tests and diagnostics).
    pub fn from_matrices(matrices: Vec<TransferMatrix>) -> Self {
        Self { matrices }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn get(&self, index: usize) -> &TransferMatrix {
        &self.matrices[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransferMatrix> {
        self.matrices.iter()
    }

    /// Draws `count` *distinct* random indices and returns the matrices at
    /// those positions. Different calls draw independently, so matrices may
    /// be reused across output samples.
    pub fn draw_distinct(
        &self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<&TransferMatrix>, ScanError> {
        if count > self.len() {
            return Err(ScanError::Config(format!(
                "cannot draw {count} distinct matrices from an ensemble of {}",
                self.len()
            )));
        }
        let picks = rand::seq::index::sample(rng, self.len(), count);
        Ok(picks.iter().map(|i| &self.matrices[i]).collect())
    }

    /// Counts the sink pattern of every matrix against the entry tolerances.
    pub fn census(&self, lower: f64, upper: f64) -> SinkCensus {
        let mut census = SinkCensus::default();
        for t in &self.matrices {
            match t.classify(lower, upper) {
                SinkClass::Ferro => census.ferro += 1,
                SinkClass::Aferro => census.aferro += 1,
                SinkClass::Disorder => census.disorder += 1,
                SinkClass::Flowing => census.flowing += 1,
            }
        }
        census
    }

    /// Welford mean and standard deviation of the finite effective
    /// couplings. Sink matrices with infinite coupling are skipped.
    pub fn coupling_stats(&self) -> (f64, f64) {
        let mut n = 0u64;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for t in &self.matrices {
            let k = t.coupling();
            if !k.is_finite() {
                continue;
            }
            n += 1;
            let delta = k - mean;
            mean += delta / n as f64;
            m2 += delta * (k - mean);
        }
        let var = if n > 1 { m2 / (n - 1) as f64 } else { 0.0 };
        (mean, var.sqrt())
    }

    /// The population with every coupling negated.
    pub fn negated(&self) -> Self {
        Self {
            matrices: self.matrices.iter().map(TransferMatrix::negated).collect(),
        }
    }
}
