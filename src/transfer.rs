// transfer.rs - 2x2 transfer matrix of a single ±J bond

use nalgebra::Matrix2;

use crate::error::ScanError;

/// Asymptotic pattern a single matrix has (or has not) reached.
///
/// An entry counts as 0 below the `lower` tolerance and as 1 above the
/// `upper` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkClass {
    /// Unit diagonal, vanishing off-diagonal: strong +J bond.
    Ferro,
    /// Vanishing diagonal, unit off-diagonal: strong -J bond.
    Aferro,
    /// All entries equal: zero effective coupling.
    Disorder,
    /// Not yet within tolerance of any sink.
    Flowing,
}

/// Statistical weight of one bond: T(s, s') = exp(K s s') up to
/// normalization, with row/column 0 standing for spin +1.
///
/// Entries are finite and non-negative; a normalized matrix has maximum
/// entry 1. All operations are pure and return new values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferMatrix(Matrix2<f64>);

impl TransferMatrix {
    /// Kernel for the dimensionless coupling k = J/T, already normalized.
    ///
    /// Built directly in normalized form (diagonal 1, off-diagonal
    /// exp(-2|k|), mirrored for k < 0), so no entry can overflow for any
    /// finite k.
    pub fn from_coupling(k: f64) -> Self {
        let q = (-2.0 * k.abs()).exp();
        if k >= 0.0 {
            Self(Matrix2::new(1.0, q, q, 1.0))
        } else {
            Self(Matrix2::new(q, 1.0, 1.0, q))
        }
    }

    /// The zero-coupling kernel (all entries 1).
    pub fn uniform() -> Self {
        Self(Matrix2::from_element(1.0))
    }

    /// Entry at (row, col); row/column 0 is spin +1.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    /// Entrywise product at matching spin pairs (bond-moving primitive).
    pub fn elementwise(&self, rhs: &Self) -> Self {
        Self(self.0.component_mul(&rhs.0))
    }

    /// Matrix product summed over the shared spin (decimation primitive).
    pub fn matmul(&self, rhs: &Self) -> Self {
        Self(self.0 * rhs.0)
    }

    /// Largest entry.
    pub fn max_entry(&self) -> f64 {
        self.0.max()
    }

    /// Divides all entries by the maximum entry.
    ///
    /// Fails with [`ScanError::DegenerateMatrix`] when the maximum is not
    /// strictly positive (all-zero input, or NaN poisoning) and with
    /// [`ScanError::NumericOverflow`] when it is infinite.
    pub fn normalized(&self) -> Result<Self, ScanError> {
        let max = self.max_entry();
        if !(max > 0.0) {
            return Err(ScanError::DegenerateMatrix);
        }
        if !max.is_finite() {
            return Err(ScanError::NumericOverflow { op: "normalize" });
        }
        Ok(Self(self.0 / max))
    }

    /// Effective dimensionless coupling ln(t00 / t01) / 2.
    ///
    /// ±∞ at the ferro/aferro sinks where one of the two entries is zero.
    pub fn coupling(&self) -> f64 {
        (self.get(0, 0) / self.get(0, 1)).ln() / 2.0
    }

    /// Image under J -> -J: relabels one of the two spin states, which
    /// swaps the rows of the kernel.
    pub fn negated(&self) -> Self {
        Self(Matrix2::new(
            self.get(1, 0),
            self.get(1, 1),
            self.get(0, 0),
            self.get(0, 1),
        ))
    }

    /// True when every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    /// Sink test against the (lower, upper) entry tolerances.
    pub fn classify(&self, lower: f64, upper: f64) -> SinkClass {
        let diag = self.get(0, 0);
        let off = self.get(0, 1);
        if diag > upper && off < lower {
            SinkClass::Ferro
        } else if diag < lower && off > upper {
            SinkClass::Aferro
        } else if diag > upper && off > upper {
            SinkClass::Disorder
        } else {
            SinkClass::Flowing
        }
    }
}
