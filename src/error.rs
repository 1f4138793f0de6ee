// error.rs - failure modes of the renormalization core

use thiserror::Error;

/// Errors surfaced by the renormalization core.
///
/// `Config` is rejected before any trajectory starts. `NumericOverflow` is
/// recoverable: the trajectory runner aborts that one trajectory and reports
/// it as inconclusive. `DegenerateMatrix` indicates a bug in a fold or an
/// invalid input and propagates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Normalization of a matrix whose entries are all zero.
    #[error("degenerate transfer matrix: all entries are zero")]
    DegenerateMatrix,

    /// A fold produced a non-finite entry before normalization.
    #[error("non-finite value during {op}")]
    NumericOverflow {
        /// Operation that produced the non-finite value.
        op: &'static str,
    },

    /// Invalid run parameters, rejected up front.
    #[error("invalid configuration: {0}")]
    Config(String),
}
