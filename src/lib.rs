//! Migdal–Kadanoff renormalization of the d=3 ±J Ising spin glass:
//! transfer-matrix ensembles, the bond-moving/decimation recursion, and
//! phase-boundary location over the (p, K) plane.

pub mod boundary;
pub mod ensemble;
pub mod error;
pub mod rg;
pub mod trajectory;
pub mod transfer;
pub mod utils;
