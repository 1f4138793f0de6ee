use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Independent deterministic stream for one trajectory of a sweep.
///
/// Mixes the master seed with the point index through a splitmix64
/// finalizer, so neighbouring indices land on uncorrelated ChaCha streams
/// and any subset of points reproduces identically regardless of which
/// worker thread runs it.
pub fn trajectory_rng(master: u64, index: usize) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_seed(master, index))
}

/// The seed `trajectory_rng` would use, for callers that build their own
/// configuration per point.
pub fn derive_seed(master: u64, index: usize) -> u64 {
    let mut x = master ^ ((index as u64).wrapping_mul(0x9E3779B97F4A7C15));
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
