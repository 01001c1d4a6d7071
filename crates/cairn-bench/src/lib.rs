//! Benchmark workloads and utilities for Cairn.
//!
//! - [`shuffled_keys`]: deterministic permutation of `0..n` via seed
//! - [`factorial`]: the reference payload generator

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Element counts exercised by the container benchmarks.
pub const SIZES: [usize; 3] = [100, 1_000, 10_000];

/// A permutation of `0..n`, identical for identical seeds.
///
/// Shuffled with a seeded ChaCha8 stream so that benchmark runs are
/// comparable.
pub fn shuffled_keys(n: usize, seed: u64) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..n as u64).collect();
    keys.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    keys
}

/// `n!` with wrapping multiplication, so large inputs stay cheap and total.
pub fn factorial(n: u64) -> u64 {
    (2..=n).fold(1u64, |acc, x| acc.wrapping_mul(x))
}
