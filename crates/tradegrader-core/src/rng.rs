//! Random number generator abstraction for determinism.
//!
//! The heuristic grader draws its score jitter from a [`DeterministicRng`];
//! production wires in [`OsSeededRng`], tests inject a scripted sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `i32` in the range `[min, max]` inclusive.
    fn next_i32_range(&mut self, min: i32, max: i32) -> i32;
}

/// Production RNG seeded from the operating system.
#[derive(Debug)]
pub struct OsSeededRng(StdRng);

impl OsSeededRng {
    /// Creates an RNG seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Creates an RNG with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for OsSeededRng {
    fn default() -> Self {
        Self::new()
    }
}

impl DeterministicRng for OsSeededRng {
    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        self.0.random_range(min..=max)
    }
}
