//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct wraps the `rand` crate's `StdRng` and
//! exposes exactly the draw primitives the genetic operators need: a uniform
//! probability draw, a uniform index draw, and a distinct-index sample for
//! tournament selection.
//!
//! Seeded construction makes solver runs reproducible in tests.
//!
//! ## Example
//!
//! ```rust
//! use rouleur::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let idx = rng.index(10);
//! assert!(idx < 10);
//! ```

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

/// A seedable random number generator for the genetic operators.
#[derive(Clone)]
pub struct RandomNumberGenerator {
    rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new generator with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a uniform `f64` in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Draws `true` with probability `p`.
    ///
    /// `p` must be in `[0, 1]`; the solver validates its probabilities before
    /// any draw happens.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    /// Draws a uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Draws a uniform integer in `[low, high]` inclusive.
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }

    /// Samples `amount` distinct indices from `[0, len)`, in random order.
    ///
    /// `amount` must not exceed `len`.
    pub fn sample(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, len, amount).into_vec()
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
