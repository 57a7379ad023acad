//! Random arrays for the bar chart.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest generated value.
pub const MIN_VALUE: u32 = 1;
/// Largest generated value.
pub const MAX_VALUE: u32 = 100;

/// Produces arrays of uniformly random values in `MIN_VALUE..=MAX_VALUE`.
pub struct ArrayGenerator {
    rng: StdRng,
}

impl ArrayGenerator {
    /// Seeded generators repeat the same sequence of arrays.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn generate(&mut self, size: usize) -> Vec<u32> {
        (0..size)
            .map(|_| self.rng.gen_range(MIN_VALUE..=MAX_VALUE))
            .collect()
    }
}
