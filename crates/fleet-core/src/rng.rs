//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! A run owns exactly one root [`SimRng`] seeded from `FleetConfig::seed`.
//! Components that need their own stream (fleet seeding, the registry's
//! random bike choice at a station) derive a child with [`SimRng::child`],
//! so adding draws in one component does not shift the sequence seen by
//! another.  The scheduler is single-threaded, so draw order is fixed by
//! event order, which is itself fixed by `(time, insertion seq)`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded simulation-level RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Index of a uniformly chosen element of a collection of length `len`.
    /// Returns `None` if `len == 0`.
    #[inline]
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.0.gen_range(0..len))
    }

    /// Choose a random element from a slice.  Returns `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng(..)")
    }
}
