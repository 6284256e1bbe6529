use rand::prelude::*;
use rand::rngs::SmallRng;
use web_time::{SystemTime, UNIX_EPOCH};

/// Source of every random decision the engine makes: mine scatter, rebalance
/// swaps and hint selection.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn next_int(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "next_int called with an empty range");
        let picked = (self.next_float() * bound as f64) as usize;
        picked.min(bound - 1)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }

    fn next_int(&mut self, bound: usize) -> usize {
        (**self).next_int(bound)
    }
}

/// Default random source, a seedable xoshiro generator.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    /// Deterministic generator, same seed gives the same games.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the wall clock.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        log::debug!("seed: {}", seed);
        Self::seed_from_u64(seed)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_clock()
    }
}

impl RandomSource for GameRng {
    fn next_float(&mut self) -> f64 {
        self.inner.random()
    }

    fn next_int(&mut self, bound: usize) -> usize {
        self.inner.random_range(0..bound)
    }
}
