//! Deterministic random number generation for effect removal rolls.
//!
//! Damage can knock some debuffs off with a percentage chance. Servers run
//! with an entropy seed; tests and replays pin the seed through
//! `EffectListConfig::rng_seed`.
//!
//! ```
//! use abnormal_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_range(0..100), b.gen_range(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG from an explicit seed or, if absent, from entropy.
    #[must_use]
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random))
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random integer in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<i32>) -> i32 {
        self.inner.gen_range(range)
    }

    /// Roll a percentage chance: succeeds when `chance >= roll(0..100)`.
    ///
    /// A chance of 100 or more always succeeds; a chance of 0 succeeds
    /// only on a roll of 0.
    pub fn roll_percent(&mut self, chance: u8) -> bool {
        i32::from(chance) >= self.gen_range(0..100)
    }
}
