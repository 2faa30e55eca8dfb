//! Random Replacement Policy.
//!
//! This policy evicts a pseudo-random way from the set. Each cache owns its
//! own xorshift generator seeded from configuration, so two hierarchies built
//! from the same configuration replay identical victim sequences.

use super::{AccessInfo, ReplacementPolicy, Victim};
use crate::common::CacheError;

/// Fallback seed; xorshift never leaves the all-zero state.
const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random Policy state.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    /// Number of ways in the cache.
    ways: usize,
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance.
    ///
    /// # Arguments
    ///
    /// * `ways` - The associativity (number of ways) of the cache.
    /// * `seed` - Generator seed. Zero is replaced by a fixed non-zero constant.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroAssociativity`] when `ways` is zero.
    pub const fn new(ways: usize, seed: u64) -> Result<Self, CacheError> {
        if ways == 0 {
            return Err(CacheError::ZeroAssociativity);
        }
        Ok(Self {
            ways,
            state: if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed },
        })
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Maps the next generator output onto a way. Never bypasses.
    fn get_victim(&mut self, _set: usize, _info: &AccessInfo) -> Victim {
        Victim::Way((self.next() % self.ways as u64) as usize)
    }

    /// Access patterns do not affect the state.
    fn update(&mut self, _set: usize, _way: Option<usize>, _info: &AccessInfo, _hit: bool) {}
}
