//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the line that has not been accessed for the longest time.
//! Every way carries a stack position: 0 is the most recently used, `ways - 1`
//! the least recently used. Within a set the positions always form a
//! permutation of `0..ways`. When a way is touched, every way above it in the
//! stack slides down one position and the touched way moves to the top.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways (associativity)
//!   - `get_victim()`: O(W)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Workloads with good temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::{AccessInfo, ReplacementPolicy, Victim};
use crate::common::CacheError;

/// Per-way recency positions for every set, stored flat at `set * ways + way`.
///
/// Shared by every stack-based policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LruStack {
    positions: Vec<usize>,
    ways: usize,
}

impl LruStack {
    /// Creates stacks where way `w` starts at position `w` in every set.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroAssociativity`] when `ways` is zero.
    pub fn new(sets: usize, ways: usize) -> Result<Self, CacheError> {
        if ways == 0 {
            return Err(CacheError::ZeroAssociativity);
        }
        let positions = (0..sets).flat_map(|_| 0..ways).collect();
        Ok(Self { positions, ways })
    }

    /// Associativity the stack was built for.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Current stack position of `way` in `set`.
    #[inline(always)]
    pub fn position(&self, set: usize, way: usize) -> usize {
        self.positions[set * self.ways + way]
    }

    /// Positions of every way in `set`, indexed by way.
    pub fn set_positions(&self, set: usize) -> &[usize] {
        let base = set * self.ways;
        &self.positions[base..base + self.ways]
    }

    /// The way at the bottom of the stack (position `ways - 1`).
    pub fn lru_way(&self, set: usize) -> usize {
        let bottom = self.ways - 1;
        self.set_positions(set)
            .iter()
            .position(|&pos| pos == bottom)
            .unwrap_or(0)
    }

    /// Moves `way` to the top of the stack.
    pub fn touch(&mut self, set: usize, way: usize) {
        let base = set * self.ways;
        let current = self.positions[base + way];
        for pos in &mut self.positions[base..base + self.ways] {
            if *pos < current {
                *pos += 1;
            }
        }
        self.positions[base + way] = 0;
    }
}

/// LRU Policy state.
#[derive(Clone, Debug)]
pub struct LruPolicy {
    stack: LruStack,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroAssociativity`] when `ways` is zero.
    pub fn new(sets: usize, ways: usize) -> Result<Self, CacheError> {
        Ok(Self {
            stack: LruStack::new(sets, ways)?,
        })
    }

    /// The recency stacks.
    pub const fn stack(&self) -> &LruStack {
        &self.stack
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Returns the way at the bottom of the stack.
    fn get_victim(&mut self, set: usize, _info: &AccessInfo) -> Victim {
        Victim::Way(self.stack.lru_way(set))
    }

    /// Moves the hit or filled way to the MRU position.
    fn update(&mut self, set: usize, way: Option<usize>, _info: &AccessInfo, _hit: bool) {
        if let Some(way) = way {
            self.stack.touch(set, way);
        }
    }
}
