//! Read-Write Partitioning (RWP) Replacement Policy.
//!
//! RWP splits every set logically into a dirty partition (lines last written)
//! and a clean partition (lines last read). A single prediction, shared by all
//! sets of the cache, says how many ways a set should devote to dirty lines.
//! On a miss the policy evicts from whichever partition is over its share,
//! using recency order inside the partition.
//!
//! The prediction comes from two histograms indexed by recency stack position.
//! A read hit on a dirty-classified line bumps `dirty_count[pos]`; a read hit
//! on a clean-classified line bumps `clean_count[pos]`. After every update the
//! partition point `p` maximising
//!
//! ```text
//! sum(dirty_count[0..p]) + sum(clean_count[p..ways])
//! ```
//!
//! becomes the new prediction. The scan runs from `p = 0` upward and only
//! replaces the best on a strictly greater score, so ties resolve to the
//! smallest `p`.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W)
//!   - `get_victim()`: O(W)
//! - **Space Complexity:** O(S × W) line state plus O(W) histograms

use tracing::trace;

use super::lru::LruStack;
use super::{AccessInfo, ReplacementPolicy, Victim};
use crate::common::CacheError;

/// Partition a line currently belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineClass {
    /// Never filled or touched since construction.
    #[default]
    Unclassified,
    /// Last filled or hit by a read.
    Clean,
    /// Last filled or hit by a store or writeback.
    Dirty,
}

/// RWP Policy state.
#[derive(Clone, Debug)]
pub struct RwpPolicy {
    stack: LruStack,
    /// Partition of every line, flat at `set * ways + way`.
    class: Vec<LineClass>,
    /// Dirty-classified lines per set.
    dirty_lines: Vec<usize>,
    /// Read reuse of dirty-classified lines, by stack position.
    dirty_count: Vec<u64>,
    /// Read reuse of clean-classified lines, by stack position.
    clean_count: Vec<u64>,
    /// Predicted number of ways per set that should hold dirty lines.
    predicted_dirty: usize,
}

impl RwpPolicy {
    /// Creates a new RWP policy instance with every line unclassified.
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
            class: vec![LineClass::Unclassified; sets * ways],
            dirty_lines: vec![0; sets],
            dirty_count: vec![0; ways],
            clean_count: vec![0; ways],
            predicted_dirty: 0,
        })
    }

    /// The recency stacks.
    pub const fn stack(&self) -> &LruStack {
        &self.stack
    }

    /// Current predicted dirty partition size.
    pub const fn predicted_dirty_lines(&self) -> usize {
        self.predicted_dirty
    }

    /// Number of dirty-classified lines in `set`.
    pub fn dirty_lines(&self, set: usize) -> usize {
        self.dirty_lines[set]
    }

    /// Partition of a single line.
    pub fn line_class(&self, set: usize, way: usize) -> LineClass {
        self.class[set * self.stack.ways() + way]
    }

    /// Dirty-line read reuse histogram, indexed by stack position.
    pub fn dirty_histogram(&self) -> &[u64] {
        &self.dirty_count
    }

    /// Clean-line read reuse histogram, indexed by stack position.
    pub fn clean_histogram(&self) -> &[u64] {
        &self.clean_count
    }

    /// Least recently used way in `set` whose dirtiness equals `dirty`.
    fn lru_in_partition(&self, set: usize, dirty: bool) -> Option<usize> {
        let base = set * self.stack.ways();
        self.stack
            .set_positions(set)
            .iter()
            .enumerate()
            .filter(|&(way, _)| (self.class[base + way] == LineClass::Dirty) == dirty)
            .max_by_key(|&(_, &pos)| pos)
            .map(|(way, _)| way)
    }

    /// Moves a line into `class`, keeping the per-set dirty count in step.
    fn reclassify(&mut self, set: usize, way: usize, class: LineClass) {
        let idx = set * self.stack.ways() + way;
        let was_dirty = self.class[idx] == LineClass::Dirty;
        let is_dirty = class == LineClass::Dirty;
        if is_dirty && !was_dirty {
            self.dirty_lines[set] += 1;
        } else if was_dirty && !is_dirty {
            self.dirty_lines[set] -= 1;
        }
        self.class[idx] = class;
    }

    /// Re-derives the partition point from the reuse histograms.
    fn recompute_prediction(&mut self) {
        let mut dirty_below: u64 = 0;
        let mut clean_above: u64 = self.clean_count.iter().sum();
        let mut best_score = dirty_below + clean_above;
        let mut best = 0;

        for p in 1..=self.stack.ways() {
            dirty_below += self.dirty_count[p - 1];
            clean_above -= self.clean_count[p - 1];
            let score = dirty_below + clean_above;
            if score > best_score {
                best_score = score;
                best = p;
            }
        }

        if best != self.predicted_dirty {
            trace!(
                from = self.predicted_dirty,
                to = best,
                "rwp partition moved"
            );
        }
        self.predicted_dirty = best;
    }
}

impl ReplacementPolicy for RwpPolicy {
    /// Evicts the LRU clean line while the set is short of its dirty share,
    /// otherwise the LRU dirty line. An empty partition falls back to the LRU
    /// line of the whole set.
    fn get_victim(&mut self, set: usize, _info: &AccessInfo) -> Victim {
        let evict_clean = self.dirty_lines[set] < self.predicted_dirty;
        let way = self
            .lru_in_partition(set, !evict_clean)
            .unwrap_or_else(|| self.stack.lru_way(set));
        Victim::Way(way)
    }

    fn update(&mut self, set: usize, way: Option<usize>, info: &AccessInfo, hit: bool) {
        let Some(way) = way else {
            return;
        };

        if info.kind.is_write() {
            self.reclassify(set, way, LineClass::Dirty);
        } else {
            if hit {
                let pos = self.stack.position(set, way);
                match self.line_class(set, way) {
                    LineClass::Dirty => self.dirty_count[pos] += 1,
                    LineClass::Clean => self.clean_count[pos] += 1,
                    LineClass::Unclassified => {}
                }
            }
            self.reclassify(set, way, LineClass::Clean);
        }

        self.stack.touch(set, way);
        self.recompute_prediction();
    }
}
