//! Cache Replacement Policies.
//!
//! Implements the algorithms that pick victim ways in set-associative caches
//! and the per-line bookkeeping they need.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (true recency stack).
//! - `Random`: Seeded pseudo-random selection.
//! - `Rwp`: Read-Write Partitioning; predicts a dirty/clean split per set.
//!
//! A cache owns exactly one [`ReplacementState`], a closed enum over the
//! policies above, so every policy a cache can hold is known at compile time.

/// Least Recently Used replacement policy and the shared recency stack.
pub mod lru;

/// Random replacement policy.
pub mod random;

/// Read-Write Partitioning replacement policy.
pub mod rwp;

pub use lru::{LruPolicy, LruStack};
pub use random::RandomPolicy;
pub use rwp::{LineClass, RwpPolicy};

use crate::common::{AccessKind, AccessSource, CacheError};
use crate::config::ReplacementPolicy as PolicyType;

/// Outcome of victim selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Victim {
    /// Evict this way and place the incoming line there.
    Way(usize),
    /// Do not place the incoming line at all.
    Bypass,
}

/// Everything the access protocol knows about the reference being serviced.
///
/// Handed to the policy on both victim selection and state updates. Fields a
/// policy does not need are simply ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessInfo {
    /// Full byte address of the reference.
    pub address: u64,
    /// Instruction pointer that issued the reference.
    pub pc: u64,
    /// Tag of the referenced line in this cache.
    pub tag: u64,
    /// Requesting core.
    pub core: usize,
    /// Kind of reference.
    pub kind: AccessKind,
    /// Where in the hierarchy the reference was issued from.
    pub source: AccessSource,
}

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim lines.
pub trait ReplacementPolicy: Send + Sync {
    /// Selects the way to evict from a full set, or declines placement.
    ///
    /// Only called when the set holds no invalid way.
    fn get_victim(&mut self, set: usize, info: &AccessInfo) -> Victim;

    /// Updates the policy state after a hit, a fill, or a bypass decision.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way that was hit or filled, `None` for a bypass.
    /// * `info` - The reference being serviced.
    /// * `hit` - `true` for a hit, `false` for a fill or bypass.
    fn update(&mut self, set: usize, way: Option<usize>, info: &AccessInfo, hit: bool);
}

/// Replacement state bound to one cache instance.
#[derive(Clone, Debug)]
pub enum ReplacementState {
    /// Least Recently Used.
    Lru(LruPolicy),
    /// Seeded random.
    Random(RandomPolicy),
    /// Read-Write Partitioning.
    Rwp(RwpPolicy),
}

impl ReplacementState {
    /// Builds the state for `policy` over a `sets` x `ways` array.
    ///
    /// `seed` is only consumed by the random policy.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroAssociativity`] when `ways` is zero.
    pub fn new(
        policy: PolicyType,
        sets: usize,
        ways: usize,
        seed: u64,
    ) -> Result<Self, CacheError> {
        Ok(match policy {
            PolicyType::Lru => Self::Lru(LruPolicy::new(sets, ways)?),
            PolicyType::Random => Self::Random(RandomPolicy::new(ways, seed)?),
            PolicyType::Rwp => Self::Rwp(RwpPolicy::new(sets, ways)?),
        })
    }

    /// The policy this state implements.
    pub const fn policy(&self) -> PolicyType {
        match self {
            Self::Lru(_) => PolicyType::Lru,
            Self::Random(_) => PolicyType::Random,
            Self::Rwp(_) => PolicyType::Rwp,
        }
    }

    /// Recency stack position of a way (0 = MRU), for stack-based policies.
    pub fn stack_position(&self, set: usize, way: usize) -> Option<usize> {
        match self {
            Self::Lru(p) => Some(p.stack().position(set, way)),
            Self::Rwp(p) => Some(p.stack().position(set, way)),
            Self::Random(_) => None,
        }
    }

    /// The RWP state, if this cache runs RWP.
    pub const fn as_rwp(&self) -> Option<&RwpPolicy> {
        match self {
            Self::Rwp(p) => Some(p),
            _ => None,
        }
    }
}

impl ReplacementPolicy for ReplacementState {
    #[inline]
    fn get_victim(&mut self, set: usize, info: &AccessInfo) -> Victim {
        match self {
            Self::Lru(p) => p.get_victim(set, info),
            Self::Random(p) => p.get_victim(set, info),
            Self::Rwp(p) => p.get_victim(set, info),
        }
    }

    #[inline]
    fn update(&mut self, set: usize, way: Option<usize>, info: &AccessInfo, hit: bool) {
        match self {
            Self::Lru(p) => p.update(set, way, info, hit),
            Self::Random(p) => p.update(set, way, info, hit),
            Self::Rwp(p) => p.update(set, way, info, hit),
        }
    }
}
