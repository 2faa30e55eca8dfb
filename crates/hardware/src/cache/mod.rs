//! Set-Associative Cache Instance.
//!
//! This module implements one level of the simulated hierarchy: an array of
//! block metadata (no data is stored), the counters collectors read, and the
//! single-level access protocol. A miss picks the first invalid way; if the
//! set is full the bound replacement policy chooses a victim or declines
//! placement. Evicted lines report a writeback address according to the
//! configured [`WritebackRule`].

/// Cache replacement policy implementations (LRU, Random, RWP).
pub mod policies;

use tracing::{debug, trace};

use self::policies::{AccessInfo, ReplacementPolicy, ReplacementState, Victim};
use crate::common::{AccessKind, AccessSource, AddressCodec, CacheError, Reference};
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType, WritebackRule};

/// Associativity at which the legacy writeback rule stops signalling clean
/// evictions.
const LEGACY_LLC_WAYS: usize = 16;

/// Metadata for one cache block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Tag of the resident line.
    pub tag: u64,
    /// Whether the block holds a line.
    pub valid: bool,
    /// Whether the line was written since it was filled.
    pub dirty: bool,
    /// Instruction pointer of the reference that filled the block.
    pub filling_pc: u64,
    /// Byte offset of the reference that filled the block.
    pub offset: u64,
}

/// Raw event counters of one cache instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// References presented to the cache, probes included.
    pub accesses: u64,
    /// References that found no matching valid block.
    pub misses: u64,
    /// Blocks removed by [`Cache::invalidate`].
    pub invalidations: u64,
    /// References per [`AccessKind`], indexed by [`AccessKind::index`].
    pub per_kind: [u64; AccessKind::COUNT],
}

impl CacheCounters {
    /// Number of references of one kind.
    pub const fn kind(&self, kind: AccessKind) -> u64 {
        self.per_kind[kind.index()]
    }

    /// References that hit.
    pub const fn hits(&self) -> u64 {
        self.accesses - self.misses
    }

    /// Fraction of references that hit, 0.0 when idle.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits() as f64 / self.accesses as f64
        }
    }

    /// Fraction of references that missed, 0.0 when idle.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }
}

/// Result of a single-level access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// `true` if a valid block with the matching tag was found.
    pub hit: bool,
    /// Block-aligned address of the evicted line that must be written back.
    pub writeback: Option<u64>,
}

impl AccessOutcome {
    const HIT: Self = Self {
        hit: true,
        writeback: None,
    };

    const fn miss(writeback: Option<u64>) -> Self {
        Self {
            hit: false,
            writeback,
        }
    }

    /// `true` for every non-hit outcome, bypasses and probe-only misses included.
    pub const fn is_miss(&self) -> bool {
        !self.hit
    }
}

/// Set-associative cache holding block metadata and its replacement state.
///
/// Blocks are stored flat at `set * ways + way`.
#[derive(Clone, Debug)]
pub struct Cache {
    blocks: Vec<Block>,
    codec: AddressCodec,
    sets: usize,
    ways: usize,
    line_bytes: usize,
    writeback_rule: WritebackRule,
    repl: ReplacementState,
    counters: CacheCounters,
}

impl Cache {
    /// Creates a cache from its configuration.
    ///
    /// # Errors
    ///
    /// Fails if the set count or block size is not a power of two, or if the
    /// cache has no ways.
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let repl = ReplacementState::new(
            config.policy,
            config.sets,
            config.ways,
            config.random_seed,
        )?;
        let codec = AddressCodec::new(config.sets, config.line_bytes, config.set_shift)?;
        Ok(Self {
            blocks: vec![Block::default(); config.sets * config.ways],
            codec,
            sets: config.sets,
            ways: config.ways,
            line_bytes: config.line_bytes,
            writeback_rule: config.writeback_rule,
            repl,
            counters: CacheCounters::default(),
        })
    }

    /// Creates a cache from raw geometry with default seed and writeback rule.
    ///
    /// # Errors
    ///
    /// Same as [`Cache::new`].
    pub fn with_geometry(
        sets: usize,
        ways: usize,
        line_bytes: usize,
        policy: PolicyType,
        set_shift: u32,
    ) -> Result<Self, CacheError> {
        Self::new(&CacheConfig {
            sets,
            ways,
            line_bytes,
            policy,
            set_shift,
            ..CacheConfig::default()
        })
    }

    /// Presents one reference to this cache.
    ///
    /// On a hit, stores and writebacks dirty the block and every kind except
    /// writeback refreshes the replacement state. On a miss with `place` set,
    /// the line is installed in the first invalid way or in the victim the
    /// policy picks; with `place` clear the cache is only probed.
    ///
    /// # Arguments
    ///
    /// * `reference` - The reference being serviced.
    /// * `place` - Whether a miss installs the line.
    /// * `source` - Provenance tag forwarded to the replacement policy.
    pub fn access(
        &mut self,
        reference: &Reference,
        place: bool,
        source: AccessSource,
    ) -> AccessOutcome {
        let kind = reference.kind;
        self.counters.per_kind[kind.index()] += 1;
        self.counters.accesses += 1;

        let decoded = self.codec.decode(reference.address);
        let set = decoded.set;
        let base = set * self.ways;
        let info = AccessInfo {
            address: reference.address,
            pc: reference.pc,
            tag: decoded.tag,
            core: reference.core,
            kind,
            source,
        };

        if let Some(way) = self.lookup(set, decoded.tag) {
            if kind.is_write() {
                self.blocks[base + way].dirty = true;
            }
            if kind != AccessKind::Writeback {
                self.repl.update(set, Some(way), &info, true);
            }
            trace!(address = reference.address, set, way, %kind, "hit");
            return AccessOutcome::HIT;
        }

        self.counters.misses += 1;
        if !place {
            trace!(address = reference.address, set, %kind, "probe miss");
            return AccessOutcome::miss(None);
        }

        let victim = match self.blocks[base..base + self.ways]
            .iter()
            .position(|block| !block.valid)
        {
            Some(way) => Victim::Way(way),
            None => self.repl.get_victim(set, &info),
        };

        match victim {
            Victim::Way(way) => {
                let writeback = self.writeback_address(set, way);
                if let Some(victim_address) = writeback {
                    debug!(
                        victim = victim_address,
                        address = reference.address,
                        set,
                        way,
                        "eviction writes back"
                    );
                }
                self.blocks[base + way] = Block {
                    tag: decoded.tag,
                    valid: true,
                    dirty: kind.is_write(),
                    filling_pc: reference.pc,
                    offset: decoded.offset,
                };
                self.repl.update(set, Some(way), &info, false);
                AccessOutcome::miss(writeback)
            }
            Victim::Bypass => {
                debug!(address = reference.address, set, "policy bypassed fill");
                self.repl.update(set, None, &info, false);
                AccessOutcome::miss(None)
            }
        }
    }

    /// Removes the line holding `address`, if resident.
    ///
    /// Returns `true` when a block was invalidated. The replacement state is
    /// left untouched; the emptied way is refilled before any victim is chosen.
    pub fn invalidate(&mut self, address: u64) -> bool {
        let decoded = self.codec.decode(address);
        match self.lookup(decoded.set, decoded.tag) {
            Some(way) => {
                self.blocks[decoded.set * self.ways + way].valid = false;
                self.counters.invalidations += 1;
                trace!(address, set = decoded.set, way, "invalidated");
                true
            }
            None => false,
        }
    }

    /// Checks residency without touching counters or replacement state.
    pub fn contains(&self, address: u64) -> bool {
        self.find(address).is_some()
    }

    /// Locates the `(set, way)` holding `address`.
    pub fn find(&self, address: u64) -> Option<(usize, usize)> {
        let decoded = self.codec.decode(address);
        self.lookup(decoded.set, decoded.tag)
            .map(|way| (decoded.set, way))
    }

    /// Metadata of one block.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    pub fn block(&self, set: usize, way: usize) -> &Block {
        &self.blocks[set * self.ways + way]
    }

    /// Event counters.
    pub const fn counters(&self) -> &CacheCounters {
        &self.counters
    }

    /// Zeroes the event counters, keeping contents and replacement state.
    pub fn reset_counters(&mut self) {
        self.counters = CacheCounters::default();
    }

    /// Replacement state bound to this cache.
    pub const fn replacement(&self) -> &ReplacementState {
        &self.repl
    }

    /// Address codec for this geometry.
    pub const fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Block size in bytes.
    pub const fn line_bytes(&self) -> usize {
        self.line_bytes
    }

    #[inline(always)]
    fn lookup(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.ways;
        self.blocks[base..base + self.ways]
            .iter()
            .position(|block| block.valid && block.tag == tag)
    }

    /// Address to write back if the block at `(set, way)` is evicted.
    fn writeback_address(&self, set: usize, way: usize) -> Option<u64> {
        let block = &self.blocks[set * self.ways + way];
        let signals = match self.writeback_rule {
            WritebackRule::DirtyOnly => block.dirty,
            WritebackRule::Legacy => block.dirty || self.ways != LEGACY_LLC_WAYS,
        };
        (block.valid && signals).then(|| self.codec.block_address(block.tag, set))
    }
}
