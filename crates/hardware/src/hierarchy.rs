//! Three-level cache hierarchy.
//!
//! Private L1 and L2 per core in front of one shared L3. A reference is
//! serviced as follows:
//! 1. **L1 demand:** The L1 is accessed with placement; a hit ends the reference.
//! 2. **Lower probes:** On an L1 miss the L2, and on an L2 miss the L3, are
//!    probed without placement. The line now lives in L1, so it is invalidated
//!    from the L2 (and from the L3 after a full miss).
//! 3. **Writeback cascade:** A dirty L1 victim is installed in the L2, and any
//!    victim that fill evicts is installed in the L3.
//!
//! Every condition encountered sets one bit in the returned [`MissMask`].

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use tracing::debug;

use crate::cache::Cache;
use crate::common::{AccessSource, CacheError, Reference};
use crate::config::HierarchyConfig;

/// Summary of what happened while servicing one reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MissMask(u32);

impl MissMask {
    /// Nothing missed and nothing was written back.
    pub const NONE: Self = Self(0);
    /// The reference missed in its private L1.
    pub const L1_DEMAND_MISS: Self = Self(1 << 0);
    /// The reference also missed in its private L2.
    pub const L2_DEMAND_MISS: Self = Self(1 << 1);
    /// The shared L3 missed, on the demand probe or on a writeback fill.
    pub const L3_DEMAND_MISS: Self = Self(1 << 2);
    /// The L1 fill evicted a line that was written back into the L2.
    pub const L1_WRITEBACK: Self = Self(1 << 3);
    /// An L2 victim was written back into the L3.
    pub const L2_WRITEBACK: Self = Self(1 << 4);
    /// A second L2 victim was written back into the L3 for the same reference.
    pub const L2_SECOND_WRITEBACK: Self = Self(1 << 5);
    /// An L3 victim was written back to memory.
    pub const L3_WRITEBACK: Self = Self(1 << 6);
    /// A second L3 victim was written back to memory for the same reference.
    pub const L3_SECOND_WRITEBACK: Self = Self(1 << 7);

    /// Every flag with its report name, in bit order.
    pub const FLAGS: [(Self, &'static str); 8] = [
        (Self::L1_DEMAND_MISS, "l1.demand_miss"),
        (Self::L2_DEMAND_MISS, "l2.demand_miss"),
        (Self::L3_DEMAND_MISS, "l3.demand_miss"),
        (Self::L1_WRITEBACK, "l1.writeback"),
        (Self::L2_WRITEBACK, "l2.writeback"),
        (Self::L2_SECOND_WRITEBACK, "l2.second_writeback"),
        (Self::L3_WRITEBACK, "l3.writeback"),
        (Self::L3_SECOND_WRITEBACK, "l3.second_writeback"),
    ];

    /// Builds a mask from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// `true` if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// `true` if no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sets the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for MissMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MissMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for MissMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("hit");
        }
        let mut first = true;
        for (flag, name) in Self::FLAGS {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Private L1/L2 per core and a shared L3.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    l1: Vec<Cache>,
    l2: Vec<Cache>,
    l3: Cache,
}

impl Hierarchy {
    /// Builds `config.cores` L1/L2 pairs and one L3.
    ///
    /// # Errors
    ///
    /// Propagates any geometry error from the individual caches.
    pub fn new(config: &HierarchyConfig) -> Result<Self, CacheError> {
        let l1 = (0..config.cores)
            .map(|_| Cache::new(&config.l1))
            .collect::<Result<Vec<_>, _>>()?;
        let l2 = (0..config.cores)
            .map(|_| Cache::new(&config.l2))
            .collect::<Result<Vec<_>, _>>()?;
        let l3 = Cache::new(&config.l3)?;
        Ok(Self { l1, l2, l3 })
    }

    /// Services one reference and reports what happened.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::CoreOutOfRange`] if `reference.core` has no
    /// private caches.
    pub fn memory_access(&mut self, reference: &Reference) -> Result<MissMask, CacheError> {
        let core = reference.core;
        let cores = self.l1.len();
        if core >= cores {
            return Err(CacheError::CoreOutOfRange { core, cores });
        }
        let (l1, l2, l3) = (&mut self.l1[core], &mut self.l2[core], &mut self.l3);
        let mut mask = MissMask::NONE;

        let l1_outcome = l1.access(reference, true, AccessSource::L1Demand);
        if l1_outcome.hit {
            return Ok(mask);
        }
        mask |= MissMask::L1_DEMAND_MISS;

        let l2_probe = l2.access(reference, false, AccessSource::L2Probe);
        if l2_probe.is_miss() {
            mask |= MissMask::L2_DEMAND_MISS;
            if l3.access(reference, false, AccessSource::L3Probe).is_miss() {
                mask |= MissMask::L3_DEMAND_MISS;
            }
            let _ = l3.invalidate(reference.address);
            let _ = l2.invalidate(reference.address);
        } else {
            let _ = l2.invalidate(reference.address);
        }

        if let Some(wb1) = l1_outcome.writeback {
            mask |= MissMask::L1_WRITEBACK;
            let l2_fill = l2.access(&reference.writeback_of(wb1), true, AccessSource::L1Victim);
            if let Some(wb2) = l2_fill.writeback {
                mask |= MissMask::L2_WRITEBACK;
                let l3_fill = l3.access(&reference.writeback_of(wb2), true, AccessSource::L2Victim);
                if l3_fill.writeback.is_some() {
                    mask |= MissMask::L3_WRITEBACK;
                }
                if l3_fill.is_miss() {
                    mask |= MissMask::L3_DEMAND_MISS;
                }
            }
        }

        if let Some(wb2) = l2_probe.writeback {
            mask |= if mask.contains(MissMask::L2_WRITEBACK) {
                MissMask::L2_SECOND_WRITEBACK
            } else {
                MissMask::L2_WRITEBACK
            };
            let l3_fill = l3.access(
                &reference.writeback_of(wb2),
                true,
                AccessSource::L2ProbeVictim,
            );
            if l3_fill.writeback.is_some() {
                mask |= if mask.contains(MissMask::L3_WRITEBACK) {
                    MissMask::L3_SECOND_WRITEBACK
                } else {
                    MissMask::L3_WRITEBACK
                };
            }
            if l3_fill.is_miss() {
                mask |= MissMask::L3_DEMAND_MISS;
            }
        }

        debug!(address = reference.address, core, %mask, "memory access");
        Ok(mask)
    }

    /// Number of cores.
    pub fn cores(&self) -> usize {
        self.l1.len()
    }

    /// Private L1 of `core`.
    pub fn l1(&self, core: usize) -> Option<&Cache> {
        self.l1.get(core)
    }

    /// Private L2 of `core`.
    pub fn l2(&self, core: usize) -> Option<&Cache> {
        self.l2.get(core)
    }

    /// Shared L3.
    pub const fn l3(&self) -> &Cache {
        &self.l3
    }

    /// Zeroes the counters of every cache.
    pub fn reset_counters(&mut self) {
        self.l1
            .iter_mut()
            .chain(self.l2.iter_mut())
            .chain(std::iter::once(&mut self.l3))
            .for_each(Cache::reset_counters);
    }
}
