//! Memory Reference Kinds.
//!
//! This module defines the classification of references fed into the cache
//! hierarchy. These types are used for the following:
//! 1. **Dirty Tracking:** Stores and writebacks dirty the lines they touch.
//! 2. **Replacement Bookkeeping:** Policies distinguish read reuse from writes.
//! 3. **Statistics Tracking:** Every cache keeps an occurrence count per kind.

use std::fmt;
use std::str::FromStr;

use super::error::CacheError;

/// Kind of memory reference presented to a cache.
///
/// The discriminants are the raw codes used by trace files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AccessKind {
    /// Hardware or software prefetch. Treated as a read.
    Prefetch = 0,

    /// Data load.
    Load = 1,

    /// Data store. Dirties the line.
    Store = 2,

    /// Dirty victim pushed down from a higher level. Dirties the line and
    /// does not perturb recency state on a hit.
    Writeback = 3,

    /// Instruction fetch. Treated as a read.
    InstructionFetch = 4,
}

impl AccessKind {
    /// Number of distinct access kinds.
    pub const COUNT: usize = 5;

    /// All kinds, in code order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Prefetch,
        Self::Load,
        Self::Store,
        Self::Writeback,
        Self::InstructionFetch,
    ];

    /// Returns `true` for kinds that leave the line dirty (store, writeback).
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Store | Self::Writeback)
    }

    /// Returns `true` for kinds that only read the line.
    #[inline(always)]
    pub const fn is_read(self) -> bool {
        !self.is_write()
    }

    /// Index of this kind into per-kind counter tables.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Prefetch => "prefetch",
            Self::Load => "load",
            Self::Store => "store",
            Self::Writeback => "writeback",
            Self::InstructionFetch => "ifetch",
        }
    }
}

impl TryFrom<u32> for AccessKind {
    type Error = CacheError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Prefetch),
            1 => Ok(Self::Load),
            2 => Ok(Self::Store),
            3 => Ok(Self::Writeback),
            4 => Ok(Self::InstructionFetch),
            other => Err(CacheError::InvalidAccessKind(other)),
        }
    }
}

impl FromStr for AccessKind {
    type Err = CacheError;

    /// Parses a trace mnemonic (`L`, `S`, `WB`, `I`, `P`, full names, or a
    /// numeric code). Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p" | "pf" | "prefetch" => Ok(Self::Prefetch),
            "l" | "r" | "ld" | "load" | "read" => Ok(Self::Load),
            "s" | "w" | "st" | "store" | "write" => Ok(Self::Store),
            "wb" | "writeback" => Ok(Self::Writeback),
            "i" | "if" | "ifetch" | "fetch" => Ok(Self::InstructionFetch),
            other => match other.parse::<u32>() {
                Ok(code) => Self::try_from(code),
                Err(_) => Err(CacheError::UnknownAccessMnemonic(s.to_owned())),
            },
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where in the hierarchy an access was issued from.
///
/// Passed through the access protocol to the replacement policy untouched;
/// policies may use it to tell demand traffic from writeback traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessSource {
    /// Issued directly against a single cache, outside any hierarchy.
    #[default]
    Direct,
    /// Demand access into the private L1.
    L1Demand,
    /// Lookup-only probe of the private L2 after an L1 miss.
    L2Probe,
    /// Lookup-only probe of the shared L3 after an L2 miss.
    L3Probe,
    /// L1 victim written back into the L2.
    L1Victim,
    /// L2 victim (produced by an L1 writeback) written back into the L3.
    L2Victim,
    /// L2 victim produced by the demand probe, written back into the L3.
    L2ProbeVictim,
}

/// One memory reference as delivered by the trace driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Physical byte address.
    pub address: u64,
    /// Instruction pointer that issued the reference.
    pub pc: u64,
    /// Size of the reference in bytes. Bookkeeping only.
    pub size: u32,
    /// Kind of reference.
    pub kind: AccessKind,
    /// Issuing core.
    pub core: usize,
}

impl Reference {
    /// Creates a reference.
    pub const fn new(address: u64, pc: u64, size: u32, kind: AccessKind, core: usize) -> Self {
        Self {
            address,
            pc,
            size,
            kind,
            core,
        }
    }

    /// The writeback of a victim line triggered while servicing this reference.
    ///
    /// Keeps the originating pc, size and core.
    pub const fn writeback_of(&self, victim_address: u64) -> Self {
        Self {
            address: victim_address,
            kind: AccessKind::Writeback,
            ..*self
        }
    }
}
