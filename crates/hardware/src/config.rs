//! Configuration system for the cache hierarchy simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline geometry for each level of the hierarchy.
//! 2. **Structures:** Hierarchical config for general options, the hierarchy and each cache.
//! 3. **Enums:** Replacement policy and writeback signalling rule.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or use `Config::default()`.

use std::str::FromStr;

use serde::Deserialize;

use crate::common::CacheError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default block size in bytes.
    pub const LINE_BYTES: usize = 64;

    /// Default number of cores (private L1/L2 pairs).
    pub const CORES: usize = 1;

    /// L1: 32 KiB, 8-way.
    pub const L1_SETS: usize = 64;
    /// L1 associativity.
    pub const L1_WAYS: usize = 8;

    /// L2: 256 KiB, 8-way.
    pub const L2_SETS: usize = 512;
    /// L2 associativity.
    pub const L2_WAYS: usize = 8;

    /// L3: 2 MiB, 16-way, shared.
    pub const L3_SETS: usize = 2048;
    /// L3 associativity.
    pub const L3_WAYS: usize = 16;

    /// Seed for the random replacement generator.
    pub const RANDOM_SEED: u64 = 123456789;

    /// Reference size assumed when a trace line omits it.
    pub const ACCESS_SIZE: u32 = 8;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which way to evict when a new
/// line must be installed in a full set.
///
/// Names are matched case-insensitively through [`FromStr`], both in JSON and
/// on the command line; an unknown name yields [`CacheError::UnknownPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ReplacementPolicy {
    /// Least Recently Used.
    ///
    /// Evicts the way at the bottom of the recency stack.
    #[default]
    Lru,
    /// Random replacement from a seeded per-cache generator.
    Random,
    /// Read-write partitioning.
    ///
    /// Predicts how many ways of each set should hold dirty lines and evicts
    /// from whichever partition exceeds its share.
    Rwp,
}

impl FromStr for ReplacementPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(Self::Lru),
            "random" | "rand" => Ok(Self::Random),
            "rwp" => Ok(Self::Rwp),
            _ => Err(CacheError::UnknownPolicy(s.to_owned())),
        }
    }
}

impl TryFrom<String> for ReplacementPolicy {
    type Error = CacheError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Which evictions report a writeback address to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WritebackRule {
    /// Only valid dirty victims are written back.
    #[default]
    DirtyOnly,
    /// Valid victims are written back when dirty or when the cache is not
    /// 16-way, so clean evictions from the private levels still travel down.
    Legacy,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use rwpsim_core::config::{Config, ReplacementPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.hierarchy.cores, 1);
/// assert_eq!(config.hierarchy.l3.policy, ReplacementPolicy::Rwp);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use rwpsim_core::config::{Config, ReplacementPolicy, WritebackRule};
///
/// let json = r#"{
///     "general": { "stats_sections": ["hierarchy"] },
///     "hierarchy": {
///         "cores": 2,
///         "l1": { "sets": 16, "ways": 2, "policy": "LRU" },
///         "l2": { "sets": 32, "ways": 4, "policy": "Random", "random_seed": 7 },
///         "l3": { "sets": 64, "ways": 16, "policy": "RWP", "writeback_rule": "Legacy" }
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.hierarchy.cores, 2);
/// assert_eq!(config.hierarchy.l1.line_bytes, 64);
/// assert_eq!(config.hierarchy.l2.policy, ReplacementPolicy::Random);
/// assert_eq!(config.hierarchy.l3.writeback_rule, WritebackRule::Legacy);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache hierarchy configuration
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or fields of the
    /// wrong type. An unknown policy name is reported with the message of
    /// [`CacheError::UnknownPolicy`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Report sections to print (empty prints every section)
    #[serde(default)]
    pub stats_sections: Vec<String>,

    /// Stop after this many references (None runs the whole trace)
    #[serde(default)]
    pub max_references: Option<u64>,

    /// Reference size used when a trace line has no size column
    #[serde(default = "GeneralConfig::default_access_size")]
    pub default_access_size: u32,
}

impl GeneralConfig {
    /// Returns the default reference size in bytes.
    fn default_access_size() -> u32 {
        defaults::ACCESS_SIZE
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            stats_sections: Vec::new(),
            max_references: None,
            default_access_size: defaults::ACCESS_SIZE,
        }
    }
}

/// Cache hierarchy configuration: private L1/L2 per core and a shared L3.
#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyConfig {
    /// Number of cores, each with a private L1 and L2
    #[serde(default = "HierarchyConfig::default_cores")]
    pub cores: usize,
    /// Private first-level cache
    #[serde(default = "HierarchyConfig::default_l1")]
    pub l1: CacheConfig,
    /// Private second-level cache
    #[serde(default = "HierarchyConfig::default_l2")]
    pub l2: CacheConfig,
    /// Shared last-level cache
    #[serde(default = "HierarchyConfig::default_l3")]
    pub l3: CacheConfig,
}

impl HierarchyConfig {
    /// Returns the default core count.
    fn default_cores() -> usize {
        defaults::CORES
    }

    /// Returns the default L1 geometry (32 KiB, 8-way, LRU).
    fn default_l1() -> CacheConfig {
        CacheConfig {
            sets: defaults::L1_SETS,
            ways: defaults::L1_WAYS,
            ..CacheConfig::default()
        }
    }

    /// Returns the default L2 geometry (256 KiB, 8-way, LRU).
    fn default_l2() -> CacheConfig {
        CacheConfig {
            sets: defaults::L2_SETS,
            ways: defaults::L2_WAYS,
            ..CacheConfig::default()
        }
    }

    /// Returns the default L3 geometry (2 MiB, 16-way, RWP).
    fn default_l3() -> CacheConfig {
        CacheConfig {
            sets: defaults::L3_SETS,
            ways: defaults::L3_WAYS,
            policy: ReplacementPolicy::Rwp,
            ..CacheConfig::default()
        }
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            cores: defaults::CORES,
            l1: Self::default_l1(),
            l2: Self::default_l2(),
            l3: Self::default_l3(),
        }
    }
}

/// Individual cache level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Number of sets (power of two)
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,
    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,
    /// Block size in bytes (power of two)
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,
    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,
    /// Bits discarded below the set index field
    #[serde(default)]
    pub set_shift: u32,
    /// Seed for the random replacement generator
    #[serde(default = "CacheConfig::default_seed")]
    pub random_seed: u64,
    /// Which evictions report a writeback
    #[serde(default)]
    pub writeback_rule: WritebackRule,
}

impl CacheConfig {
    /// Returns the default set count.
    fn default_sets() -> usize {
        defaults::L1_SETS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::L1_WAYS
    }

    /// Returns the default block size in bytes.
    fn default_line() -> usize {
        defaults::LINE_BYTES
    }

    /// Returns the default random replacement seed.
    fn default_seed() -> u64 {
        defaults::RANDOM_SEED
    }

    /// Total capacity in bytes.
    pub const fn size_bytes(&self) -> usize {
        self.sets * self.ways * self.line_bytes
    }
}

impl Default for CacheConfig {
    /// Creates a default cache configuration.
    ///
    /// 64 sets, 8 ways, 64-byte blocks, LRU, no set shift, dirty-only writebacks.
    fn default() -> Self {
        Self {
            sets: defaults::L1_SETS,
            ways: defaults::L1_WAYS,
            line_bytes: defaults::LINE_BYTES,
            policy: ReplacementPolicy::default(),
            set_shift: 0,
            random_seed: defaults::RANDOM_SEED,
            writeback_rule: WritebackRule::default(),
        }
    }
}
