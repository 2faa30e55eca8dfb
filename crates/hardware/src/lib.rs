//! Cache hierarchy simulator library.
//!
//! This crate models the metadata of a multi-core cache hierarchy driven by a
//! memory reference trace. It provides the following:
//! 1. **Caches:** Set-associative instances with tag, valid, dirty and fill
//!    provenance per block, and LRU, Random or Read-Write Partitioning
//!    replacement.
//! 2. **Hierarchy:** Private L1/L2 per core, a shared L3, and a per-reference
//!    [`MissMask`] describing misses and writebacks.
//! 3. **Simulation:** Trace parsing, configuration, and statistics collection.

/// Common types (address codec, references, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Set-associative cache and replacement policies.
pub mod cache;
/// Three-level hierarchy and miss mask.
pub mod hierarchy;
/// Trace reader and simulation driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Single cache level; construct with `Cache::new`.
pub use crate::cache::Cache;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The hierarchy and the mask `memory_access` returns.
pub use crate::hierarchy::{Hierarchy, MissMask};
/// Trace-driven simulator.
pub use crate::sim::Simulator;
