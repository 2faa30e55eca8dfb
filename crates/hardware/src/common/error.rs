//! Error definitions for the cache hierarchy engine.
//!
//! Every variant here is a configuration or programming error. Expected
//! simulation outcomes (full sets, bypass decisions, clean evictions) are
//! reported through return values and never through this type. It covers:
//! 1. **Geometry:** Set counts and block sizes that are not powers of two.
//! 2. **Dispatch:** Raw access-kind codes and policy names that name nothing.
//! 3. **Topology:** Core indices outside the configured hierarchy.

use thiserror::Error;

/// Fatal conditions raised while building or driving a cache.
///
/// Callers are expected to abort the simulation when they see one of these;
/// statistics gathered up to that point are not meaningful.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A geometry parameter that must be a power of two is not.
    ///
    /// `what` names the parameter (`"set count"`, `"block size"`).
    #[error("{what} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo {
        /// Which geometry parameter was rejected.
        what: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// A cache was configured with zero ways.
    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    /// A raw access-kind code outside the five known kinds.
    #[error("invalid access kind code {0}")]
    InvalidAccessKind(u32),

    /// A trace mnemonic that names no access kind.
    #[error("unknown access kind `{0}`")]
    UnknownAccessMnemonic(String),

    /// A replacement policy name that does not match any known policy.
    #[error("unknown replacement policy `{0}`")]
    UnknownPolicy(String),

    /// A reference named a core the hierarchy was not built with.
    #[error("core {core} out of range (hierarchy has {cores} cores)")]
    CoreOutOfRange {
        /// The requested core index.
        core: usize,
        /// Number of cores in the hierarchy.
        cores: usize,
    },
}
