//! Common utilities and types shared by every cache component.
//!
//! This module provides the building blocks used across the engine. It includes:
//! 1. **Address Codec:** Offset/set/tag decomposition and recombination.
//! 2. **Reference Kinds:** Classification of loads, stores, fetches and writebacks.
//! 3. **Error Handling:** Fatal configuration and dispatch errors.

/// Address decomposition (offset, set, tag) and power-of-two validation.
pub mod addr;

/// Memory reference kind and access-source definitions.
pub mod data;

/// Error types for construction and dispatch failures.
pub mod error;

pub use addr::{AddressCodec, DecodedAddr, log2_exact};
pub use data::{AccessKind, AccessSource, Reference};
pub use error::CacheError;
