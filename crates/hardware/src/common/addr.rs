//! Address decomposition for set-associative caches.
//!
//! This module splits physical addresses into their cache fields. It provides:
//! 1. **Geometry Validation:** Exact base-2 logarithms that reject non-powers of two.
//! 2. **Decoding:** Byte offset, set index and tag extraction.
//! 3. **Recombination:** Rebuilding a block-aligned address from a tag and set.
//!
//! The tag is taken from the block address shifted by the index width only.
//! When `set_shift` is non-zero the set index is drawn from higher bits, so
//! tag and index overlap and no longer partition the block address. This is
//! deliberate: the tag must still recombine with the index into the address a
//! sampling collaborator expects, so writeback addresses stay reconstructible.

use super::error::CacheError;

/// Returns `log2(n)` when `n` is an exact, non-zero power of two.
///
/// `what` names the parameter in the resulting error.
///
/// # Errors
///
/// Returns [`CacheError::NotPowerOfTwo`] for zero or any value with more than
/// one bit set.
pub fn log2_exact(n: u64, what: &'static str) -> Result<u32, CacheError> {
    if n.is_power_of_two() {
        Ok(n.trailing_zeros())
    } else {
        Err(CacheError::NotPowerOfTwo { what, value: n })
    }
}

/// Fields of an address as seen by one cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// Byte offset within the block.
    pub offset: u64,
    /// Set index.
    pub set: usize,
    /// Tag compared against resident blocks.
    pub tag: u64,
}

/// Bit-level address codec for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCodec {
    offset_bits: u32,
    index_bits: u32,
    index_mask: u64,
    set_shift: u32,
}

impl AddressCodec {
    /// Builds a codec for `sets` sets of `block_bytes`-byte blocks.
    ///
    /// # Errors
    ///
    /// Fails if either `sets` or `block_bytes` is not a power of two.
    pub fn new(sets: usize, block_bytes: usize, set_shift: u32) -> Result<Self, CacheError> {
        let offset_bits = log2_exact(block_bytes as u64, "block size")?;
        let index_bits = log2_exact(sets as u64, "set count")?;
        Ok(Self {
            offset_bits,
            index_bits,
            index_mask: (sets as u64) - 1,
            set_shift,
        })
    }

    /// Splits `address` into offset, set and tag.
    #[inline(always)]
    pub const fn decode(&self, address: u64) -> DecodedAddr {
        let offset = address & ((1u64 << self.offset_bits) - 1);
        let block_addr = address >> self.offset_bits;
        let set = (block_shr(block_addr, self.set_shift) & self.index_mask) as usize;
        let tag = block_shr(block_addr, self.index_bits);
        DecodedAddr { offset, set, tag }
    }

    /// Rebuilds the block-aligned byte address from a tag and set index.
    ///
    /// Inverse of [`decode`](Self::decode) when `set_shift` is zero.
    #[inline(always)]
    pub const fn block_address(&self, tag: u64, set: usize) -> u64 {
        (tag.wrapping_shl(self.index_bits).wrapping_add(set as u64)).wrapping_shl(self.offset_bits)
    }

    /// Number of low bits holding the byte offset.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of bits holding the set index.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Mask applied to the shifted block address to form the set index.
    pub const fn index_mask(&self) -> u64 {
        self.index_mask
    }

    /// Extra bits discarded below the index field.
    pub const fn set_shift(&self) -> u32 {
        self.set_shift
    }
}

/// Right shift that yields zero instead of overflowing for shifts >= 64.
#[inline(always)]
const fn block_shr(value: u64, shift: u32) -> u64 {
    if shift >= u64::BITS { 0 } else { value >> shift }
}
