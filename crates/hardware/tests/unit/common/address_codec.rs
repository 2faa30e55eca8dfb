//! Address Codec Unit Tests.
//!
//! Verifies the split of byte addresses into offset, set and tag for a range
//! of geometries, the recombination of tag and set into a block address, and
//! rejection of geometries that are not powers of two.

use proptest::prelude::*;
use rstest::rstest;

use rwpsim_core::common::{AddressCodec, CacheError, DecodedAddr, log2_exact};

// ══════════════════════════════════════════════════════════
// 1. Decoding
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::sixteen_sets(16, 64, 0x12345, 0x05, 13, 0x48)]
#[case::single_set(1, 64, 0x12345, 0x05, 0, 0x48D)]
#[case::wide_index(1024, 32, 0xDEAD_BEEF, 0x0F, 503, 0x1_BD5B)]
#[case::aligned_zero(64, 64, 0, 0, 0, 0)]
fn decode_splits_fields(
    #[case] sets: usize,
    #[case] block_bytes: usize,
    #[case] address: u64,
    #[case] offset: u64,
    #[case] set: usize,
    #[case] tag: u64,
) {
    let codec = AddressCodec::new(sets, block_bytes, 0).unwrap();
    assert_eq!(codec.decode(address), DecodedAddr { offset, set, tag });
}

/// With a set shift the index comes from higher bits, while the tag still
/// drops only the index width.
#[test]
fn shifted_index_keeps_unshifted_tag() {
    let codec = AddressCodec::new(16, 64, 2).unwrap();
    let decoded = codec.decode(0x12345);
    assert_eq!(decoded.offset, 0x05);
    assert_eq!(decoded.set, 3);
    assert_eq!(decoded.tag, 0x48);
}

#[test]
fn geometry_accessors() {
    let codec = AddressCodec::new(2048, 64, 1).unwrap();
    assert_eq!(codec.offset_bits(), 6);
    assert_eq!(codec.index_bits(), 11);
    assert_eq!(codec.index_mask(), 2047);
    assert_eq!(codec.set_shift(), 1);
}

// ══════════════════════════════════════════════════════════
// 2. Geometry validation
// ══════════════════════════════════════════════════════════

#[test]
fn non_power_of_two_sets_rejected() {
    assert_eq!(
        AddressCodec::new(12, 64, 0),
        Err(CacheError::NotPowerOfTwo {
            what: "set count",
            value: 12
        })
    );
}

#[test]
fn zero_block_size_rejected() {
    assert_eq!(
        AddressCodec::new(16, 0, 0),
        Err(CacheError::NotPowerOfTwo {
            what: "block size",
            value: 0
        })
    );
}

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(64, 6)]
#[case(1 << 40, 40)]
fn log2_of_powers_of_two(#[case] n: u64, #[case] expected: u32) {
    assert_eq!(log2_exact(n, "n"), Ok(expected));
}

// ══════════════════════════════════════════════════════════
// 3. Recombination
// ══════════════════════════════════════════════════════════

#[test]
fn block_address_clears_offset() {
    let codec = AddressCodec::new(16, 64, 0).unwrap();
    assert_eq!(codec.block_address(0x48, 13), 0x12340);
}

proptest! {
    /// Without a set shift, decoding then recombining yields the address
    /// with its offset bits cleared.
    #[test]
    fn recombination_recovers_block_address(
        address in any::<u64>(),
        index_bits in 0u32..16,
        offset_bits in 0u32..10,
    ) {
        let codec = AddressCodec::new(1 << index_bits, 1 << offset_bits, 0).unwrap();
        let decoded = codec.decode(address);
        let mask = (1u64 << offset_bits) - 1;
        prop_assert_eq!(codec.block_address(decoded.tag, decoded.set), address & !mask);
        prop_assert_eq!(decoded.offset, address & mask);
    }

    /// The set index is always in range, whatever the shift.
    #[test]
    fn set_index_in_range(address in any::<u64>(), set_shift in 0u32..70) {
        let codec = AddressCodec::new(256, 64, set_shift).unwrap();
        prop_assert!(codec.decode(address).set < 256);
    }
}
