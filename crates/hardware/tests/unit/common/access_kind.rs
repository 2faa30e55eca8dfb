//! Access Kind Tests.
//!
//! Verifies raw trace codes, mnemonic parsing and the read/write split that
//! drives dirty tracking.

use rstest::rstest;

use rwpsim_core::common::{AccessKind, CacheError, Reference};

#[rstest]
#[case(0, AccessKind::Prefetch)]
#[case(1, AccessKind::Load)]
#[case(2, AccessKind::Store)]
#[case(3, AccessKind::Writeback)]
#[case(4, AccessKind::InstructionFetch)]
fn codes_map_to_kinds(#[case] code: u32, #[case] kind: AccessKind) {
    assert_eq!(AccessKind::try_from(code), Ok(kind));
    assert_eq!(kind.index(), code as usize);
}

#[test]
fn out_of_range_code_rejected() {
    assert_eq!(AccessKind::try_from(5), Err(CacheError::InvalidAccessKind(5)));
}

#[rstest]
#[case("L", AccessKind::Load)]
#[case("read", AccessKind::Load)]
#[case("s", AccessKind::Store)]
#[case("W", AccessKind::Store)]
#[case("WB", AccessKind::Writeback)]
#[case("ifetch", AccessKind::InstructionFetch)]
#[case("pf", AccessKind::Prefetch)]
#[case("2", AccessKind::Store)]
fn mnemonics_parse(#[case] text: &str, #[case] kind: AccessKind) {
    assert_eq!(text.parse::<AccessKind>(), Ok(kind));
}

#[test]
fn unknown_mnemonic_rejected() {
    assert_eq!(
        "flush".parse::<AccessKind>(),
        Err(CacheError::UnknownAccessMnemonic("flush".to_owned()))
    );
}

#[test]
fn only_stores_and_writebacks_write() {
    let writes: Vec<_> = AccessKind::ALL.into_iter().filter(|k| k.is_write()).collect();
    assert_eq!(writes, [AccessKind::Store, AccessKind::Writeback]);
    assert!(AccessKind::InstructionFetch.is_read());
}

#[test]
fn writeback_of_keeps_origin() {
    let r = Reference::new(0x1234, 0x400, 4, AccessKind::Load, 2);
    let wb = r.writeback_of(0x8000);
    assert_eq!(wb, Reference::new(0x8000, 0x400, 4, AccessKind::Writeback, 2));
}
