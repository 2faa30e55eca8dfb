//! Cache Replacement Policy Tests.
//!
//! Verifies the victim selection logic for the LRU and Random policies.
//! Each policy implements `ReplacementPolicy` with `update(set, way, info, hit)`
//! and `get_victim(set, info)`. Tests exercise them in isolation.

use proptest::prelude::*;

use rwpsim_core::cache::policies::{
    AccessInfo, LruPolicy, LruStack, RandomPolicy, ReplacementPolicy, ReplacementState, Victim,
};
use rwpsim_core::common::{AccessKind, AccessSource, CacheError};
use rwpsim_core::config::ReplacementPolicy as PolicyType;

fn info() -> AccessInfo {
    AccessInfo {
        address: 0,
        pc: 0,
        tag: 0,
        core: 0,
        kind: AccessKind::Load,
        source: AccessSource::Direct,
    }
}

// ══════════════════════════════════════════════════════════
// 1. LRU Policy
// ══════════════════════════════════════════════════════════

/// Way `w` starts at stack position `w`, so the last way is the first victim.
#[test]
fn lru_initial_victim_is_last_way() {
    let mut policy = LruPolicy::new(1, 4).unwrap();
    assert_eq!(policy.get_victim(0, &info()), Victim::Way(3));
}

/// Accessing ways in order 0,1,2,3 makes 0 the LRU.
#[test]
fn lru_sequential_access_reorders() {
    let mut policy = LruPolicy::new(1, 4).unwrap();
    for way in 0..4 {
        policy.update(0, Some(way), &info(), false);
    }
    assert_eq!(policy.get_victim(0, &info()), Victim::Way(0));
    assert_eq!(policy.stack().set_positions(0), &[3, 2, 1, 0]);
}

/// Classic LRU scenario: access 0,1,2,3 then re-access 0, LRU becomes 1.
#[test]
fn lru_evicts_true_lru_after_reaccess() {
    let mut policy = LruPolicy::new(1, 4).unwrap();
    for way in 0..4 {
        policy.update(0, Some(way), &info(), false);
    }
    policy.update(0, Some(0), &info(), true);
    assert_eq!(policy.get_victim(0, &info()), Victim::Way(1));
    policy.update(0, Some(1), &info(), true);
    assert_eq!(policy.get_victim(0, &info()), Victim::Way(2));
}

/// Touching a way only shifts the ways that were above it.
#[test]
fn lru_touch_shifts_only_more_recent_ways() {
    let mut stack = LruStack::new(1, 4).unwrap();
    // Positions by way: [0, 1, 2, 3].
    stack.touch(0, 2);
    assert_eq!(stack.set_positions(0), &[1, 2, 0, 3]);
    stack.touch(0, 2);
    assert_eq!(stack.set_positions(0), &[1, 2, 0, 3]);
}

/// Sets keep independent stacks.
#[test]
fn lru_sets_are_independent() {
    let mut policy = LruPolicy::new(2, 2).unwrap();
    policy.update(0, Some(1), &info(), false);
    assert_eq!(policy.get_victim(0, &info()), Victim::Way(0));
    assert_eq!(policy.get_victim(1, &info()), Victim::Way(1));
}

/// A bypass notification leaves the stack unchanged.
#[test]
fn lru_ignores_bypass_update() {
    let mut policy = LruPolicy::new(1, 2).unwrap();
    policy.update(0, None, &info(), false);
    assert_eq!(policy.stack().set_positions(0), &[0, 1]);
}

#[test]
fn lru_single_way_always_victim_zero() {
    let mut policy = LruPolicy::new(1, 1).unwrap();
    policy.update(0, Some(0), &info(), false);
    assert_eq!(policy.get_victim(0, &info()), Victim::Way(0));
}

proptest! {
    /// After any sequence of touches each set's positions are a permutation
    /// of `0..ways`.
    #[test]
    fn lru_positions_stay_a_permutation(
        touches in prop::collection::vec((0usize..4, 0usize..8), 0..200),
    ) {
        let mut stack = LruStack::new(4, 8).unwrap();
        for (set, way) in touches {
            stack.touch(set, way);
            prop_assert_eq!(stack.position(set, way), 0);
        }
        for set in 0..4 {
            let mut positions = stack.set_positions(set).to_vec();
            positions.sort_unstable();
            prop_assert_eq!(positions, (0..8).collect::<Vec<_>>());
        }
    }
}

// ══════════════════════════════════════════════════════════
// 2. Random Policy
// ══════════════════════════════════════════════════════════

#[test]
fn random_victim_in_range_and_never_bypasses() {
    let mut policy = RandomPolicy::new(4, 42).unwrap();
    for _ in 0..1000 {
        match policy.get_victim(0, &info()) {
            Victim::Way(way) => assert!(way < 4),
            Victim::Bypass => panic!("random policy bypassed"),
        }
    }
}

#[test]
fn random_same_seed_same_sequence() {
    let mut a = RandomPolicy::new(8, 7).unwrap();
    let mut b = RandomPolicy::new(8, 7).unwrap();
    for _ in 0..100 {
        assert_eq!(a.get_victim(0, &info()), b.get_victim(0, &info()));
    }
}

/// A zero seed would lock xorshift at zero; it must still spread victims.
#[test]
fn random_zero_seed_still_varies() {
    let mut policy = RandomPolicy::new(8, 0).unwrap();
    let victims: Vec<_> = (0..64).map(|_| policy.get_victim(0, &info())).collect();
    assert!(victims.iter().any(|&v| v != victims[0]));
}

#[test]
fn random_single_way_always_zero() {
    let mut policy = RandomPolicy::new(1, 99).unwrap();
    for _ in 0..10 {
        assert_eq!(policy.get_victim(0, &info()), Victim::Way(0));
    }
}

// ══════════════════════════════════════════════════════════
// 3. Dispatch
// ══════════════════════════════════════════════════════════

#[test]
fn replacement_state_reports_policy() {
    for policy in [PolicyType::Lru, PolicyType::Random, PolicyType::Rwp] {
        let state = ReplacementState::new(policy, 4, 4, 1).unwrap();
        assert_eq!(state.policy(), policy);
        assert_eq!(state.as_rwp().is_some(), policy == PolicyType::Rwp);
        assert_eq!(
            state.stack_position(0, 3).is_some(),
            policy != PolicyType::Random
        );
    }
}

/// Every policy refuses a set with no ways instead of failing on first use.
#[test]
fn zero_ways_rejected_by_every_policy() {
    for policy in [PolicyType::Lru, PolicyType::Random, PolicyType::Rwp] {
        assert_eq!(
            ReplacementState::new(policy, 4, 0, 1).unwrap_err(),
            CacheError::ZeroAssociativity
        );
    }
    assert_eq!(RandomPolicy::new(0, 7).unwrap_err(), CacheError::ZeroAssociativity);
    assert_eq!(LruStack::new(1, 0).unwrap_err(), CacheError::ZeroAssociativity);
}
