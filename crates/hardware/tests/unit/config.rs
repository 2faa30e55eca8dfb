//! # Configuration Tests
//!
//! Tests for configuration structures, deserialization, defaults, and
//! policy name parsing.

use rwpsim_core::common::CacheError;
use rwpsim_core::config::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.general.stats_sections.is_empty());
    assert_eq!(config.general.max_references, None);
    assert_eq!(config.general.default_access_size, 8);
    assert_eq!(config.hierarchy.cores, 1);
}

#[test]
fn test_hierarchy_defaults() {
    let h = HierarchyConfig::default();
    assert_eq!((h.l1.sets, h.l1.ways), (64, 8));
    assert_eq!((h.l2.sets, h.l2.ways), (512, 8));
    assert_eq!((h.l3.sets, h.l3.ways), (2048, 16));
    assert_eq!(h.l1.policy, ReplacementPolicy::Lru);
    assert_eq!(h.l2.policy, ReplacementPolicy::Lru);
    assert_eq!(h.l3.policy, ReplacementPolicy::Rwp);
    assert_eq!(h.l1.size_bytes(), 32 * 1024);
    assert_eq!(h.l2.size_bytes(), 256 * 1024);
    assert_eq!(h.l3.size_bytes(), 2 * 1024 * 1024);
}

#[test]
fn test_cache_config_defaults() {
    let cache = CacheConfig::default();
    assert_eq!(cache.line_bytes, 64);
    assert_eq!(cache.set_shift, 0);
    assert_eq!(cache.policy, ReplacementPolicy::Lru);
    assert_eq!(cache.writeback_rule, WritebackRule::DirtyOnly);
    assert_ne!(cache.random_seed, 0);
}

#[test]
fn test_empty_json_uses_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.hierarchy.cores, 1);
    assert_eq!(config.hierarchy.l3.ways, 16);
}

#[test]
fn test_partial_json_overrides() {
    let json = r#"{
        "general": { "max_references": 1000, "default_access_size": 4 },
        "hierarchy": {
            "cores": 4,
            "l3": { "sets": 4096, "ways": 16, "policy": "lru", "set_shift": 2 }
        }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.general.max_references, Some(1000));
    assert_eq!(config.general.default_access_size, 4);
    assert_eq!(config.hierarchy.cores, 4);
    assert_eq!(config.hierarchy.l1.sets, 64);
    assert_eq!(config.hierarchy.l3.sets, 4096);
    assert_eq!(config.hierarchy.l3.policy, ReplacementPolicy::Lru);
    assert_eq!(config.hierarchy.l3.set_shift, 2);
    assert_eq!(config.hierarchy.l3.line_bytes, 64);
}

#[test]
fn test_unknown_policy_in_json_rejected() {
    let json = r#"{ "hierarchy": { "l1": { "policy": "PLRU" } } }"#;
    let err = Config::from_json(json).unwrap_err();
    let expected = CacheError::UnknownPolicy("PLRU".to_owned()).to_string();
    assert!(
        err.to_string().contains(&expected),
        "unexpected error: {err}"
    );
}

#[test]
fn test_policy_names_in_json_ignore_case() {
    let json = r#"{ "hierarchy": {
        "l1": { "policy": "random" },
        "l2": { "policy": "Rwp" },
        "l3": { "policy": "LRU" }
    } }"#;
    let h = Config::from_json(json).unwrap().hierarchy;
    assert_eq!(h.l1.policy, ReplacementPolicy::Random);
    assert_eq!(h.l2.policy, ReplacementPolicy::Rwp);
    assert_eq!(h.l3.policy, ReplacementPolicy::Lru);
}

#[test]
fn test_policy_from_str() {
    assert_eq!("RWP".parse::<ReplacementPolicy>(), Ok(ReplacementPolicy::Rwp));
    assert_eq!("rand".parse::<ReplacementPolicy>(), Ok(ReplacementPolicy::Random));
    assert_eq!("Lru".parse::<ReplacementPolicy>(), Ok(ReplacementPolicy::Lru));
    assert_eq!(
        "mru".parse::<ReplacementPolicy>(),
        Err(CacheError::UnknownPolicy("mru".to_owned()))
    );
}

#[test]
fn test_writeback_rule_json() {
    let json = r#"{ "hierarchy": { "l2": { "writeback_rule": "Legacy" } } }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.hierarchy.l2.writeback_rule, WritebackRule::Legacy);
}
