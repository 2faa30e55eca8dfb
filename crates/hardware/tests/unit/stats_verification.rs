//! SimStats unit tests.
//!
//! Verifies default initialization, per-reference accounting and the
//! per-cache snapshots taken from a hierarchy.

use rwpsim_core::common::{AccessKind, Reference};
use rwpsim_core::config::HierarchyConfig;
use rwpsim_core::hierarchy::{Hierarchy, MissMask};
use rwpsim_core::stats::{STATS_SECTIONS, SimStats};

fn reference(kind: AccessKind) -> Reference {
    Reference::new(0, 0, 8, kind, 0)
}

#[test]
fn default_stats_all_zero() {
    let stats = SimStats::default();
    assert_eq!(stats.references, 0);
    assert_eq!(stats.l1_hits, 0);
    assert_eq!(stats.per_kind, [0; AccessKind::COUNT]);
    assert_eq!(stats.flag_counts, [0; 8]);
    assert!(stats.levels.is_empty());
}

#[test]
fn record_counts_kinds_and_flags() {
    let mut stats = SimStats::default();
    stats.record(&reference(AccessKind::Load), MissMask::NONE);
    stats.record(
        &reference(AccessKind::Store),
        MissMask::L1_DEMAND_MISS | MissMask::L2_DEMAND_MISS,
    );
    stats.record(
        &reference(AccessKind::Store),
        MissMask::L1_DEMAND_MISS | MissMask::L1_WRITEBACK,
    );

    assert_eq!(stats.references, 3);
    assert_eq!(stats.l1_hits, 1);
    assert_eq!(stats.per_kind[AccessKind::Load.index()], 1);
    assert_eq!(stats.per_kind[AccessKind::Store.index()], 2);
    assert_eq!(stats.flag_count(MissMask::L1_DEMAND_MISS), 2);
    assert_eq!(stats.flag_count(MissMask::L2_DEMAND_MISS), 1);
    assert_eq!(stats.flag_count(MissMask::L1_WRITEBACK), 1);
    assert_eq!(stats.flag_count(MissMask::L3_WRITEBACK), 0);
}

#[test]
fn snapshot_labels_every_cache() {
    let config = HierarchyConfig {
        cores: 2,
        ..HierarchyConfig::default()
    };
    let mut h = Hierarchy::new(&config).unwrap();
    let _ = h.memory_access(&reference(AccessKind::Load)).unwrap();

    let mut stats = SimStats::default();
    stats.snapshot(&h);
    let names: Vec<_> = stats.levels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["L1[0]", "L1[1]", "L2[0]", "L2[1]", "L3"]);

    // The demand miss probed L2[0] and L3 but left core 1 untouched.
    assert_eq!(stats.levels[0].counters.misses, 1);
    assert_eq!(stats.levels[1].counters.accesses, 0);
    assert_eq!(stats.levels[2].counters.accesses, 1);
    assert_eq!(stats.levels[4].counters.accesses, 1);
    assert_eq!(stats.levels[4].predicted_dirty_lines, Some(0));
}

#[test]
fn section_names_are_stable() {
    assert_eq!(
        STATS_SECTIONS,
        &["summary", "mix", "hierarchy", "caches", "replacement"]
    );
}
