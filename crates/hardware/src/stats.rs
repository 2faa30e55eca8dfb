//! Simulation statistics collection and reporting.
//!
//! This module aggregates what the hierarchy reports. It provides:
//! 1. **Throughput:** References processed and host time.
//! 2. **Reference mix:** Counts by access kind.
//! 3. **Hierarchy outcomes:** One counter per [`MissMask`] flag.
//! 4. **Cache levels:** Snapshots of every cache's raw counters.
//! 5. **Replacement:** RWP partition predictions for caches that run it.

use std::time::Instant;

use crate::cache::policies::RwpPolicy;
use crate::cache::{Cache, CacheCounters};
use crate::common::{AccessKind, Reference};
use crate::hierarchy::{Hierarchy, MissMask};

/// Counter snapshot of one cache, labelled for the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelStats {
    /// Report label, e.g. `L1[0]` or `L3`.
    pub name: String,
    /// Raw counters at snapshot time.
    pub counters: CacheCounters,
    /// RWP predicted dirty ways, if the cache runs RWP.
    pub predicted_dirty_lines: Option<usize>,
}

/// Simulation statistics structure.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// References fed into the hierarchy.
    pub references: u64,
    /// References per access kind, indexed by [`AccessKind::index`].
    pub per_kind: [u64; AccessKind::COUNT],
    /// References that hit in L1 (empty mask).
    pub l1_hits: u64,
    /// Occurrences of each mask flag, in [`MissMask::FLAGS`] order.
    pub flag_counts: [u64; MissMask::FLAGS.len()],
    /// Per-cache snapshots taken by [`SimStats::snapshot`].
    pub levels: Vec<LevelStats>,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            references: 0,
            per_kind: [0; AccessKind::COUNT],
            l1_hits: 0,
            flag_counts: [0; MissMask::FLAGS.len()],
            levels: Vec::new(),
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"mix"`, `"hierarchy"`, `"caches"`, `"replacement"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "mix", "hierarchy", "caches", "replacement"];

impl SimStats {
    /// Accounts one serviced reference.
    pub fn record(&mut self, reference: &Reference, mask: MissMask) {
        self.references += 1;
        self.per_kind[reference.kind.index()] += 1;
        if mask.is_empty() {
            self.l1_hits += 1;
        }
        for (count, (flag, _)) in self.flag_counts.iter_mut().zip(MissMask::FLAGS) {
            if mask.contains(flag) {
                *count += 1;
            }
        }
    }

    /// Occurrences of one mask flag.
    pub fn flag_count(&self, flag: MissMask) -> u64 {
        MissMask::FLAGS
            .iter()
            .position(|&(f, _)| f == flag)
            .map_or(0, |i| self.flag_counts[i])
    }

    /// Replaces the per-cache snapshots with the hierarchy's current counters.
    pub fn snapshot(&mut self, hierarchy: &Hierarchy) {
        let level = |name: String, cache: &Cache| LevelStats {
            name,
            counters: cache.counters().clone(),
            predicted_dirty_lines: cache
                .replacement()
                .as_rwp()
                .map(RwpPolicy::predicted_dirty_lines),
        };

        let cores = hierarchy.cores();
        let l1 = (0..cores)
            .filter_map(|core| hierarchy.l1(core).map(|c| level(format!("L1[{core}]"), c)));
        let l2 = (0..cores)
            .filter_map(|core| hierarchy.l2(core).map(|c| level(format!("L2[{core}]"), c)));
        self.levels = l1
            .chain(l2)
            .chain(std::iter::once(level("L3".to_owned(), hierarchy.l3())))
            .collect();
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let refs = self.references.max(1) as f64;
        let pct = |n: u64| (n as f64 / refs) * 100.0;

        if want("summary") {
            let krefs = if seconds > 0.0 {
                (self.references as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("CACHE HIERARCHY SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {:.4} s", seconds);
            println!("sim_refs                 {}", self.references);
            println!("sim_rate                 {:.2} kref/s", krefs);
            println!("----------------------------------------------------------");
        }
        if want("mix") {
            println!("REFERENCE MIX");
            for kind in AccessKind::ALL {
                let n = self.per_kind[kind.index()];
                println!("  op.{:<19} {} ({:.2}%)", kind.name(), n, pct(n));
            }
            println!("----------------------------------------------------------");
        }
        if want("hierarchy") {
            println!("HIERARCHY OUTCOMES");
            println!("  {:<22} {} ({:.2}%)", "l1.hit", self.l1_hits, pct(self.l1_hits));
            for ((_, name), &n) in MissMask::FLAGS.iter().zip(&self.flag_counts) {
                println!("  {:<22} {} ({:.2}%)", name, n, pct(n));
            }
            println!("----------------------------------------------------------");
        }
        if want("caches") {
            println!("CACHE LEVELS");
            for level in &self.levels {
                let c = &level.counters;
                println!(
                    "  {:<6} accesses: {:<10} | misses: {:<10} | inval: {:<8} | miss_rate: {:.2}%",
                    level.name,
                    c.accesses,
                    c.misses,
                    c.invalidations,
                    c.miss_rate() * 100.0
                );
            }
            println!("----------------------------------------------------------");
        }
        if want("replacement") {
            println!("REPLACEMENT");
            for level in &self.levels {
                if let Some(pred) = level.predicted_dirty_lines {
                    println!("  {:<6} rwp.predicted_dirty_ways {}", level.name, pred);
                }
            }
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
