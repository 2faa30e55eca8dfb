//! Simulator: owns the hierarchy and the statistics side-by-side.
//!
//! References flow in one at a time through [`Simulator::step`], or in bulk
//! from any iterator (typically a [`TraceReader`](super::TraceReader)) through
//! [`Simulator::run`].

use thiserror::Error;
use tracing::{info, warn};

use super::trace::TraceError;
use crate::common::{CacheError, Reference};
use crate::config::Config;
use crate::hierarchy::{Hierarchy, MissMask};
use crate::stats::SimStats;

/// Errors that stop a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The trace could not be read or parsed.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The hierarchy rejected its configuration or a reference.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Top-level simulator: cache hierarchy + statistics.
#[derive(Debug)]
pub struct Simulator {
    /// The simulated caches.
    pub hierarchy: Hierarchy,
    /// Counters accumulated over every serviced reference.
    pub stats: SimStats,
    max_references: Option<u64>,
}

impl Simulator {
    /// Creates a simulator with cold caches.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if any cache geometry is invalid.
    pub fn new(config: &Config) -> Result<Self, CacheError> {
        let hierarchy = Hierarchy::new(&config.hierarchy)?;
        info!(
            cores = config.hierarchy.cores,
            l1 = config.hierarchy.l1.size_bytes(),
            l2 = config.hierarchy.l2.size_bytes(),
            l3 = config.hierarchy.l3.size_bytes(),
            l3_policy = ?config.hierarchy.l3.policy,
            "hierarchy built"
        );
        Ok(Self {
            hierarchy,
            stats: SimStats::default(),
            max_references: config.general.max_references,
        })
    }

    /// Services one reference and accounts it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::CoreOutOfRange`] for a reference from an unknown
    /// core; the statistics are left untouched in that case.
    pub fn step(&mut self, reference: &Reference) -> Result<MissMask, CacheError> {
        let mask = self.hierarchy.memory_access(reference)?;
        self.stats.record(reference, mask);
        Ok(mask)
    }

    /// Feeds references until the iterator ends or the configured reference
    /// limit is reached. Returns the number of references serviced.
    ///
    /// # Errors
    ///
    /// Stops at the first trace or hierarchy error.
    pub fn run<I>(&mut self, references: I) -> Result<u64, SimError>
    where
        I: IntoIterator<Item = Result<Reference, TraceError>>,
    {
        let mut serviced = 0;
        for reference in references {
            if self.max_references.is_some_and(|max| serviced >= max) {
                warn!(serviced, "reference limit reached, rest of trace ignored");
                break;
            }
            let _ = self.step(&reference?)?;
            serviced += 1;
        }
        info!(serviced, "trace finished");
        Ok(serviced)
    }

    /// Snapshots the per-cache counters into the statistics and returns them.
    pub fn finish(&mut self) -> &SimStats {
        self.stats.snapshot(&self.hierarchy);
        &self.stats
    }
}
