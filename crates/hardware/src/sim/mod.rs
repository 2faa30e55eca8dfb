//! Trace ingestion and the simulation driver.
//!
//! Provides a reader for text traces and the loop that feeds references
//! into a [`Hierarchy`](crate::hierarchy::Hierarchy) while collecting statistics.

/// Line-oriented trace parsing.
pub mod trace;

/// Driver that owns the hierarchy and the statistics.
pub mod simulator;

pub use simulator::{SimError, Simulator};
pub use trace::{TraceError, TraceReader};
