//! # Unit Components
//!
//! This module organizes the tests by the component they exercise, from the
//! address codec up to the trace-driven simulator.



/// Unit tests for configuration defaults and JSON deserialization.
pub mod config;



/// Unit tests for simulation statistics verification.
///
/// This module contains tests that ensure the [`SimStats`](rwpsim_core::stats::SimStats)
/// structure correctly tracks the reference mix, mask flag counts and
/// per-cache snapshots.
pub mod stats_verification;
