//! Trace-driven simulation.
//!
//! Provides the stimulus type fed to the cache each cycle, a loader for
//! stimulus traces, and the [`Simulator`] that drives a controller through
//! a trace while collecting statistics.

use serde::Deserialize;

use crate::cache::Request;

/// Trace file parsing.
pub mod loader;

/// Cycle-by-cycle driver.
pub mod simulator;

pub use simulator::{CycleRecord, Simulator};

/// Inputs for one clock cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Stimulus {
    /// A request (possibly with no enable asserted).
    Request(Request),
    /// Synchronous reset; supersedes any request in the same cycle.
    Reset,
}

impl From<Request> for Stimulus {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}
