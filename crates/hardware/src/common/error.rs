//! Error types.
//!
//! Stepping the cache is total and never fails. Errors only come from the
//! edges of the model:
//! 1. **Configuration:** geometry that cannot describe a real address layout.
//! 2. **Trace loading:** unreadable or malformed stimulus files.
//! 3. **Verification:** structural invariants found broken by the checker.
//! 4. **Simulation:** the umbrella type returned by [`Simulator`](crate::sim::Simulator) runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::constants::{MAX_BUS_WIDTH, MAX_SET_BITS, NUM_WAYS};

/// Rejected cache configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Address width is zero or wider than the model supports.
    #[error("address width {0} is outside 1..={max}", max = MAX_BUS_WIDTH)]
    AddrWidth(u32),

    /// Data width is zero or wider than the model supports.
    #[error("data width {0} is outside 1..={max}", max = MAX_BUS_WIDTH)]
    DataWidth(u32),

    /// Too many set-index bits for the line store.
    #[error("set bits {0} exceed the maximum of {max}", max = MAX_SET_BITS)]
    SetBits(u32),

    /// Set index and block offset consume the whole address.
    #[error(
        "set bits ({set_bits}) plus block offset ({block_offset}) leave no tag bits in a {addr_width}-bit address"
    )]
    NoTagBits {
        /// Configured address width.
        addr_width: u32,
        /// Configured set-index width.
        set_bits: u32,
        /// Configured block-offset width.
        block_offset: u32,
    },

    /// Config file could not be read.
    #[error("cannot read config '{}': {source}", .path.display())]
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Config JSON did not match the expected schema.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while reading a stimulus trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Trace file could not be read.
    #[error("cannot read trace '{}': {source}", .path.display())]
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A text-format line could not be parsed.
    #[error("line {line}: {reason}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A JSON-format line could not be deserialised.
    #[error("line {line}: {source}")]
    Json {
        /// 1-based line number.
        line: usize,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
}

/// A broken structural invariant of one set.
///
/// These never occur when the cache is driven from reset through
/// [`CacheController::tick`](crate::cache::CacheController::tick); the checker exists so
/// tests and the simulator's checking mode can prove it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Recency ranks of the valid lines are not exactly `0..k`.
    #[error("set {set}: recency {ranks:?} over valid {valid:?} is not a permutation of 0..{count}")]
    RecencyNotPermutation {
        /// Offending set.
        set: usize,
        /// Recency value of every way.
        ranks: [u8; NUM_WAYS],
        /// Valid bit of every way.
        valid: [bool; NUM_WAYS],
        /// Number of valid ways.
        count: usize,
    },

    /// Two valid lines in one set hold the same tag.
    #[error("set {set}: ways {first} and {second} both hold tag {tag:#x}")]
    DuplicateTag {
        /// Offending set.
        set: usize,
        /// Duplicated tag.
        tag: u64,
        /// Lower way holding it.
        first: usize,
        /// Higher way holding it.
        second: usize,
    },
}

/// Errors surfaced by a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Trace could not be loaded.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Invariant checking found a violation after a cycle.
    #[error("cycle {cycle}: {violation}")]
    Invariant {
        /// Cycle whose update broke the invariant.
        cycle: u64,
        /// What was broken.
        #[source]
        violation: InvariantViolation,
    },
}
