//! 4-way set-associative cache with true LRU replacement.
//!
//! The cache is split into four pieces that mirror the hardware:
//! 1. **Line store** ([`store`]): valid bit, tag, data, and recency of every line.
//! 2. **Resolver** ([`resolver`]): combinational hit and victim selection over one set.
//! 3. **Recency tracker** ([`recency`]): promote-on-hit and allocate-on-miss rank updates.
//! 4. **Controller** ([`controller`]): the per-cycle decision table and output registers.
//!
//! Addresses are split by [`AddressDecoder`](crate::common::AddressDecoder).

/// Per-cycle request orchestration and output registers.
pub mod controller;

/// Line and set values.
pub mod line;

/// Recency rank transitions.
pub mod recency;

/// Hit and victim resolution.
pub mod resolver;

/// Flat storage for every set.
pub mod store;

pub use controller::{Action, CacheController, Request, Response, StepOutcome};
pub use line::{Line, Set};
pub use resolver::{Resolution, resolve};
pub use store::LineStore;
