//! Cycle-accurate cache controller model.
//!
//! This crate models a 4-way set-associative cache with exact LRU replacement:
//! 1. **Cache:** Line store, hit/victim resolver, recency tracker, and the per-cycle controller.
//! 2. **Common:** Address decoding, structural constants, and error types.
//! 3. **Configuration:** Geometry (address/data widths, set and offset bits) loaded from JSON.
//! 4. **Simulation:** Trace loader and a cycle-by-cycle simulator.
//! 5. **Statistics:** Hit/miss, allocation, and eviction counters.
//!
//! # Example
//!
//! ```
//! use lrusim_core::cache::{CacheController, Request};
//! use lrusim_core::config::CacheGeometry;
//!
//! let mut cache = CacheController::new(CacheGeometry::default());
//! let _ = cache.tick(&Request::write(0x40, 0xAAAA));
//!
//! let outcome = cache.tick(&Request::read(0x40));
//! assert!(outcome.resolution.hit);
//!
//! // Read data is registered: it is visible after the clock edge.
//! assert_eq!(cache.outputs().read_data, 0xAAAA);
//! assert!(cache.outputs().result_valid);
//! ```

/// Cache model (store, resolver, recency tracker, controller).
pub mod cache;
/// Common types and constants (address decoding, errors).
pub mod common;
/// Model configuration (defaults, geometry validation).
pub mod config;
/// Trace loading and the cycle-by-cycle simulator.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Cache controller; construct with `CacheController::new` or `from_config`.
pub use crate::cache::CacheController;
/// Root configuration type; use `Config::default()` or `Config::load`.
pub use crate::config::Config;
/// Trace-driven simulator.
pub use crate::sim::Simulator;
