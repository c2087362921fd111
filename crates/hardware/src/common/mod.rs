//! Common types shared across the cache model.
//!
//! 1. **Address decoding:** splitting request addresses into tag/set/offset.
//! 2. **Constants:** fixed associativity, recency ranks, and width limits.
//! 3. **Errors:** configuration, trace, invariant, and simulation errors.

/// Address decoder and decoded address fields.
pub mod addr;

/// Structural constants and bit-mask helpers.
pub mod constants;

/// Error types.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddr};
pub use constants::{LRU_RANK, MRU_RANK, NUM_WAYS};
pub use error::{ConfigError, InvariantViolation, SimError, TraceError};
