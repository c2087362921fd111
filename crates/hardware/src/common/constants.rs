//! Structural constants shared by every part of the cache model.
//!
//! The associativity is fixed at four ways; everything else about the
//! address layout is configurable through [`CacheConfig`](crate::config::CacheConfig)
//! and bounded by the limits below.

/// Number of ways (lines) in every set.
pub const NUM_WAYS: usize = 4;

/// Recency rank of the most recently used line in a set.
pub const MRU_RANK: u8 = 0;

/// Recency rank of the least recently used line in a set.
///
/// Recency counters are two bits wide, so this is also the saturation
/// point of the allocate-on-miss ageing rule.
pub const LRU_RANK: u8 = (NUM_WAYS - 1) as u8;

/// Mask applied to recency values to model the 2-bit counter register.
pub const RECENCY_MASK: u8 = 0b11;

/// Way selected as victim when a fully valid set has no line at [`LRU_RANK`].
pub const FALLBACK_VICTIM: usize = 0;

/// Widest address or data bus the model accepts, in bits.
pub const MAX_BUS_WIDTH: u32 = 64;

/// Largest supported set-index width (65,536 sets).
pub const MAX_SET_BITS: u32 = 16;

/// Returns a mask with the low `width` bits set.
///
/// Widths of 64 and above produce `u64::MAX`.
#[inline]
pub const fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
