//! True-LRU recency tracking.
//!
//! Each set keeps a 2-bit rank per way: `0` is the most recently used line
//! and `3` the least. Two transitions update the ranks of a whole set at
//! once, both computed from the ranks as they stood at the start of the
//! cycle:
//!
//! - **Promote** (read or write hit): the touched way becomes `0`; every way
//!   that was younger than it ages by one to close the gap. Older ways keep
//!   their rank.
//! - **Allocate** (write miss): the victim becomes `0`; every other way,
//!   valid or not, ages by one, saturating at `3`.
//!
//! Both preserve the invariant that the valid ways' ranks form `0..k`.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per update, W = 4.
//! - **Space Complexity:** 2 bits per line.

use crate::common::constants::{LRU_RANK, MRU_RANK, NUM_WAYS};

/// Ranks after a hit on `touched`.
///
/// Promoting a way that is already MRU leaves every rank unchanged.
pub fn promote(ranks: [u8; NUM_WAYS], touched: usize) -> [u8; NUM_WAYS] {
    let pivot = ranks[touched];
    let mut next = ranks;
    for (way, rank) in next.iter_mut().enumerate() {
        if way == touched {
            *rank = MRU_RANK;
        } else if *rank < pivot {
            *rank += 1;
        }
    }
    next
}

/// Ranks after allocating a new block into `victim`.
pub fn allocate(ranks: [u8; NUM_WAYS], victim: usize) -> [u8; NUM_WAYS] {
    let mut next = ranks;
    for (way, rank) in next.iter_mut().enumerate() {
        *rank = if way == victim {
            MRU_RANK
        } else {
            rank.saturating_add(1).min(LRU_RANK)
        };
    }
    next
}
