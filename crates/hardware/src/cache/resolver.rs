//! Hit/victim resolution.
//!
//! Combinational logic over a snapshot of one set. Given the four lines and
//! the request tag it reports whether the tag is resident, in which way, and
//! which way an allocating miss would overwrite. Victim selection does not
//! depend on the hit result and is always computed.
//!
//! # Victim priority
//!
//! 1. The lowest-numbered invalid way.
//! 2. Otherwise the way whose recency rank is [`LRU_RANK`].
//! 3. Otherwise way 0. This last case only arises from an inconsistent
//!    recency state and is reported through [`Resolution::victim_fallback`]
//!    rather than treated as an error.

use crate::cache::line::Set;
use crate::common::constants::{FALLBACK_VICTIM, LRU_RANK};

/// Outcome of resolving a tag against a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The tag is resident in a valid line.
    pub hit: bool,
    /// Way holding the tag, when `hit`.
    pub hit_way: Option<usize>,
    /// Way an allocating miss would overwrite.
    pub victim_way: usize,
    /// `victim_way` came from the way-0 fallback: the set was full and no
    /// way carried the LRU rank.
    pub victim_fallback: bool,
}

/// Resolves `tag` against `set`.
///
/// When more than one valid way holds `tag` the highest-numbered one wins.
/// The same last-match rule applies among ways sharing the LRU rank.
pub fn resolve(set: &Set, tag: u64) -> Resolution {
    let mut hit_way = None;
    let mut lru_way = None;
    for (way, line) in set.lines().iter().enumerate() {
        if line.matches(tag) {
            hit_way = Some(way);
        }
        if line.recency() == LRU_RANK {
            lru_way = Some(way);
        }
    }

    let invalid_way = set.lines().iter().position(|line| !line.valid());
    let (victim_way, victim_fallback) = match (invalid_way, lru_way) {
        (Some(way), _) => (way, false),
        (None, Some(way)) => (way, false),
        (None, None) => (FALLBACK_VICTIM, true),
    };

    Resolution {
        hit: hit_way.is_some(),
        hit_way,
        victim_way,
        victim_fallback,
    }
}
