//! Line store.
//!
//! Authoritative state for every line of the cache, laid out as one flat
//! arena of sets allocated once at construction. Sets are read out as
//! `Copy` snapshots and written back whole, so all updates for a cycle are
//! computed from a single consistent view.

use std::fmt;

use crate::cache::line::Set;
use crate::common::error::InvariantViolation;

/// Backing storage for all sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineStore {
    sets: Box<[Set]>,
}

impl LineStore {
    /// Creates a store of `num_sets` all-invalid sets.
    pub fn new(num_sets: usize) -> Self {
        Self {
            sets: vec![Set::default(); num_sets].into_boxed_slice(),
        }
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Snapshot of one set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_sets()`. Decoded set indices are always in range.
    #[inline]
    pub fn snapshot(&self, index: usize) -> Set {
        self.sets[index]
    }

    /// Borrow of one set.
    pub fn set(&self, index: usize) -> &Set {
        &self.sets[index]
    }

    /// Writes back an updated set.
    #[inline]
    pub(crate) fn commit(&mut self, index: usize, set: Set) {
        self.sets[index] = set;
    }

    /// Iterates over `(set_index, set)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Set)> {
        self.sets.iter().enumerate()
    }

    /// Returns every line to invalid with zero tag, data, and recency.
    pub fn clear(&mut self) {
        self.sets.fill(Set::default());
    }

    /// Checks the invariants of every set.
    ///
    /// # Errors
    ///
    /// Returns the violation from the lowest-numbered failing set.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.iter().try_for_each(|(index, set)| set.verify(index))
    }
}

impl fmt::Display for LineStore {
    /// One row per set that holds a valid line; invalid ways print as `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, set) in self.iter().filter(|(_, set)| set.valid_count() > 0) {
            write!(f, "set {index:>4}:")?;
            for (way, line) in set.lines().iter().enumerate() {
                if line.valid() {
                    write!(
                        f,
                        "  w{way}[tag={:#x} data={:#x} r={}]",
                        line.tag(),
                        line.data(),
                        line.recency()
                    )?;
                } else {
                    write!(f, "  w{way}[-]")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
