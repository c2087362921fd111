//! Line and set state.
//!
//! A [`Line`] is one way of a set: valid bit, tag, data word, and the 2-bit
//! recency rank. A [`Set`] is the four lines an address can map to. Both are
//! plain `Copy` values so a set can be snapshotted, updated as a whole, and
//! written back in one step.

use crate::common::constants::{NUM_WAYS, RECENCY_MASK};
use crate::common::error::InvariantViolation;

/// One cache line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Line {
    valid: bool,
    tag: u64,
    data: u64,
    recency: u8,
}

impl Line {
    /// Creates a line. `recency` is truncated to its 2-bit register width.
    pub const fn new(valid: bool, tag: u64, data: u64, recency: u8) -> Self {
        Self {
            valid,
            tag,
            data,
            recency: recency & RECENCY_MASK,
        }
    }

    /// Whether the line holds a block.
    #[inline]
    pub const fn valid(&self) -> bool {
        self.valid
    }

    /// Tag of the resident block. Meaningless while invalid.
    #[inline]
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// Stored data word.
    #[inline]
    pub const fn data(&self) -> u64 {
        self.data
    }

    /// Recency rank, `0` = most recently used.
    ///
    /// Not meaningful until the line becomes valid.
    #[inline]
    pub const fn recency(&self) -> u8 {
        self.recency
    }

    /// Whether this line is valid and holds `tag`.
    #[inline]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }

    /// Overwrites the line with a newly allocated block.
    #[inline]
    pub(crate) const fn fill(&mut self, tag: u64, data: u64) {
        self.valid = true;
        self.tag = tag;
        self.data = data;
    }

    #[inline]
    pub(crate) const fn set_data(&mut self, data: u64) {
        self.data = data;
    }
}

/// The four lines sharing one set index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Set {
    lines: [Line; NUM_WAYS],
}

impl Set {
    /// Builds a set from explicit lines.
    pub const fn from_lines(lines: [Line; NUM_WAYS]) -> Self {
        Self { lines }
    }

    /// The lines, indexed by way.
    pub const fn lines(&self) -> &[Line; NUM_WAYS] {
        &self.lines
    }

    /// The line in `way`.
    ///
    /// # Panics
    ///
    /// Panics if `way >= NUM_WAYS`.
    pub const fn line(&self, way: usize) -> &Line {
        &self.lines[way]
    }

    pub(crate) const fn line_mut(&mut self, way: usize) -> &mut Line {
        &mut self.lines[way]
    }

    /// Recency rank of every way.
    pub fn ranks(&self) -> [u8; NUM_WAYS] {
        self.lines.map(|line| line.recency)
    }

    /// Replaces every way's recency rank.
    pub(crate) fn set_ranks(&mut self, ranks: [u8; NUM_WAYS]) {
        for (line, rank) in self.lines.iter_mut().zip(ranks) {
            line.recency = rank & RECENCY_MASK;
        }
    }

    /// Valid bit of every way.
    pub fn valid_bits(&self) -> [bool; NUM_WAYS] {
        self.lines.map(|line| line.valid)
    }

    /// Number of valid ways.
    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Checks the structural invariants of this set.
    ///
    /// Among valid lines the recency ranks must be exactly `0..k` for `k`
    /// valid lines, and no tag may appear twice. Invalid lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found, tagged with `set_index`.
    pub fn verify(&self, set_index: usize) -> Result<(), InvariantViolation> {
        let count = self.valid_count();
        let mut seen = [false; NUM_WAYS];
        for line in self.lines.iter().filter(|line| line.valid) {
            let rank = line.recency as usize;
            if rank >= count || seen[rank] {
                return Err(InvariantViolation::RecencyNotPermutation {
                    set: set_index,
                    ranks: self.ranks(),
                    valid: self.valid_bits(),
                    count,
                });
            }
            seen[rank] = true;
        }

        for first in 0..NUM_WAYS {
            for second in first + 1..NUM_WAYS {
                let (a, b) = (&self.lines[first], &self.lines[second]);
                if a.valid && b.valid && a.tag == b.tag {
                    return Err(InvariantViolation::DuplicateTag {
                        set: set_index,
                        tag: a.tag,
                        first,
                        second,
                    });
                }
            }
        }
        Ok(())
    }
}
