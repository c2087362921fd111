//! Address decoding.
//!
//! Splits a request address into its three fields. With the default
//! 32-bit geometry the layout is:
//!
//! ```text
//!  31                      6 5        2 1      0
//! +-------------------------+----------+--------+
//! |        tag (26)         | set (4)  | off (2)|
//! +-------------------------+----------+--------+
//! ```
//!
//! Decoding is a pure function of the address; every value is valid input.
//! Bits above the configured address width are ignored.

use crate::common::constants::low_mask;
use crate::config::CacheGeometry;

/// An address split into tag, set-index, and block-offset fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DecodedAddr {
    /// High-order bits identifying the memory block.
    pub tag: u64,
    /// Set the address maps to.
    pub set_index: usize,
    /// Byte offset within the line. Never used for lookup.
    pub offset: u64,
}

/// Stateless address decoder for a fixed cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    addr_mask: u64,
    offset_bits: u32,
    set_bits: u32,
}

impl AddressDecoder {
    /// Creates a decoder for the given (already validated) geometry.
    pub const fn new(geometry: &CacheGeometry) -> Self {
        Self {
            addr_mask: low_mask(geometry.addr_width()),
            offset_bits: geometry.block_offset(),
            set_bits: geometry.set_bits(),
        }
    }

    /// Splits `address` into tag and set index.
    #[inline]
    pub const fn decode(&self, address: u64) -> DecodedAddr {
        let address = address & self.addr_mask;
        DecodedAddr {
            tag: address >> (self.offset_bits + self.set_bits),
            set_index: ((address >> self.offset_bits) & low_mask(self.set_bits)) as usize,
            offset: address & low_mask(self.offset_bits),
        }
    }

    /// Rebuilds the line-aligned address for a tag/set pair.
    ///
    /// Used when reporting which block an allocation evicted.
    #[inline]
    pub const fn compose(&self, tag: u64, set_index: usize) -> u64 {
        (((tag << self.set_bits) | set_index as u64) << self.offset_bits) & self.addr_mask
    }
}
