//! Cache controller.
//!
//! Orchestrates one request per clock cycle:
//!
//! ```text
//!  address ──► decode ──► snapshot set ──► resolve ──► hit (same cycle)
//!                                              │
//!                                              ▼
//!                                    apply decision table
//!                                      │              │
//!                                      ▼              ▼
//!                               commit set     output registers
//!                                              (read_data, result_valid,
//!                                               visible next cycle)
//! ```
//!
//! Write enable takes precedence over read enable. Read misses never mutate
//! state and never allocate. The output registers are only written by read
//! cycles and idle cycles; write cycles leave them holding their value.

use serde::Deserialize;
use tracing::{debug, info, trace, warn};

use super::line::Set;
use super::recency;
use super::resolver::{self, Resolution};
use super::store::LineStore;
use crate::common::addr::{AddressDecoder, DecodedAddr};
use crate::common::error::{ConfigError, InvariantViolation};
use crate::config::{CacheConfig, CacheGeometry};

/// Request inputs sampled in one cycle.
///
/// `write_data` wider than the configured data width is truncated. When
/// deserialised, omitted fields default to zero/false and unknown fields
/// are rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Request {
    /// Byte address.
    pub address: u64,
    /// Data to store when `write_en` is set.
    pub write_data: u64,
    /// Read enable.
    pub read_en: bool,
    /// Write enable. Wins over `read_en` when both are set.
    pub write_en: bool,
}

impl Request {
    /// A read of `address`.
    pub const fn read(address: u64) -> Self {
        Self {
            address,
            write_data: 0,
            read_en: true,
            write_en: false,
        }
    }

    /// A write of `data` to `address`.
    pub const fn write(address: u64, data: u64) -> Self {
        Self {
            address,
            write_data: data,
            read_en: false,
            write_en: true,
        }
    }

    /// Both enables asserted; behaves as a write.
    pub const fn read_write(address: u64, data: u64) -> Self {
        Self {
            address,
            write_data: data,
            read_en: true,
            write_en: true,
        }
    }

    /// No enable asserted.
    pub const fn idle() -> Self {
        Self {
            address: 0,
            write_data: 0,
            read_en: false,
            write_en: false,
        }
    }

    /// Whether either enable is asserted.
    pub const fn is_active(&self) -> bool {
        self.read_en || self.write_en
    }
}

/// Registered outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// Data latched by the last read.
    pub read_data: u64,
    /// The latched data came from a read hit.
    pub result_valid: bool,
}

/// What the controller did in a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// No enable asserted.
    Idle,
    /// Read hit; `data` is the pre-update value latched for the next cycle.
    ReadHit {
        /// Way that hit.
        way: usize,
        /// Value latched into `read_data`.
        data: u64,
    },
    /// Read miss; nothing changed except the output registers.
    ReadMiss,
    /// Write hit; data overwritten in place.
    WriteHit {
        /// Way that hit.
        way: usize,
    },
    /// Write miss; a new block was allocated.
    Allocate {
        /// Victim way that received the block.
        way: usize,
        /// Line-aligned address of the block that was overwritten, if the
        /// victim was valid.
        evicted: Option<u64>,
    },
}

/// Everything observable about one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Decoded request address.
    pub decoded: DecodedAddr,
    /// Resolver output against the start-of-cycle state. `resolution.hit`
    /// is the same-cycle hit signal.
    pub resolution: Resolution,
    /// Decision taken.
    pub action: Action,
}

/// 4-way set-associative cache controller with true-LRU replacement.
#[derive(Clone, Debug)]
pub struct CacheController {
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    store: LineStore,
    outputs: Response,
}

impl CacheController {
    /// Creates a controller in its reset state.
    pub fn new(geometry: CacheGeometry) -> Self {
        Self {
            geometry,
            decoder: AddressDecoder::new(&geometry),
            store: LineStore::new(geometry.num_sets()),
            outputs: Response::default(),
        }
    }

    /// Validates `config` and creates a controller.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is invalid.
    pub fn from_config(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.geometry()?))
    }

    /// Geometry fixed at construction.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Address decoder for this geometry.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Combinational lookup against the current state. Mutates nothing.
    pub fn lookup(&self, address: u64) -> Resolution {
        let decoded = self.decoder.decode(address);
        resolver::resolve(self.store.set(decoded.set_index), decoded.tag)
    }

    /// Registered outputs as currently visible.
    ///
    /// After [`tick`](Self::tick) for cycle N this holds the result of
    /// cycle N's request, i.e. what a reader sees during cycle N+1.
    pub const fn outputs(&self) -> Response {
        self.outputs
    }

    /// The line store.
    pub const fn store(&self) -> &LineStore {
        &self.store
    }

    /// One set of the line store.
    pub fn set(&self, index: usize) -> &Set {
        self.store.set(index)
    }

    /// Checks the invariants of every set.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.store.verify()
    }

    /// Synchronous reset: every line invalid with zero tag, data, and
    /// recency; output registers cleared.
    pub fn reset(&mut self) {
        self.store.clear();
        self.outputs = Response::default();
        info!(sets = self.store.num_sets(), "cache reset");
    }

    /// Advances one clock cycle with `request` on the inputs.
    ///
    /// Resolution sees the state as it stood at the start of the cycle and
    /// every update of the cycle is derived from that snapshot.
    pub fn tick(&mut self, request: &Request) -> StepOutcome {
        let decoded = self.decoder.decode(request.address);
        let mut set = self.store.snapshot(decoded.set_index);
        let resolution = resolver::resolve(&set, decoded.tag);

        let action = if request.write_en {
            let data = request.write_data & self.geometry.data_mask();
            match resolution.hit_way {
                Some(way) => {
                    set.line_mut(way).set_data(data);
                    set.set_ranks(recency::promote(set.ranks(), way));
                    Action::WriteHit { way }
                }
                None => self.allocate(&mut set, decoded, resolution, data),
            }
        } else if request.read_en {
            match resolution.hit_way {
                Some(way) => {
                    let data = set.line(way).data();
                    set.set_ranks(recency::promote(set.ranks(), way));
                    self.outputs = Response {
                        read_data: data,
                        result_valid: true,
                    };
                    Action::ReadHit { way, data }
                }
                None => {
                    self.outputs = Response::default();
                    Action::ReadMiss
                }
            }
        } else {
            self.outputs.result_valid = false;
            Action::Idle
        };

        trace!(
            address = request.address,
            set = decoded.set_index,
            tag = decoded.tag,
            hit = resolution.hit,
            ?action,
            "request"
        );

        self.store.commit(decoded.set_index, set);
        StepOutcome {
            decoded,
            resolution,
            action,
        }
    }

    fn allocate(
        &self,
        set: &mut Set,
        decoded: DecodedAddr,
        resolution: Resolution,
        data: u64,
    ) -> Action {
        let way = resolution.victim_way;
        if resolution.victim_fallback {
            warn!(
                set = decoded.set_index,
                ranks = ?set.ranks(),
                "no way at LRU rank in a full set; evicting way 0"
            );
        }

        let victim = *set.line(way);
        let evicted = victim
            .valid()
            .then(|| self.decoder.compose(victim.tag(), decoded.set_index));
        if let Some(addr) = evicted {
            debug!(set = decoded.set_index, way, evicted = addr, "evict");
        }

        set.line_mut(way).fill(decoded.tag, data);
        set.set_ranks(recency::allocate(set.ranks(), way));
        Action::Allocate { way, evicted }
    }

    /// Renders every set holding at least one valid line.
    pub fn dump_state(&self) -> String {
        self.store.to_string()
    }
}
