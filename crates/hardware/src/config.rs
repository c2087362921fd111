//! Configuration for the cache model.
//!
//! This module defines the configuration structures used to parameterize
//! the model. It provides:
//! 1. **Defaults:** The baseline geometry (32-bit address and data, 16 sets, 4-byte lines).
//! 2. **Structures:** `Config` with general and cache sections, deserialised from JSON.
//! 3. **Validation:** `CacheGeometry`, the checked form every cache component is built from.
//!
//! Geometry is fixed at construction. Use `Config::default()` or load a JSON file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{MAX_BUS_WIDTH, MAX_SET_BITS, low_mask};
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Request address width in bits.
    pub const ADDR_WIDTH: u32 = 32;

    /// Data word width in bits.
    pub const DATA_WIDTH: u32 = 32;

    /// Set-index width in bits (16 sets).
    pub const SET_BITS: u32 = 4;

    /// Block-offset width in bits (4-byte lines).
    ///
    /// Offset bits take no part in lookup; every address inside a line
    /// shares the same tag and set.
    pub const BLOCK_OFFSET: u32 = 2;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use lrusim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.cache.addr_width, 32);
/// assert_eq!(config.cache.set_bits, 4);
/// ```
///
/// Deserializing from JSON, with omitted fields taking their defaults:
///
/// ```
/// use lrusim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_requests": true },
///     "cache": { "set_bits": 6, "block_offset": 4 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_requests);
/// assert_eq!(config.cache.data_width, 32);
/// assert_eq!(config.cache.geometry().unwrap().tag_bits(), 22);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache geometry
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the JSON is malformed or a field has
    /// the wrong type. Geometry is not validated here.
    ///
    /// ```
    /// use lrusim_core::common::ConfigError;
    /// use lrusim_core::config::Config;
    ///
    /// let err = Config::from_json(r#"{ "cache": { "set_bits": "four" } }"#).unwrap_err();
    /// assert!(matches!(err, ConfigError::Parse(_)));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit a trace-level event for every request
    #[serde(default)]
    pub trace_requests: bool,

    /// Verify set invariants after every simulated cycle
    #[serde(default)]
    pub check_invariants: bool,
}

/// Structural cache parameters as written in configuration.
///
/// Unchecked; call [`CacheConfig::geometry`] to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Address width in bits
    #[serde(default = "CacheConfig::default_addr_width")]
    pub addr_width: u32,

    /// Data word width in bits
    #[serde(default = "CacheConfig::default_data_width")]
    pub data_width: u32,

    /// Set-index width in bits; the cache has `2^set_bits` sets
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,

    /// Block-offset width in bits; lines are `2^block_offset` bytes
    #[serde(default = "CacheConfig::default_block_offset")]
    pub block_offset: u32,
}

impl CacheConfig {
    fn default_addr_width() -> u32 {
        defaults::ADDR_WIDTH
    }

    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    fn default_block_offset() -> u32 {
        defaults::BLOCK_OFFSET
    }

    /// Validates the parameters and returns the checked geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a width is out of range or when the set
    /// index and block offset leave no room for a tag.
    pub fn geometry(&self) -> Result<CacheGeometry, ConfigError> {
        CacheGeometry::new(
            self.addr_width,
            self.data_width,
            self.set_bits,
            self.block_offset,
        )
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            addr_width: defaults::ADDR_WIDTH,
            data_width: defaults::DATA_WIDTH,
            set_bits: defaults::SET_BITS,
            block_offset: defaults::BLOCK_OFFSET,
        }
    }
}

/// Validated cache geometry.
///
/// Can only be built through [`CacheGeometry::new`] (or
/// [`CacheConfig::geometry`]), so every holder may rely on
/// `set_bits + block_offset < addr_width <= 64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    addr_width: u32,
    data_width: u32,
    set_bits: u32,
    block_offset: u32,
}

impl CacheGeometry {
    /// Checks and builds a geometry.
    ///
    /// # Errors
    ///
    /// See [`CacheConfig::geometry`].
    pub fn new(
        addr_width: u32,
        data_width: u32,
        set_bits: u32,
        block_offset: u32,
    ) -> Result<Self, ConfigError> {
        if addr_width == 0 || addr_width > MAX_BUS_WIDTH {
            return Err(ConfigError::AddrWidth(addr_width));
        }
        if data_width == 0 || data_width > MAX_BUS_WIDTH {
            return Err(ConfigError::DataWidth(data_width));
        }
        if set_bits > MAX_SET_BITS {
            return Err(ConfigError::SetBits(set_bits));
        }
        if set_bits.saturating_add(block_offset) >= addr_width {
            return Err(ConfigError::NoTagBits {
                addr_width,
                set_bits,
                block_offset,
            });
        }
        Ok(Self {
            addr_width,
            data_width,
            set_bits,
            block_offset,
        })
    }

    /// Address width in bits.
    pub const fn addr_width(&self) -> u32 {
        self.addr_width
    }

    /// Data width in bits.
    pub const fn data_width(&self) -> u32 {
        self.data_width
    }

    /// Set-index width in bits.
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Block-offset width in bits.
    pub const fn block_offset(&self) -> u32 {
        self.block_offset
    }

    /// Tag width: every address bit above the set index.
    pub const fn tag_bits(&self) -> u32 {
        self.addr_width - self.set_bits - self.block_offset
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> u64 {
        1 << self.block_offset
    }

    /// Mask selecting the data bits stored in a line.
    pub const fn data_mask(&self) -> u64 {
        low_mask(self.data_width)
    }
}

impl Default for CacheGeometry {
    fn default() -> Self {
        Self {
            addr_width: defaults::ADDR_WIDTH,
            data_width: defaults::DATA_WIDTH,
            set_bits: defaults::SET_BITS,
            block_offset: defaults::BLOCK_OFFSET,
        }
    }
}
