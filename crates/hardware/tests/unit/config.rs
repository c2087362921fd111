//! Configuration Tests.
//!
//! Defaults, geometry validation, JSON parsing, and file loading.

use std::io::Write;

use lrusim_core::common::ConfigError;
use lrusim_core::config::{CacheConfig, CacheGeometry, Config};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

#[test]
fn defaults_describe_the_reference_cache() {
    let config = Config::default();
    assert!(!config.general.trace_requests);
    assert!(!config.general.check_invariants);
    assert_eq!(
        config.cache,
        CacheConfig {
            addr_width: 32,
            data_width: 32,
            set_bits: 4,
            block_offset: 2,
        }
    );
    assert_eq!(config.cache.geometry().unwrap(), CacheGeometry::default());
}

#[test]
fn default_geometry_accessors() {
    let g = CacheGeometry::default();
    assert_eq!(g.addr_width(), 32);
    assert_eq!(g.data_width(), 32);
    assert_eq!(g.tag_bits(), 26);
    assert_eq!(g.num_sets(), 16);
    assert_eq!(g.line_bytes(), 4);
    assert_eq!(g.data_mask(), 0xFFFF_FFFF);
}

#[test]
fn full_width_data_mask() {
    let g = CacheGeometry::new(64, 64, 4, 2).unwrap();
    assert_eq!(g.data_mask(), u64::MAX);
    assert_eq!(g.tag_bits(), 58);
}

#[rstest]
#[case(0, 32, 4, 2)]
#[case(65, 32, 4, 2)]
fn rejects_address_width(
    #[case] addr: u32,
    #[case] data: u32,
    #[case] set: u32,
    #[case] offset: u32,
) {
    assert!(matches!(
        CacheGeometry::new(addr, data, set, offset),
        Err(ConfigError::AddrWidth(w)) if w == addr
    ));
}

#[rstest]
#[case(0)]
#[case(65)]
fn rejects_data_width(#[case] data: u32) {
    assert!(matches!(
        CacheGeometry::new(32, data, 4, 2),
        Err(ConfigError::DataWidth(w)) if w == data
    ));
}

#[test]
fn rejects_too_many_sets() {
    assert!(matches!(
        CacheGeometry::new(64, 32, 17, 2),
        Err(ConfigError::SetBits(17))
    ));
}

#[rstest]
#[case::exactly_full(8, 4, 4)]
#[case::overflowing(8, 6, 4)]
#[case::huge_offset(32, 4, u32::MAX)]
fn rejects_geometry_without_tag_bits(
    #[case] addr: u32,
    #[case] set: u32,
    #[case] offset: u32,
) {
    assert!(matches!(
        CacheGeometry::new(addr, 32, set, offset),
        Err(ConfigError::NoTagBits { .. })
    ));
}

#[rstest]
#[case::single_tag_bit(8, 4, 3, 1)]
#[case::no_sets(16, 0, 0, 16)]
#[case::max_sets(32, 16, 2, 14)]
fn accepts_edge_geometries(
    #[case] addr: u32,
    #[case] set: u32,
    #[case] offset: u32,
    #[case] tag_bits: u32,
) {
    let g = CacheGeometry::new(addr, 32, set, offset).unwrap();
    assert_eq!(g.tag_bits(), tag_bits);
    assert_eq!(g.num_sets(), 1 << set);
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let config = Config::from_json(r#"{ "cache": { "data_width": 16 } }"#).unwrap();
    assert_eq!(config.cache.data_width, 16);
    assert_eq!(config.cache.addr_width, 32);
    assert_eq!(config.cache.set_bits, 4);
    assert!(!config.general.check_invariants);

    let empty = Config::from_json("{}").unwrap();
    assert_eq!(empty.cache, CacheConfig::default());
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        Config::from_json(r#"{ "cache": { "set_bits": "four" } }"#),
        Err(ConfigError::Parse(_))
    ));
}

/// Parsing succeeds for invalid geometry; validation happens separately.
#[test]
fn json_geometry_is_validated_on_demand() {
    let config = Config::from_json(r#"{ "cache": { "addr_width": 6 } }"#).unwrap();
    assert!(matches!(
        config.cache.geometry(),
        Err(ConfigError::NoTagBits { addr_width: 6, .. })
    ));
}

#[test]
fn load_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "general": {{ "check_invariants": true }}, "cache": {{ "set_bits": 2 }} }}"#
    )
    .unwrap();
    file.flush().unwrap();

    let config = Config::load(file.path()).unwrap();
    assert!(config.general.check_invariants);
    assert_eq!(config.cache.geometry().unwrap().num_sets(), 4);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}
