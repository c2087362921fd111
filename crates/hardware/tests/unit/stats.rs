//! Statistics Tests.
//!
//! Counter updates per action, hit-rate arithmetic, and section rendering.

use lrusim_core::cache::{Action, CacheController, Request, Resolution, StepOutcome};
use lrusim_core::common::DecodedAddr;
use lrusim_core::config::CacheGeometry;
use lrusim_core::stats::{CacheStats, STATS_SECTIONS};
use pretty_assertions::assert_eq;

use crate::common::harness::addr;

/// Runs `requests` through a fresh cache and returns the counters.
fn collect(requests: &[Request]) -> CacheStats {
    let mut cache = CacheController::new(CacheGeometry::default());
    let mut stats = CacheStats::default();
    for request in requests {
        stats.record(&cache.tick(request));
    }
    stats
}

#[test]
fn empty_stats_have_zero_rates() {
    let stats = CacheStats::default();
    assert_eq!(stats.cycles, 0);
    assert!(stats.hit_rate().abs() < f64::EPSILON);
    assert!(stats.read_hit_rate().abs() < f64::EPSILON);
    assert!(stats.write_hit_rate().abs() < f64::EPSILON);
}

#[test]
fn counts_each_action_kind() {
    let stats = collect(&[
        Request::write(addr(1, 0), 1),
        Request::write(addr(1, 0), 2),
        Request::read(addr(1, 0)),
        Request::read(addr(2, 0)),
        Request::idle(),
        Request::read_write(addr(3, 0), 3),
    ]);
    assert_eq!(stats.cycles, 6);
    assert_eq!(stats.writes, 3);
    assert_eq!(stats.write_hits, 1);
    assert_eq!(stats.write_misses, 2);
    assert_eq!(stats.reads, 2);
    assert_eq!(stats.read_hits, 1);
    assert_eq!(stats.read_misses, 1);
    assert_eq!(stats.idle_cycles, 1);
    assert_eq!(stats.evictions, 0);
}

#[test]
fn evictions_only_count_valid_victims() {
    let requests: Vec<Request> = (0..6).map(|tag| Request::write(addr(tag, 0), tag)).collect();
    let stats = collect(&requests);
    assert_eq!(stats.write_misses, 6);
    assert_eq!(stats.evictions, 2);
    assert_eq!(stats.victim_fallbacks, 0);
}

#[test]
fn rates() {
    let stats = collect(&[
        Request::write(addr(1, 0), 1),
        Request::read(addr(1, 0)),
        Request::read(addr(1, 0)),
        Request::read(addr(2, 0)),
    ]);
    assert!((stats.read_hit_rate() - 2.0 / 3.0).abs() < 1e-12);
    assert!(stats.write_hit_rate().abs() < f64::EPSILON);
    assert!((stats.hit_rate() - 0.5).abs() < 1e-12);
}

#[test]
fn reset_counts_as_a_cycle() {
    let mut stats = CacheStats::default();
    stats.record_reset();
    stats.record_reset();
    assert_eq!(stats.cycles, 2);
    assert_eq!(stats.resets, 2);
}

#[test]
fn render_all_sections_by_default() {
    let out = collect(&[Request::write(0, 1), Request::read(0)]).render_sections(&[]);
    assert!(out.contains("CACHE SIMULATION STATISTICS"));
    assert!(out.contains("sim_cycles               2"));
    assert!(out.contains("hit_rate                 50.00%"));
    assert!(out.contains("READS"));
    assert!(out.contains("  read.hits              1"));
    assert!(out.contains("WRITES"));
    assert!(out.contains("  write.allocations      1"));
    assert!(out.contains("REPLACEMENT"));
}

#[test]
fn render_selected_sections_only() {
    let stats = collect(&[Request::read(0)]);
    let out = stats.render_sections(&["replacement".to_string()]);
    assert!(out.contains("REPLACEMENT"));
    assert!(out.contains("victim_fallbacks"));
    assert!(!out.contains("READS"));
    assert!(!out.contains("sim_cycles"));
}

#[test]
fn every_section_name_renders_something() {
    let stats = CacheStats::default();
    let header_only = stats.render_sections(&["none".to_string()]);
    for section in STATS_SECTIONS {
        let out = stats.render_sections(&[(*section).to_string()]);
        assert!(out.len() > header_only.len(), "section {section}");
    }
}

/// A way-0 fallback allocation over a valid line counts as both an eviction
/// and a fallback. Such states cannot be reached through `tick`, so the
/// outcome is built by hand.
#[test]
fn victim_fallback_is_counted() {
    let outcome = StepOutcome {
        decoded: DecodedAddr {
            tag: 99,
            set_index: 0,
            offset: 0,
        },
        resolution: Resolution {
            hit: false,
            hit_way: None,
            victim_way: 0,
            victim_fallback: true,
        },
        action: Action::Allocate {
            way: 0,
            evicted: Some(addr(10, 0)),
        },
    };
    let mut stats = CacheStats::default();
    stats.record(&outcome);
    stats.record(&outcome);

    assert_eq!(stats.victim_fallbacks, 2);
    assert_eq!(stats.evictions, 2);
    assert_eq!(stats.write_misses, 2);
    let out = stats.render_sections(&["replacement".to_string()]);
    assert!(out.contains("  victim_fallbacks       2"));
}

/// Ordinary evictions never count as fallbacks.
#[test]
fn lru_eviction_is_not_a_fallback() {
    let mut requests: Vec<Request> = (0..4).map(|tag| Request::write(addr(tag, 0), tag)).collect();
    requests.push(Request::write(addr(4, 0), 4));
    let stats = collect(&requests);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.victim_fallbacks, 0);
}
