//! Property Tests Against a Reference LRU Model.
//!
//! Random request streams over a few sets and a small tag space are applied
//! to the controller and to a stack-based LRU oracle. Actions, tags, ranks,
//! and the registered outputs must agree after every cycle.

use lrusim_core::cache::{Action, CacheController, Request, Response};
use lrusim_core::common::NUM_WAYS;
use lrusim_core::config::CacheGeometry;
use proptest::prelude::*;

use crate::common::harness::addr;
use crate::common::reference::{RefAction, RefSet};

const SETS: usize = 3;

#[derive(Clone, Copy, Debug)]
struct Op {
    set: usize,
    tag: u64,
    data: u64,
    read_en: bool,
    write_en: bool,
}

fn op() -> impl Strategy<Value = Op> {
    (0..SETS, 0u64..7, any::<u32>(), any::<bool>(), any::<bool>()).prop_map(
        |(set, tag, data, read_en, write_en)| Op {
            set,
            tag,
            data: u64::from(data),
            read_en,
            write_en,
        },
    )
}

fn to_ref(action: Action) -> RefAction {
    match action {
        Action::Idle => RefAction::Idle,
        Action::ReadHit { way, data } => RefAction::ReadHit { way, data },
        Action::ReadMiss => RefAction::ReadMiss,
        Action::WriteHit { way } => RefAction::WriteHit { way },
        Action::Allocate { way, .. } => RefAction::Allocate { way },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn controller_matches_reference(ops in prop::collection::vec(op(), 1..200)) {
        let mut cache = CacheController::new(CacheGeometry::default());
        let mut model: Vec<RefSet> = vec![RefSet::default(); SETS];
        let mut latch = Response::default();

        for (cycle, op) in ops.iter().enumerate() {
            let request = Request {
                address: addr(op.tag, op.set),
                write_data: op.data,
                read_en: op.read_en,
                write_en: op.write_en,
            };
            let outcome = cache.tick(&request);
            let expected = model[op.set].step(op.tag, op.data, op.read_en, op.write_en);

            prop_assert_eq!(to_ref(outcome.action), expected, "cycle {}", cycle);
            prop_assert!(!outcome.resolution.victim_fallback);
            prop_assert!(cache.verify().is_ok(), "cycle {}: {:?}", cycle, cache.verify());

            match expected {
                RefAction::ReadHit { data, .. } => {
                    latch = Response { read_data: data, result_valid: true };
                }
                RefAction::ReadMiss => latch = Response::default(),
                RefAction::Idle => latch.result_valid = false,
                RefAction::WriteHit { .. } | RefAction::Allocate { .. } => {}
            }
            prop_assert_eq!(cache.outputs(), latch, "cycle {}", cycle);

            let set = cache.set(op.set);
            for way in 0..NUM_WAYS {
                let line = set.line(way);
                match model[op.set].tags[way] {
                    Some(tag) => {
                        prop_assert!(line.valid());
                        prop_assert_eq!(line.tag(), tag);
                        prop_assert_eq!(line.data(), model[op.set].data[way]);
                        prop_assert_eq!(Some(line.recency()), model[op.set].rank(way));
                    }
                    None => prop_assert!(!line.valid()),
                }
            }
        }
    }

    /// Valid ways always form a prefix, so an allocating miss never has to
    /// fall back to way 0.
    #[test]
    fn valid_ways_form_a_prefix(ops in prop::collection::vec(op(), 1..120)) {
        let mut cache = CacheController::new(CacheGeometry::default());
        for op in &ops {
            let _ = cache.tick(&Request {
                address: addr(op.tag, op.set),
                write_data: op.data,
                read_en: op.read_en,
                write_en: op.write_en,
            });
            for (_, set) in cache.store().iter() {
                let k = set.valid_count();
                let valid = set.valid_bits();
                prop_assert!(valid[..k].iter().all(|v| *v));
                prop_assert!(valid[k..].iter().all(|v| !*v));
                prop_assert!(set.ranks()[k..].iter().all(|r| usize::from(*r) >= k.min(3)));
            }
        }
    }

    /// A read immediately after a write to the same address returns the
    /// written data, whatever came before.
    #[test]
    fn read_after_write_returns_written_data(
        prefix in prop::collection::vec(op(), 0..60),
        tag in 0u64..7,
        set in 0..SETS,
        data in any::<u32>(),
    ) {
        let mut cache = CacheController::new(CacheGeometry::default());
        for op in &prefix {
            let _ = cache.tick(&Request {
                address: addr(op.tag, op.set),
                write_data: op.data,
                read_en: op.read_en,
                write_en: op.write_en,
            });
        }
        let _ = cache.tick(&Request::write(addr(tag, set), u64::from(data)));
        let outcome = cache.tick(&Request::read(addr(tag, set)));
        prop_assert!(outcome.resolution.hit);
        prop_assert_eq!(cache.outputs().read_data, u64::from(data));
        prop_assert!(cache.outputs().result_valid);
    }
}
