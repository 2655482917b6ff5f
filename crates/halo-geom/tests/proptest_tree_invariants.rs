// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::collections::BTreeMap;

use halo_geom::{AcceptAll, Circle, CircleTree, NodeId};
use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};

// Random op sequences against a brute-force model. The seed is pinned so a
// failure reproduces everywhere; override with PROPTEST_SEED locally.

#[derive(Debug, Clone)]
enum Op {
    Insert(Circle),
    Remove(usize),
    Move(usize, Circle),
    Query(Circle),
}

fn circle() -> impl Strategy<Value = Circle> {
    (-500.0f64..500.0, -500.0f64..500.0, 0.0f64..40.0).prop_map(|(x, y, r)| Circle::new(x, y, r))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => circle().prop_map(Op::Insert),
        2 => any::<usize>().prop_map(Op::Remove),
        3 => (any::<usize>(), circle()).prop_map(|(i, c)| Op::Move(i, c)),
        2 => circle().prop_map(Op::Query),
    ]
}

fn pinned_runner(cases: u32) -> TestRunner {
    const SEED_BYTES: [u8; 32] = [
        0x0c, 0x1c, 0x1e, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0,
    ];
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    TestRunner::new_with_rng(
        PropConfig {
            cases,
            ..PropConfig::default()
        },
        rng,
    )
}

#[test]
fn proptest_seed_pinned_tree_matches_brute_force() {
    let mut runner = pinned_runner(64);
    let ops = prop::collection::vec(op(), 1..200);

    runner
        .run(&ops, |ops| {
            let mut tree = CircleTree::new();
            // payload -> (leaf id, circle)
            let mut model: BTreeMap<u32, (NodeId, Circle)> = BTreeMap::new();
            let mut next = 0u32;

            for op in ops {
                match op {
                    Op::Insert(c) => {
                        let id = tree.insert(c, next);
                        model.insert(next, (id, c));
                        next += 1;
                    }
                    Op::Remove(pick) if !model.is_empty() => {
                        let key = *model.keys().nth(pick % model.len()).expect("index in range");
                        let (id, _) = model.remove(&key).expect("key present");
                        prop_assert_eq!(tree.remove(id), Some(key));
                    }
                    Op::Move(pick, c) if !model.is_empty() => {
                        let key = *model.keys().nth(pick % model.len()).expect("index in range");
                        let entry = model.get_mut(&key).expect("key present");
                        prop_assert!(tree.repair(entry.0, c));
                        entry.1 = c;
                    }
                    Op::Query(region) => {
                        let mut got = tree.query_intersections(&region, &AcceptAll);
                        got.sort_unstable();
                        let want: Vec<u32> = model
                            .iter()
                            .filter(|(_, (_, c))| c.intersects(&region))
                            .map(|(k, _)| *k)
                            .collect();
                        prop_assert_eq!(got, want);
                    }
                    Op::Remove(_) | Op::Move(..) => {}
                }
                prop_assert_eq!(tree.validate(), Ok(()));
                prop_assert_eq!(tree.len(), model.len());
            }

            for (key, (id, c)) in &model {
                let hits = tree.query_point(c.x(), c.y(), &AcceptAll);
                prop_assert!(hits.contains(key));
                prop_assert_eq!(tree.node(*id).and_then(|n| n.payload()), Some(key));
            }
            Ok(())
        })
        .expect("tree invariants hold under random edits");
}

#[test]
fn proptest_seed_pinned_one_intersecting_agrees_with_full_query() {
    let mut runner = pinned_runner(48);
    let input = (prop::collection::vec(circle(), 1..80), circle(), any::<usize>());

    runner
        .run(&input, |(circles, region, pick)| {
            let mut tree = CircleTree::new();
            let ids: Vec<NodeId> = circles
                .iter()
                .enumerate()
                .map(|(i, c)| tree.insert(*c, i))
                .collect();
            let start = pick % ids.len();

            let all = tree.query_intersections(&region, &AcceptAll);
            let others: Vec<usize> = all.iter().copied().filter(|i| *i != start).collect();

            let first = tree.query_one_intersecting(None, &region, &AcceptAll);
            prop_assert_eq!(first.is_some(), !all.is_empty());
            if let Some(hit) = first {
                prop_assert!(all.contains(&hit));
            }

            let near = tree.query_one_intersecting(Some(ids[start]), &region, &AcceptAll);
            prop_assert_eq!(near.is_some(), !others.is_empty());
            if let Some(hit) = near {
                prop_assert!(others.contains(&hit));
            }
            Ok(())
        })
        .expect("one-hit search agrees with exhaustive query");
}
