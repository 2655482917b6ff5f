// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Concurrent use of the locked checker handle.

use std::thread;

use halo_collision::{CheckerConfig, SharedCollisionChecker};
use halo_dry_tests::{random_world, BodyId, ScenarioSpec};

#[test]
fn concurrent_writers_and_readers_leave_a_consistent_tree() {
    let world = random_world(
        &ScenarioSpec {
            count: 400,
            ..ScenarioSpec::default()
        },
        11,
    );
    let shared = SharedCollisionChecker::<BodyId>::new(CheckerConfig::default())
        .expect("valid config");
    let ids = world.ids();

    thread::scope(|s| {
        for chunk in ids.chunks(100) {
            let shared = shared.clone();
            let world = &world;
            s.spawn(move || {
                for id in chunk {
                    assert_eq!(shared.add_object(world, *id), Ok(true));
                }
            });
        }
    });
    assert_eq!(shared.len(), 400);
    assert!(shared.audit().is_ok());

    thread::scope(|s| {
        for chunk in ids.chunks(100) {
            let shared = shared.clone();
            s.spawn(move || {
                for id in chunk.iter().step_by(2) {
                    shared.remove_object(*id).expect("tracked");
                }
            });
        }
        let reader = shared.clone();
        let world = &world;
        s.spawn(move || {
            for _ in 0..50 {
                let hits = reader.read(|c| c.objects_in_range(world, 50.0, 50.0, 20.0, None));
                assert!(hits.is_ok());
            }
        });
    });

    assert_eq!(shared.len(), 200);
    assert!(shared.audit().is_ok());
    assert_eq!(shared.read(|c| c.tree().len()), 200);
}

#[test]
fn poisoned_lock_is_recovered() {
    let world = random_world(
        &ScenarioSpec {
            count: 10,
            ..ScenarioSpec::default()
        },
        2,
    );
    let shared = SharedCollisionChecker::<BodyId>::new(CheckerConfig::default())
        .expect("valid config");
    shared.add_object(&world, BodyId(0)).expect("add");

    let poisoner = shared.clone();
    let outcome = thread::spawn(move || {
        poisoner.read(|_| panic!("reader panicked while holding the lock"));
    })
    .join();
    assert!(outcome.is_err());

    assert_eq!(shared.len(), 1);
    assert!(shared.audit().is_ok());
}
