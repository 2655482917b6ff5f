// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use halo_collision::{CollisionChecker, WorldView};
use halo_dry_tests::{
    brute_force_in_range, brute_force_intersecting, jitter, random_world, track_all, BodyId, Kind,
    ScenarioSpec, ToyWorld,
};
use halo_geom::Circle;
use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Moving populations checked frame by frame against brute force. The cell size
// is a power of two so scaled and unscaled overlap tests agree exactly.
const CELL: f64 = 4.0;

fn sorted(mut ids: Vec<BodyId>) -> Vec<BodyId> {
    ids.sort();
    ids
}

fn kind_filter() -> impl Strategy<Value = Option<Kind>> {
    prop_oneof![
        Just(None),
        Just(Some(Kind::Any)),
        Just(Some(Kind::Rock)),
        Just(Some(Kind::Ship)),
        Just(Some(Kind::Bullet)),
    ]
}

fn check_frame(
    world: &ToyWorld,
    checker: &CollisionChecker<BodyId>,
    probe: (f64, f64, f64),
    class: Option<Kind>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(checker.audit(), Ok(()));
    prop_assert_eq!(checker.len(), world.len());

    let (x, y, r) = probe;
    let got = checker
        .objects_in_range(world, x, y, r, class.as_ref())
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(
        sorted(got),
        brute_force_in_range(world, &Circle::new(x, y, r), class)
    );

    for id in world.ids().into_iter().take(8) {
        let got = checker
            .intersecting_objects(world, id, class.as_ref())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let want = brute_force_intersecting(world, id, class);
        prop_assert_eq!(sorted(got), want.clone());

        let one = checker
            .one_intersecting_object(world, id, class.as_ref())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(one.is_some(), !want.is_empty());
        if let Some(hit) = one {
            prop_assert!(want.contains(&hit));
        }

        let (cx, cy) = world.location(id);
        for n in checker.neighbours(world, id, 2, true, class.as_ref()) {
            let (nx, ny) = world.location(n);
            let reach = (nx - cx).abs().max((ny - cy).abs());
            prop_assert!(reach > 0 && reach <= 2);
        }
    }
    Ok(())
}

#[test]
fn proptest_seed_pinned_moving_population_matches_brute_force() {
    const SEED_BYTES: [u8; 32] = [
        0x4a, 0x1e, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0,
    ];
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    let mut runner = TestRunner::new_with_rng(
        PropConfig {
            cases: 24,
            ..PropConfig::default()
        },
        rng,
    );

    let input = (
        any::<u64>(),
        20usize..150,
        1u32..12,
        (0.0f64..40.0, 0.0f64..40.0, 0.0f64..15.0),
        kind_filter(),
    );

    runner
        .run(&input, |(seed, count, frames, probe, class)| {
            let spec = ScenarioSpec {
                count,
                width: 40,
                height: 40,
                ..ScenarioSpec::default()
            };
            let mut world = random_world(&spec, seed);
            let mut checker = track_all(&world, CELL).map_err(|e| TestCaseError::fail(e.to_string()))?;
            let mut motion = StdRng::seed_from_u64(seed ^ 0x5eed);

            check_frame(&world, &checker, probe, class)?;
            for frame in 0..frames {
                for (id, (ox, oy)) in jitter(&mut world, &mut motion, 2.0) {
                    checker
                        .update_object_location(&world, id, ox, oy)
                        .map_err(|e| TestCaseError::fail(e.to_string()))?;
                }
                // Churn: despawn one body and spawn a replacement each frame.
                if let Some(victim) = world.ids().get(frame as usize % world.len()).copied() {
                    checker
                        .remove_object(victim)
                        .map_err(|e| TestCaseError::fail(e.to_string()))?;
                    world.despawn(victim);
                    let fresh = world.spawn(20.0, 20.0, 1.0, Kind::Bullet);
                    prop_assert_eq!(checker.add_object(&world, fresh), Ok(true));
                }
                check_frame(&world, &checker, probe, class)?;
            }
            Ok(())
        })
        .expect("checker agrees with brute force on every frame");
}
