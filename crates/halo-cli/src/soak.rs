// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Randomised soak run: move, churn and resize a population frame after
//! frame, periodically auditing the checker and cross-checking its queries
//! against brute force.

use anyhow::{bail, Context, Result};
use halo_collision::query::NeighbourQuery;
use halo_collision::{CheckerConfig, CollisionChecker};
use halo_dry_tests::{jitter, random_world, BodyId, Kind, ScenarioSpec, ToyWorld};
use halo_geom::{Circle, TreeStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Bodies probed per cross-check.
const PROBES_PER_CHECK: usize = 16;
/// Mixed into the seed so motion does not replay the population draw.
const MOTION_SALT: u64 = 0x5EED_D1CE;

/// Inputs of a soak run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoakPlan {
    pub objects: usize,
    pub frames: u32,
    pub seed: u64,
    pub step: f64,
    /// `0` disables the periodic checks; the final audit still runs.
    pub check_every: u32,
    pub churn: usize,
    pub config: CheckerConfig,
}

/// What a finished soak run did.
#[derive(Debug, Clone, Serialize)]
pub struct SoakReport {
    pub frames: u32,
    pub objects: usize,
    pub checks: u32,
    pub probes: usize,
    pub spawned: usize,
    pub despawned: usize,
    pub resized: usize,
    pub stats: TreeStats,
}

/// Random population sized to `config` plus a checker tracking all of it.
pub fn populate(
    config: CheckerConfig,
    objects: usize,
    seed: u64,
) -> Result<(ToyWorld, CollisionChecker<BodyId>)> {
    let spec = ScenarioSpec {
        count: objects,
        width: config.width,
        height: config.height,
        ..ScenarioSpec::default()
    };
    let world = random_world(&spec, seed);
    let mut checker = CollisionChecker::new(config).context("invalid checker config")?;
    for id in world.ids() {
        checker
            .add_object(&world, id)
            .with_context(|| format!("tracking {id:?}"))?;
    }
    Ok((world, checker))
}

pub fn run_soak(plan: &SoakPlan) -> Result<SoakReport> {
    let (mut world, mut checker) = populate(plan.config, plan.objects, plan.seed)?;
    let mut rng = StdRng::seed_from_u64(plan.seed ^ MOTION_SALT);
    let mut report = SoakReport {
        frames: plan.frames,
        objects: world.len(),
        checks: 0,
        probes: 0,
        spawned: 0,
        despawned: 0,
        resized: 0,
        stats: TreeStats::default(),
    };
    info!(
        objects = world.len(),
        frames = plan.frames,
        cell_size = plan.config.cell_size,
        seed = plan.seed,
        "soak started"
    );

    for frame in 1..=plan.frames {
        for (id, (old_x, old_y)) in jitter(&mut world, &mut rng, plan.step) {
            checker
                .update_object_location(&world, id, old_x, old_y)
                .with_context(|| format!("frame {frame}: moving {id:?}"))?;
        }
        churn(&mut world, &mut checker, &mut rng, plan.churn, &mut report)
            .with_context(|| format!("frame {frame}: churn"))?;

        if plan.check_every > 0 && frame % plan.check_every == 0 {
            checker
                .audit()
                .with_context(|| format!("frame {frame}: audit"))?;
            report.probes += cross_check(&world, &checker, &mut rng, frame)?;
            report.checks += 1;
            debug!(frame, tracked = checker.len(), "frame checked");
        }
    }

    checker.audit().context("final audit")?;
    report.objects = checker.len();
    report.stats = checker.stats();
    info!(
        checks = report.checks,
        probes = report.probes,
        depth = report.stats.max_depth,
        "soak finished"
    );
    Ok(report)
}

fn churn(
    world: &mut ToyWorld,
    checker: &mut CollisionChecker<BodyId>,
    rng: &mut StdRng,
    count: usize,
    report: &mut SoakReport,
) -> Result<()> {
    let spec = ScenarioSpec::default();
    let (width, height) = (f64::from(world.width()), f64::from(world.height()));
    for _ in 0..count {
        let ids = world.ids();
        if !ids.is_empty() {
            let victim = ids[rng.gen_range(0..ids.len())];
            checker.remove_object(victim)?;
            world.despawn(victim);
            report.despawned += 1;

            let grown = ids[rng.gen_range(0..ids.len())];
            if grown != victim
                && world.resize(grown, rng.gen_range(spec.min_radius..=spec.max_radius))
            {
                checker.update_object_size(world, grown)?;
                report.resized += 1;
            }
        }
        let kind = Kind::CONCRETE[rng.gen_range(0..Kind::CONCRETE.len())];
        let id = world.spawn(
            rng.gen_range(0.0..width),
            rng.gen_range(0.0..height),
            rng.gen_range(spec.min_radius..=spec.max_radius),
            kind,
        );
        checker.add_object(world, id)?;
        report.spawned += 1;
    }
    Ok(())
}

/// Compares every query family against a linear scan. Returns the number of
/// probes issued.
fn cross_check(
    world: &ToyWorld,
    checker: &CollisionChecker<BodyId>,
    rng: &mut StdRng,
    frame: u32,
) -> Result<usize> {
    let ids = world.ids();
    if ids.is_empty() {
        return Ok(0);
    }
    let scale = checker.config().cell_size;
    let mut probes = 0;
    for _ in 0..PROBES_PER_CHECK.min(ids.len()) {
        let id = ids[rng.gen_range(0..ids.len())];
        let class = pick_class(rng);
        let Some(body) = world.body(id) else {
            continue;
        };
        let bounds = body.circle().scaled(scale);

        let want = scan(world, scale, class, |b, c| *b != id && c.intersects(&bounds));
        let got = sorted(checker.intersecting_objects(world, id, class.as_ref())?);
        compare(frame, "intersecting_objects", id, &got, &want)?;

        match checker.one_intersecting_object(world, id, class.as_ref())? {
            Some(hit) if !want.contains(&hit) => {
                warn!(frame, ?id, ?hit, "one_intersecting_object returned a non-overlap");
                bail!("frame {frame}: one_intersecting_object({id:?}) returned {hit:?}");
            }
            None if !want.is_empty() => {
                warn!(frame, ?id, "one_intersecting_object missed an overlap");
                bail!("frame {frame}: one_intersecting_object({id:?}) missed {want:?}");
            }
            _ => {}
        }

        let (x, y) = body.cell();
        let (px, py) = ((f64::from(x) + 0.5) * scale, (f64::from(y) + 0.5) * scale);
        let want = scan(world, scale, class, |_, c| c.contains_point(px, py));
        let got = sorted(checker.objects_at(world, x, y, class.as_ref()));
        compare(frame, "objects_at", id, &got, &want)?;

        let distance = rng.gen_range(0..=3);
        let diagonal = rng.gen_bool(0.5);
        let hood = NeighbourQuery::new(world, (x, y), distance, diagonal);
        let want = scan(world, scale, class, |b, _| {
            world.body(*b).is_some_and(|other| hood.covers(other.cell()))
        });
        let got = sorted(checker.neighbours(world, id, distance, diagonal, class.as_ref()));
        compare(frame, "neighbours", id, &got, &want)?;

        let range = rng.gen_range(0.0..6.0);
        let region = Circle::new(body.x, body.y, range).scaled(scale);
        let want = scan(world, scale, class, |_, c| c.intersects(&region));
        let got = sorted(checker.objects_in_range(world, body.x, body.y, range, class.as_ref())?);
        compare(frame, "objects_in_range", id, &got, &want)?;

        probes += 1;
    }
    Ok(probes)
}

fn pick_class(rng: &mut StdRng) -> Option<Kind> {
    match rng.gen_range(0..5) {
        0 => Some(Kind::Any),
        1 => Some(Kind::CONCRETE[rng.gen_range(0..Kind::CONCRETE.len())]),
        _ => None,
    }
}

/// Bodies of `class` accepted by `keep`, which sees physical bounds.
fn scan(
    world: &ToyWorld,
    scale: f64,
    class: Option<Kind>,
    keep: impl Fn(&BodyId, &Circle) -> bool,
) -> Vec<BodyId> {
    world
        .bodies()
        .filter(|(id, body)| {
            class.is_none_or(|c| body.kind.is_a(c)) && keep(id, &body.circle().scaled(scale))
        })
        .map(|(id, _)| id)
        .collect()
}

fn sorted(mut ids: Vec<BodyId>) -> Vec<BodyId> {
    ids.sort_unstable();
    ids
}

fn compare(
    frame: u32,
    query: &str,
    probe: BodyId,
    got: &[BodyId],
    want: &[BodyId],
) -> Result<()> {
    if got != want {
        warn!(frame, query, ?probe, got = got.len(), want = want.len(), "query mismatch");
        bail!("frame {frame}: {query} around {probe:?} returned {got:?}, brute force found {want:?}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn plan(cell_size: f64) -> SoakPlan {
        SoakPlan {
            objects: 150,
            frames: 30,
            seed: 11,
            step: 0.75,
            check_every: 5,
            churn: 3,
            config: CheckerConfig {
                width: 40,
                height: 40,
                cell_size,
                wrap: false,
            },
        }
    }

    #[test]
    fn soak_passes_and_counts_its_work() {
        let report = run_soak(&plan(1.0)).expect("soak");
        assert_eq!(report.frames, 30);
        assert_eq!(report.checks, 6);
        assert_eq!(report.objects, 150);
        assert_eq!(report.spawned, 90);
        assert_eq!(report.despawned, 90);
        assert_eq!(report.probes, 6 * PROBES_PER_CHECK);
        assert_eq!(report.stats.leaves, 150);
    }

    #[test]
    fn soak_passes_with_scaled_cells() {
        let report = run_soak(&plan(16.0)).expect("soak");
        assert_eq!(report.stats.leaves, report.objects);
    }

    #[test]
    fn zero_check_interval_only_audits_at_the_end() {
        let report = run_soak(&SoakPlan {
            check_every: 0,
            ..plan(1.0)
        })
        .expect("soak");
        assert_eq!(report.checks, 0);
        assert_eq!(report.probes, 0);
    }

    #[test]
    fn invalid_config_is_reported() {
        let err = run_soak(&plan(0.0)).expect_err("zero cell size");
        assert!(err.to_string().contains("invalid checker config"));
    }

    #[test]
    fn empty_population_soaks_through_churn() {
        let report = run_soak(&SoakPlan {
            objects: 0,
            churn: 1,
            ..plan(1.0)
        })
        .expect("soak");
        // Each frame despawns the lone body and spawns its replacement.
        assert_eq!(report.objects, 1);
        assert_eq!(report.spawned, 30);
    }
}
