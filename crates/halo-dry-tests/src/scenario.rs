// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Seeded populations and brute-force oracles.

use halo_collision::{CheckerConfig, CollisionChecker, CollisionError, WorldView};
use halo_geom::Circle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::world::{BodyId, Kind, ToyWorld};

/// Shape of a random population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioSpec {
    /// Number of bodies.
    pub count: usize,
    /// World width in cells.
    pub width: u32,
    /// World height in cells.
    pub height: u32,
    /// Smallest body radius (world units).
    pub min_radius: f64,
    /// Largest body radius (world units).
    pub max_radius: f64,
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            count: 200,
            width: 100,
            height: 100,
            min_radius: 0.1,
            max_radius: 1.5,
        }
    }
}

/// Scatters `spec.count` bodies uniformly over the world. Same seed, same world.
pub fn random_world(spec: &ScenarioSpec, seed: u64) -> ToyWorld {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = ToyWorld::new(spec.width, spec.height);
    for _ in 0..spec.count {
        let x = rng.gen_range(0.0..f64::from(spec.width));
        let y = rng.gen_range(0.0..f64::from(spec.height));
        let radius = rng.gen_range(spec.min_radius..=spec.max_radius);
        let kind = Kind::CONCRETE[rng.gen_range(0..Kind::CONCRETE.len())];
        world.spawn(x, y, radius, kind);
    }
    world
}

/// `columns` x `rows` bodies of `radius`, one per `spacing`-sized block,
/// centred in their block. Kinds cycle rock, ship, bullet in id order.
///
/// With `spacing > 2 * radius` no two bodies touch.
pub fn disjoint_grid(columns: u32, rows: u32, spacing: f64, radius: f64) -> ToyWorld {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let extent = |blocks: u32| (f64::from(blocks) * spacing).ceil() as u32;
    let mut world = ToyWorld::new(extent(columns), extent(rows));
    let mut kinds = Kind::CONCRETE.iter().copied().cycle();
    for row in 0..rows {
        for column in 0..columns {
            let x = (f64::from(column) + 0.5) * spacing;
            let y = (f64::from(row) + 0.5) * spacing;
            world.spawn(x, y, radius, kinds.next().unwrap_or(Kind::Rock));
        }
    }
    world
}

/// Moves every body by up to `step` on each axis, clamped to the world.
///
/// Returns `(id, cell before the move)` for every body, in id order.
pub fn jitter<R: Rng>(world: &mut ToyWorld, rng: &mut R, step: f64) -> Vec<(BodyId, (i32, i32))> {
    let (width, height) = (f64::from(world.width()), f64::from(world.height()));
    let mut moved = Vec::with_capacity(world.len());
    for id in world.ids() {
        let Some(body) = world.body(id).copied() else {
            continue;
        };
        let x = (body.x + rng.gen_range(-step..=step)).clamp(0.0, width);
        let y = (body.y + rng.gen_range(-step..=step)).clamp(0.0, height);
        if let Some(old) = world.move_to(id, x, y) {
            moved.push((id, old));
        }
    }
    moved
}

/// A checker sized to `world` that already tracks every body.
pub fn track_all(
    world: &ToyWorld,
    cell_size: f64,
) -> Result<CollisionChecker<BodyId>, CollisionError> {
    let mut checker = CollisionChecker::new(CheckerConfig {
        width: world.width(),
        height: world.height(),
        cell_size,
        wrap: false,
    })?;
    for id in world.ids() {
        checker.add_object(world, id)?;
    }
    Ok(checker)
}

/// Bodies overlapping `region` (world units) of `class`, sorted by id.
pub fn brute_force_in_range(world: &ToyWorld, region: &Circle, class: Option<Kind>) -> Vec<BodyId> {
    world
        .bodies()
        .filter(|(id, body)| {
            body.circle().intersects(region) && class.is_none_or(|c| world.is_instance(*id, &c))
        })
        .map(|(id, _)| id)
        .collect()
}

/// Bodies overlapping body `of` (excluding it) of `class`, sorted by id.
pub fn brute_force_intersecting(world: &ToyWorld, of: BodyId, class: Option<Kind>) -> Vec<BodyId> {
    let Some(body) = world.body(of) else {
        return Vec::new();
    };
    let mut hits = brute_force_in_range(world, &body.circle(), class);
    hits.retain(|id| *id != of);
    hits
}
