// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Leaf predicates used by the checker's queries.
//!
//! Each query builds its predicates on the stack for the duration of one
//! traversal; nothing is pooled or shared between calls.

use halo_geom::{Circle, CollisionQuery};

use crate::world::WorldView;

/// Class filter wrapped around another predicate. `None` accepts every class.
pub struct ClassQuery<'a, W: WorldView + ?Sized, Q> {
    world: &'a W,
    class: Option<&'a W::Class>,
    inner: Q,
}

impl<'a, W: WorldView + ?Sized, Q> ClassQuery<'a, W, Q> {
    /// Filters `inner` by `class`.
    pub fn new(world: &'a W, class: Option<&'a W::Class>, inner: Q) -> Self {
        Self {
            world,
            class,
            inner,
        }
    }
}

impl<W, Q> CollisionQuery<W::Object> for ClassQuery<'_, W, Q>
where
    W: WorldView + ?Sized,
    Q: CollisionQuery<W::Object>,
{
    fn check_collision(&self, object: &W::Object, bounds: &Circle) -> bool {
        self.class
            .is_none_or(|class| self.world.is_instance(*object, class))
            && self.inner.check_collision(object, bounds)
    }
}

/// Exact circle overlap with a region, optionally skipping the querying object.
#[derive(Debug, Clone, Copy)]
pub struct IntersectQuery<O> {
    exclude: Option<O>,
    region: Circle,
}

impl<O> IntersectQuery<O> {
    /// Matches leaves overlapping `region` other than `exclude`.
    pub fn new(region: Circle, exclude: Option<O>) -> Self {
        Self { exclude, region }
    }
}

impl<O: PartialEq> CollisionQuery<O> for IntersectQuery<O> {
    fn check_collision(&self, object: &O, bounds: &Circle) -> bool {
        self.exclude.as_ref() != Some(object) && bounds.intersects(&self.region)
    }
}

/// Leaves whose bounds contain a physical point.
#[derive(Debug, Clone, Copy)]
pub struct PointQuery {
    x: f64,
    y: f64,
}

impl PointQuery {
    /// Matches leaves containing `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl<O> CollisionQuery<O> for PointQuery {
    fn check_collision(&self, _object: &O, bounds: &Circle) -> bool {
        bounds.contains_point(self.x, self.y)
    }
}

/// Objects whose cell lies within `distance` of a centre cell.
///
/// With `diagonal` the distance is Chebyshev (a square of cells), otherwise
/// Manhattan (a diamond). The centre cell itself never matches.
pub struct NeighbourQuery<'a, W: WorldView + ?Sized> {
    world: &'a W,
    centre: (i32, i32),
    distance: u32,
    diagonal: bool,
}

impl<'a, W: WorldView + ?Sized> NeighbourQuery<'a, W> {
    /// Neighbourhood of `centre` of the given size and shape.
    pub fn new(world: &'a W, centre: (i32, i32), distance: u32, diagonal: bool) -> Self {
        Self {
            world,
            centre,
            distance,
            diagonal,
        }
    }

    /// `true` if `cell` belongs to the neighbourhood.
    pub fn covers(&self, cell: (i32, i32)) -> bool {
        let dx = (i64::from(cell.0) - i64::from(self.centre.0)).unsigned_abs();
        let dy = (i64::from(cell.1) - i64::from(self.centre.1)).unsigned_abs();
        if dx == 0 && dy == 0 {
            return false;
        }
        let reach = if self.diagonal { dx.max(dy) } else { dx + dy };
        reach <= u64::from(self.distance)
    }
}

impl<W: WorldView + ?Sized> CollisionQuery<W::Object> for NeighbourQuery<'_, W> {
    fn check_collision(&self, object: &W::Object, _bounds: &Circle) -> bool {
        self.covers(self.world.location(*object))
    }
}

/// Leaves overlapping a range circle.
#[derive(Debug, Clone, Copy)]
pub struct InRangeQuery {
    range: Circle,
}

impl InRangeQuery {
    /// Matches leaves overlapping `range`.
    pub fn new(range: Circle) -> Self {
        Self { range }
    }
}

impl<O> CollisionQuery<O> for InRangeQuery {
    fn check_collision(&self, _object: &O, bounds: &Circle) -> bool {
        bounds.intersects(&self.range)
    }
}
