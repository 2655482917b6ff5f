// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The collision checker facade.

use std::f64::consts::SQRT_2;
use std::fmt::Debug;
use std::hash::Hash;

use halo_geom::{Circle, CircleTree, Node, NodeId, TreeStats};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace, warn};

use crate::config::CheckerConfig;
use crate::error::CollisionError;
use crate::query::{ClassQuery, InRangeQuery, IntersectQuery, NeighbourQuery, PointQuery};
use crate::world::WorldView;

/// Tracks world objects in a circle BVH and answers spatial queries.
///
/// Every bounding circle is scaled by `cell_size` on its way in, so the tree
/// works in physical units while callers speak world units and cells.
/// Class filters are `Option<&Class>`; `None` accepts every object and a
/// class no tracked object belongs to simply yields nothing.
///
/// Misuse (removing or updating an untracked object) is reported as
/// [`CollisionError::NotTracked`] instead of being ignored.
#[derive(Debug, Clone)]
pub struct CollisionChecker<O> {
    config: CheckerConfig,
    tree: CircleTree<O>,
    tracked: FxHashMap<O, NodeId>,
}

impl<O> CollisionChecker<O>
where
    O: Copy + Eq + Hash + Debug,
{
    /// Creates an empty checker for the given world geometry.
    pub fn new(config: CheckerConfig) -> Result<Self, CollisionError> {
        config.validate()?;
        debug!(
            width = config.width,
            height = config.height,
            cell_size = config.cell_size,
            wrap = config.wrap,
            "collision checker initialised"
        );
        Ok(Self {
            config,
            tree: CircleTree::new(),
            tracked: FxHashMap::default(),
        })
    }

    /// Geometry the checker was created with.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// `true` if `obj` is tracked.
    pub fn contains(&self, obj: O) -> bool {
        self.tracked.contains_key(&obj)
    }

    /// Leaf currently holding `obj`.
    pub fn leaf(&self, obj: O) -> Option<NodeId> {
        self.tracked.get(&obj).copied()
    }

    /// The underlying hierarchy, in physical units.
    pub fn tree(&self) -> &CircleTree<O> {
        &self.tree
    }

    /// Shape summary of the underlying hierarchy.
    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    /// Starts tracking `obj`. Returns `Ok(false)` if it was already tracked.
    pub fn add_object<W>(&mut self, world: &W, obj: O) -> Result<bool, CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        if self.tracked.contains_key(&obj) {
            trace!(object = ?obj, "already tracked");
            return Ok(false);
        }
        let circle = self.physical_bounds(world, obj)?;
        let leaf = self.tree.insert(circle, obj);
        self.tracked.insert(obj, leaf);
        debug!(object = ?obj, ?leaf, tracked = self.tracked.len(), "object added");
        Ok(true)
    }

    /// Stops tracking `obj` and removes its leaf.
    pub fn remove_object(&mut self, obj: O) -> Result<(), CollisionError> {
        let leaf = self
            .tracked
            .remove(&obj)
            .ok_or_else(|| CollisionError::NotTracked(format!("{obj:?}")))?;
        match self.tree.remove(leaf) {
            Some(held) if held == obj => {
                debug!(object = ?obj, ?leaf, tracked = self.tracked.len(), "object removed");
                Ok(())
            }
            _ => {
                warn!(object = ?obj, ?leaf, "cached leaf did not hold the removed object");
                Err(CollisionError::StaleHandle(format!("{obj:?}")))
            }
        }
    }

    /// Refreshes `obj`'s leaf after it moved away from cell `(old_x, old_y)`.
    ///
    /// The new circle is re-read from the world. A move that leaves the
    /// circle unchanged does not touch the tree.
    pub fn update_object_location<W>(
        &mut self,
        world: &W,
        obj: O,
        old_x: i32,
        old_y: i32,
    ) -> Result<(), CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let leaf = self.tracked_leaf(obj)?;
        let circle = self.physical_bounds(world, obj)?;
        trace!(
            object = ?obj,
            from = ?(old_x, old_y),
            to = ?world.location(obj),
            "object moved"
        );
        self.repair(obj, leaf, circle)
    }

    /// Refreshes `obj`'s leaf after its bounding circle changed size.
    pub fn update_object_size<W>(&mut self, world: &W, obj: O) -> Result<(), CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let leaf = self.tracked_leaf(obj)?;
        let circle = self.physical_bounds(world, obj)?;
        trace!(object = ?obj, radius = circle.radius(), "object resized");
        self.repair(obj, leaf, circle)
    }

    /// Objects whose bounds contain the centre of cell `(x, y)`.
    pub fn objects_at<W>(&self, world: &W, x: i32, y: i32, class: Option<&W::Class>) -> Vec<O>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let (px, py) = self.cell_centre((x, y));
        let query = ClassQuery::new(world, class, PointQuery::new(px, py));
        self.tree.query_point(px, py, &query)
    }

    /// Objects overlapping `obj`'s current bounds, excluding `obj` itself.
    ///
    /// `obj` does not need to be tracked.
    pub fn intersecting_objects<W>(
        &self,
        world: &W,
        obj: O,
        class: Option<&W::Class>,
    ) -> Result<Vec<O>, CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let region = self.physical_bounds(world, obj)?;
        let query = ClassQuery::new(world, class, IntersectQuery::new(region, Some(obj)));
        Ok(self.tree.query_intersections(&region, &query))
    }

    /// Objects overlapping the circle of radius `range` around world point
    /// `(x, y)`.
    pub fn objects_in_range<W>(
        &self,
        world: &W,
        x: f64,
        y: f64,
        range: f64,
        class: Option<&W::Class>,
    ) -> Result<Vec<O>, CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let scale = self.config.cell_size;
        let region = Circle::checked(x * scale, y * scale, range * scale).ok_or_else(|| {
            CollisionError::InvalidBounds(format!("range ({x}, {y}) r={range}"))
        })?;
        let query = ClassQuery::new(world, class, InRangeQuery::new(region));
        Ok(self.tree.query_intersections(&region, &query))
    }

    /// Objects located within `distance` cells of `obj`'s cell.
    ///
    /// `diagonal` selects Chebyshev distance (square neighbourhood) over
    /// Manhattan distance (diamond). Objects in `obj`'s own cell are never
    /// neighbours.
    pub fn neighbours<W>(
        &self,
        world: &W,
        obj: O,
        distance: u32,
        diagonal: bool,
        class: Option<&W::Class>,
    ) -> Vec<O>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let location = world.location(obj);
        let (cx, cy) = self.cell_centre(location);
        // Farthest corner of any cell in the neighbourhood, in cells.
        let reach = f64::from(distance) + 0.5;
        let radius = if diagonal {
            reach * SQRT_2
        } else {
            reach.hypot(0.5)
        };
        let region = Circle::new(cx, cy, radius * self.config.cell_size);
        let query = ClassQuery::new(
            world,
            class,
            NeighbourQuery::new(world, location, distance, diagonal),
        );
        self.tree.query_intersections(&region, &query)
    }

    /// Any one object whose bounds contain the centre of cell `(x, y)`.
    ///
    /// When `near` is a tracked object the search starts from its leaf and
    /// works outward, and `near` itself is never returned.
    pub fn one_object_at<W>(
        &self,
        world: &W,
        near: Option<O>,
        x: i32,
        y: i32,
        class: Option<&W::Class>,
    ) -> Option<O>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let (px, py) = self.cell_centre((x, y));
        let start = near.and_then(|o| self.leaf(o));
        let query = ClassQuery::new(world, class, PointQuery::new(px, py));
        self.tree
            .query_one_intersecting(start, &Circle::point(px, py), &query)
    }

    /// Any one object overlapping `obj`, searched outward from `obj`'s leaf.
    ///
    /// An untracked `obj` is searched for from the root.
    pub fn one_intersecting_object<W>(
        &self,
        world: &W,
        obj: O,
        class: Option<&W::Class>,
    ) -> Result<Option<O>, CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let region = self.physical_bounds(world, obj)?;
        let query = ClassQuery::new(world, class, IntersectQuery::new(region, Some(obj)));
        Ok(self
            .tree
            .query_one_intersecting(self.leaf(obj), &region, &query))
    }

    /// Ray query from cell `(x, y)` along `angle` degrees. Not supported.
    pub fn objects_in_direction(
        &self,
        _x: i32,
        _y: i32,
        _angle: i32,
        _length: u32,
    ) -> Result<Vec<O>, CollisionError> {
        Err(CollisionError::Unsupported("objects_in_direction"))
    }

    /// Every tracked object of `class` (all of them for `None`), in no
    /// particular order.
    pub fn objects<W>(&self, world: &W, class: Option<&W::Class>) -> Vec<O>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        self.tracked
            .keys()
            .copied()
            .filter(|obj| class.is_none_or(|c| world.is_instance(*obj, c)))
            .collect()
    }

    /// Cross-checks the side table against the tree and validates the tree.
    ///
    /// Reports objects that are tracked but missing from the tree (or the
    /// reverse) as [`CollisionError::Desync`].
    #[instrument(level = "debug", skip_all)]
    pub fn audit(&self) -> Result<(), CollisionError> {
        let tracked = self.tracked.len();
        let in_tree = self.tree.len();
        if tracked != in_tree {
            warn!(
                missing = tracked.abs_diff(in_tree),
                tracked, in_tree, "objects missing from collision tree"
            );
            return Err(CollisionError::Desync { tracked, in_tree });
        }
        for (obj, leaf) in &self.tracked {
            let held = self.tree.node(*leaf).and_then(Node::payload);
            if held != Some(obj) {
                warn!(object = ?obj, ?leaf, "tracked object not held by its leaf");
                return Err(CollisionError::StaleHandle(format!("{obj:?}")));
            }
        }
        self.tree.validate()?;
        Ok(())
    }

    fn tracked_leaf(&self, obj: O) -> Result<NodeId, CollisionError> {
        self.leaf(obj)
            .ok_or_else(|| CollisionError::NotTracked(format!("{obj:?}")))
    }

    fn repair(&mut self, obj: O, leaf: NodeId, circle: Circle) -> Result<(), CollisionError> {
        if self.tree.repair(leaf, circle) {
            Ok(())
        } else {
            warn!(object = ?obj, ?leaf, "cached leaf is no longer in the tree");
            Err(CollisionError::StaleHandle(format!("{obj:?}")))
        }
    }

    fn physical_bounds<W>(&self, world: &W, obj: O) -> Result<Circle, CollisionError>
    where
        W: WorldView<Object = O> + ?Sized,
    {
        let c = world.bounding_circle(obj);
        let scale = self.config.cell_size;
        Circle::checked(c.x() * scale, c.y() * scale, c.radius() * scale)
            .ok_or_else(|| CollisionError::InvalidBounds(format!("{obj:?}")))
    }

    fn cell_centre(&self, (x, y): (i32, i32)) -> (f64, f64) {
        let scale = self.config.cell_size;
        ((f64::from(x) + 0.5) * scale, (f64::from(y) + 0.5) * scale)
    }
}
