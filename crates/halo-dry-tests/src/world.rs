// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A toy world for driving the collision checker in tests and benches.

use std::collections::BTreeMap;

use halo_collision::WorldView;
use halo_geom::Circle;

/// Handle of a body in a [`ToyWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Body classes. `Any` is the root of the hierarchy and is only meaningful as
/// a query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Supertype of every kind.
    Any,
    /// Static obstacle.
    Rock,
    /// Player or NPC vessel.
    Ship,
    /// Short-lived projectile.
    Bullet,
}

impl Kind {
    /// Concrete kinds a body can have.
    pub const CONCRETE: [Self; 3] = [Self::Rock, Self::Ship, Self::Bullet];

    /// `true` if a body of kind `self` is an instance of `class`.
    pub fn is_a(self, class: Self) -> bool {
        class == Self::Any || class == self
    }
}

/// A circular body in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Radius.
    pub radius: f64,
    /// Class of the body.
    pub kind: Kind,
}

impl Body {
    /// Bounding circle in world units.
    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.radius)
    }

    /// Cell containing the body's centre.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// Bodies keyed by id, with a fixed extent in cells.
///
/// Lookups for an unknown id answer with a NaN circle so the checker reports
/// [`halo_collision::CollisionError::InvalidBounds`] instead of tracking junk.
#[derive(Debug, Clone, Default)]
pub struct ToyWorld {
    width: u32,
    height: u32,
    bodies: BTreeMap<BodyId, Body>,
    next_id: u32,
}

impl ToyWorld {
    /// Empty world `width` by `height` cells.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Adds a body and returns its id.
    pub fn spawn(&mut self, x: f64, y: f64, radius: f64, kind: Kind) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            id,
            Body {
                x,
                y,
                radius,
                kind,
            },
        );
        id
    }

    /// Removes a body.
    pub fn despawn(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    /// Moves a body, returning the cell it left.
    pub fn move_to(&mut self, id: BodyId, x: f64, y: f64) -> Option<(i32, i32)> {
        let body = self.bodies.get_mut(&id)?;
        let old = body.cell();
        body.x = x;
        body.y = y;
        Some(old)
    }

    /// Changes a body's radius.
    pub fn resize(&mut self, id: BodyId, radius: f64) -> bool {
        let Some(body) = self.bodies.get_mut(&id) else {
            return false;
        };
        body.radius = radius;
        true
    }

    /// Looks up a body.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Every body in id order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.bodies.iter().map(|(id, body)| (*id, body))
    }

    /// Every id in ascending order.
    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.keys().copied().collect()
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// `true` when the world has no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl WorldView for ToyWorld {
    type Object = BodyId;
    type Class = Kind;

    fn bounding_circle(&self, obj: BodyId) -> Circle {
        self.bodies
            .get(&obj)
            .map_or(Circle::point(f64::NAN, f64::NAN), Body::circle)
    }

    fn location(&self, obj: BodyId) -> (i32, i32) {
        self.bodies.get(&obj).map_or((i32::MIN, i32::MIN), Body::cell)
    }

    fn is_instance(&self, obj: BodyId, class: &Kind) -> bool {
        self.bodies.get(&obj).is_some_and(|b| b.kind.is_a(*class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_hierarchy() {
        let mut world = ToyWorld::new(10, 10);
        let ship = world.spawn(1.5, 1.5, 0.5, Kind::Ship);
        assert!(world.is_instance(ship, &Kind::Ship));
        assert!(world.is_instance(ship, &Kind::Any));
        assert!(!world.is_instance(ship, &Kind::Rock));
        assert!(!world.is_instance(BodyId(99), &Kind::Any));
    }

    #[test]
    fn move_reports_previous_cell() {
        let mut world = ToyWorld::new(10, 10);
        let id = world.spawn(2.2, 3.7, 0.5, Kind::Rock);
        assert_eq!(world.move_to(id, 5.0, 5.0), Some((2, 3)));
        assert_eq!(world.location(id), (5, 5));
        assert_eq!(world.move_to(BodyId(42), 0.0, 0.0), None);
    }

    #[test]
    fn unknown_body_has_unusable_bounds() {
        let world = ToyWorld::new(1, 1);
        let c = world.bounding_circle(BodyId(0));
        assert!(Circle::checked(c.x(), c.y(), c.radius()).is_none());
    }
}
