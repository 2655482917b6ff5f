// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port through which the checker reads the embedding world.

use std::fmt::Debug;
use std::hash::Hash;

use halo_geom::Circle;

/// Read-only view of the world that owns the tracked objects.
///
/// Coordinates are world units: one unit is one cell. The checker multiplies
/// by its cell size before anything enters the tree.
///
/// Neighbour queries prune on bounding circles and then filter on cell
/// locations, so an object's bounding circle must overlap its own location
/// cell for it to be found by [`crate::CollisionChecker::neighbours`].
pub trait WorldView {
    /// Opaque object handle; used as a map key and as the tree payload.
    type Object: Copy + Eq + Hash + Debug;
    /// Class filter understood by [`WorldView::is_instance`].
    type Class: ?Sized;

    /// Current bounding circle of `obj` in world units.
    fn bounding_circle(&self, obj: Self::Object) -> Circle;

    /// Cell the object occupies.
    fn location(&self, obj: Self::Object) -> (i32, i32);

    /// `true` if `obj` is an instance of `class` or one of its subclasses.
    fn is_instance(&self, obj: Self::Object, class: &Self::Class) -> bool;
}
