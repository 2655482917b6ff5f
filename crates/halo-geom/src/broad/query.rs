// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::types::circle::Circle;

/// Fine-grained test applied to every candidate leaf that survives circle
/// pruning.
///
/// `bounds` is the leaf's circle in the tree's physical coordinates.
pub trait CollisionQuery<T> {
    /// Returns `true` if `object` is a genuine hit.
    fn check_collision(&self, object: &T, bounds: &Circle) -> bool;
}

impl<T, F> CollisionQuery<T> for F
where
    F: Fn(&T, &Circle) -> bool,
{
    fn check_collision(&self, object: &T, bounds: &Circle) -> bool {
        self(object, bounds)
    }
}

/// Query accepting every candidate; results are decided by circle pruning alone.
#[derive(Debug, Copy, Clone, Default)]
pub struct AcceptAll;

impl<T> CollisionQuery<T> for AcceptAll {
    fn check_collision(&self, _object: &T, _bounds: &Circle) -> bool {
        true
    }
}
