// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for Halo.

This crate provides:
- Bounding circles (`Circle`) with intersection, containment and merge.
- A node arena (`NodeArena`) that owns every tree node and recycles slots.
- A self-balancing circle bounding volume hierarchy (`CircleTree`) built by
  on-line insertion and repaired through local tree surgery.
- The `CollisionQuery` predicate seam consulted at candidate leaves.

Design notes:
- No ambient state: every tree owns its arena and allocates its search
  frontier per call.
- Float64 throughout; ancestor circles are recomputed with the same merge
  routine so the structural invariant is checked with exact equality.
- Rustdoc is treated as part of the contract; public items are documented.
"]

/// Broad-phase circle hierarchy and its supporting types.
pub mod broad;
/// Foundational geometric types.
pub mod types;

pub use broad::circle_tree::{CircleTree, TreeStats};
pub use broad::node::{Node, NodeArena, NodeId};
pub use broad::query::{AcceptAll, CollisionQuery};
pub use broad::TreeError;
pub use types::circle::Circle;
