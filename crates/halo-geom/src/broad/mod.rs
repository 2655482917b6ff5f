// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Broad-phase circle hierarchy.
//!
//! Structural contract (checked by [`circle_tree::CircleTree::validate`]):
//! - A node is a leaf iff it carries a payload and has no children.
//! - An internal node carries no payload and has exactly two children.
//! - Every internal circle equals `left.merge(right)` exactly; every leaf
//!   circle is the owning object's current physical bounds.
//! - The number of leaves reachable from the root equals the tree size.
//!
//! Overlap is inclusive on the boundary (touching circles intersect).

use thiserror::Error;

#[doc = "Incrementally maintained circle BVH (insert, remove, repair, queries)."]
pub mod circle_tree;
#[doc = "Best-sibling search frontier for on-line insertion."]
pub mod fringe;
#[doc = "Tree nodes and the arena that recycles them."]
pub mod node;
#[doc = "Leaf predicates consulted during traversal."]
pub mod query;

use node::NodeId;

/// Structural invariant violation reported by [`circle_tree::CircleTree::validate`].
///
/// Any of these indicates a defect in tree surgery; correct use never
/// produces one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The root node has a parent link.
    #[error("root {0:?} has a parent")]
    RootHasParent(NodeId),
    /// A link points at a slot that is not live in the arena.
    #[error("node {0:?} links to a released or unknown slot")]
    DanglingLink(NodeId),
    /// A child does not point back at the node that owns it.
    #[error("child of {0:?} does not point back at its parent")]
    BrokenParentLink(NodeId),
    /// An internal node has exactly one child.
    #[error("internal node {0:?} has a single child")]
    LoneChild(NodeId),
    /// A node with children also carries a payload.
    #[error("internal node {0:?} carries a payload")]
    InternalWithPayload(NodeId),
    /// A node without children carries no payload.
    #[error("leaf {0:?} has no payload")]
    LeafWithoutPayload(NodeId),
    /// An internal circle differs from the merge of its children.
    #[error("circle of {0:?} is not the merge of its children")]
    StaleCircle(NodeId),
    /// The leaf count does not match the recorded size.
    #[error("tree records {recorded} leaves but {reachable} are reachable")]
    SizeMismatch {
        /// Size counter maintained by insert/remove.
        recorded: usize,
        /// Leaves found by walking from the root.
        reachable: usize,
    },
}
