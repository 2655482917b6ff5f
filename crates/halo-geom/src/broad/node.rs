// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::types::circle::Circle;

/// Handle to a node slot inside a [`NodeArena`].
///
/// Ids are only meaningful for the arena (and tree) that issued them. A
/// released id may be reissued to a different node later.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Slot index inside the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Binary tree node: a bounding circle plus parent/child links.
///
/// Leaves carry exactly one payload and no children; internal nodes carry no
/// payload and exactly two children.
#[derive(Debug, Clone)]
pub struct Node<T> {
    circle: Circle,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    payload: Option<T>,
    live: bool,
}

impl<T> Node<T> {
    const fn vacant() -> Self {
        Self {
            circle: Circle::point(0.0, 0.0),
            parent: None,
            left: None,
            right: None,
            payload: None,
            live: false,
        }
    }

    /// Bounding circle covering this node's subtree.
    #[must_use]
    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    /// Parent link (`None` for the root or a detached node).
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Left child link.
    #[must_use]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Right child link.
    #[must_use]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Both children, when the node is internal.
    #[must_use]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }

    /// Payload of a leaf.
    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// `true` for a node carrying a payload and no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.payload.is_some() && self.left.is_none() && self.right.is_none()
    }

    /// `true` for a node without payload and with both children.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.payload.is_none() && self.left.is_some() && self.right.is_some()
    }
}

/// Owner of every node of one tree, recycling released slots.
///
/// `acquire` hands out a fully initialised node; `release` unlinks it
/// symmetrically, clears its circle and payload and pushes the slot on a free
/// list. A released slot is never reachable from the tree that owns the arena.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeId>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Creates an arena with room for `capacity` nodes before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Hands out a detached node with the given circle and payload.
    ///
    /// # Panics
    /// Panics if the arena would exceed `u32::MAX` slots.
    pub fn acquire(&mut self, circle: Circle, payload: Option<T>) -> NodeId {
        let id = if let Some(id) = self.free.pop() {
            id
        } else {
            assert!(self.nodes.len() < u32::MAX as usize, "node arena exhausted");
            #[allow(clippy::cast_possible_truncation)]
            let id = NodeId(self.nodes.len() as u32);
            self.nodes.push(Node::vacant());
            id
        };
        let node = &mut self.nodes[id.index()];
        debug_assert!(!node.live, "acquired a live slot");
        debug_assert!(
            node.parent.is_none() && node.left.is_none() && node.right.is_none(),
            "free slot carried links"
        );
        node.circle = circle;
        node.payload = payload;
        node.live = true;
        id
    }

    /// Unlinks, clears and frees the node, returning its payload.
    ///
    /// Releasing an id that is not live is a no-op returning `None`.
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        self.reset(id);
        let node = &mut self.nodes[id.index()];
        node.live = false;
        node.circle = Circle::default();
        let payload = node.payload.take();
        self.free.push(id);
        payload
    }

    /// Detaches the node from its parent and children.
    ///
    /// Links are cleared symmetrically: the parent slot pointing at this node
    /// and the parent pointers of children that point back here are nulled
    /// along with this node's own links.
    pub fn reset(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, left, right) = (node.parent, node.left, node.right);
        for child in [left, right].into_iter().flatten() {
            let child = &mut self.nodes[child.index()];
            if child.parent == Some(id) {
                child.parent = None;
            }
        }
        if let Some(parent) = parent {
            let parent = &mut self.nodes[parent.index()];
            if parent.left == Some(id) {
                parent.left = None;
            } else if parent.right == Some(id) {
                parent.right = None;
            }
        }
        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.left = None;
        node.right = None;
    }

    /// Returns the node if `id` refers to a live slot.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index()).filter(|n| n.live)
    }

    /// `true` if `id` refers to a live slot.
    #[must_use]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Number of released slots awaiting reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total slots ever allocated.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    // Unchecked accessors for tree surgery on ids the tree knows are live.

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    pub(crate) fn set_circle(&mut self, id: NodeId, circle: Circle) {
        self.nodes[id.index()].circle = circle;
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.index()].parent = parent;
    }

    pub(crate) fn set_children(&mut self, id: NodeId, left: NodeId, right: NodeId) {
        let node = &mut self.nodes[id.index()];
        node.left = Some(left);
        node.right = Some(right);
    }

    /// Points the child slot of `parent` that holds `old` at `new`.
    pub(crate) fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let node = &mut self.nodes[parent.index()];
        if node.left == Some(old) {
            node.left = Some(new);
        } else {
            debug_assert_eq!(node.right, Some(old), "{old:?} is not a child of {parent:?}");
            node.right = Some(new);
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn linked_triplet(arena: &mut NodeArena<u32>) -> (NodeId, NodeId, NodeId) {
        let parent = arena.acquire(Circle::new(0.0, 0.0, 4.0), None);
        let left = arena.acquire(Circle::new(-1.0, 0.0, 1.0), Some(1));
        let right = arena.acquire(Circle::new(1.0, 0.0, 1.0), Some(2));
        arena.set_children(parent, left, right);
        arena.set_parent(left, Some(parent));
        arena.set_parent(right, Some(parent));
        (parent, left, right)
    }

    #[test]
    fn reset_unlinks_parent_slot_and_children() {
        let mut arena = NodeArena::new();
        let (parent, left, right) = linked_triplet(&mut arena);

        arena.reset(left);
        assert_eq!(arena.node(parent).left(), None);
        assert_eq!(arena.node(parent).right(), Some(right));
        assert_eq!(arena.node(left).parent(), None);

        arena.reset(parent);
        assert_eq!(arena.node(right).parent(), None);
        assert!(arena.node(parent).children().is_none());
    }

    #[test]
    fn reset_leaves_foreign_back_links_alone() {
        let mut arena = NodeArena::new();
        let (parent, left, _right) = linked_triplet(&mut arena);
        let adopter = arena.acquire(Circle::new(5.0, 5.0, 1.0), None);
        // `left` now claims a different parent; resetting the old parent must
        // not clobber that link.
        arena.set_parent(left, Some(adopter));
        arena.reset(parent);
        assert_eq!(arena.node(left).parent(), Some(adopter));
    }

    #[test]
    fn released_slot_is_reissued_without_residual_state() {
        let mut arena = NodeArena::new();
        let (parent, left, right) = linked_triplet(&mut arena);

        assert_eq!(arena.release(left), Some(1));
        assert!(!arena.is_live(left));
        assert_eq!(arena.free_count(), 1);
        assert_eq!(arena.node(parent).left(), None);

        let reused = arena.acquire(Circle::new(9.0, 9.0, 2.0), Some(7));
        assert_eq!(reused, left);
        let node = arena.get(reused).expect("reissued node is live");
        assert_eq!(node.parent(), None);
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(node.payload(), Some(&7));
        assert_eq!(*node.circle(), Circle::new(9.0, 9.0, 2.0));
        assert_eq!(arena.node(right).parent(), Some(parent));
    }

    #[test]
    fn release_of_dead_slot_is_noop() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let id = arena.acquire(Circle::default(), Some(3));
        assert_eq!(arena.release(id), Some(3));
        assert_eq!(arena.release(id), None);
        assert_eq!(arena.free_count(), 1);
        assert_eq!(arena.live_count(), 0);
    }
}
