// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::collections::BinaryHeap;

use super::fringe::Fringe;
use super::node::{Node, NodeArena, NodeId};
use super::query::CollisionQuery;
use super::TreeError;
use crate::types::circle::Circle;

/// Bounding volume hierarchy of circles built by on-line insertion.
///
/// Leaves hold one payload each; internal nodes hold the merge of their two
/// children's circles. Insertion follows Omohundro's on-line ball-tree
/// heuristic: a branch-and-bound best-first search picks the sibling that
/// minimises the merged volume plus the volume growth of every ancestor.
/// The result is near-optimal, not globally optimal.
///
/// Moves and resizes are handled by [`CircleTree::repair`], which refits in
/// place when possible and otherwise detaches and reinserts the same leaf id,
/// so callers may cache leaf ids across frames.
///
/// Complexity notes:
/// - Insert/remove/repair are `O(depth)` plus the insertion search, which on
///   a balanced tree visits a small fraction of the nodes.
/// - Range queries are output-sensitive; any query degenerates to `O(n)` when
///   every leaf overlaps the region.
#[derive(Debug, Clone)]
pub struct CircleTree<T> {
    arena: NodeArena<T>,
    root: Option<NodeId>,
    size: usize,
    // Sibling of the most recently inserted leaf. Seeds the next search; it
    // may have been removed since, so it is validated before use.
    last_insertion: Option<NodeId>,
}

/// Shape summary of a [`CircleTree`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeStats {
    /// Leaf count.
    pub leaves: usize,
    /// Internal node count (always `leaves - 1` for a non-empty tree).
    pub internal_nodes: usize,
    /// Depth of the deepest leaf (the root has depth 0).
    pub max_depth: usize,
    /// Slots allocated by the node arena.
    pub arena_slots: usize,
    /// Released slots waiting for reuse.
    pub free_slots: usize,
}

impl<T> Default for CircleTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CircleTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            size: 0,
            last_insertion: None,
        }
    }

    /// Creates an empty tree sized for roughly `leaves` objects.
    #[must_use]
    pub fn with_capacity(leaves: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(leaves.saturating_mul(2)),
            ..Self::new()
        }
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// `true` when the tree holds no leaves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Root node id.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node for a live id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id)
    }

    /// The node arena backing this tree.
    #[must_use]
    pub fn arena(&self) -> &NodeArena<T> {
        &self.arena
    }

    /// The other child of `id`'s parent; `None` for the root or a dead id.
    #[must_use]
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.arena.get(id)?.parent()?;
        let (left, right) = self.arena.node(parent).children()?;
        Some(if left == id { right } else { left })
    }

    /// Inserts a new leaf and returns its id.
    pub fn insert(&mut self, circle: Circle, payload: T) -> NodeId {
        let leaf = self.arena.acquire(circle, Some(payload));
        let hint = self.last_insertion.filter(|id| self.is_attached(*id));
        self.attach(leaf, hint);
        self.last_insertion = self.sibling(leaf);
        leaf
    }

    /// Removes a leaf, returning its payload.
    ///
    /// Ids that do not name a live leaf are ignored and yield `None`.
    pub fn remove(&mut self, leaf: NodeId) -> Option<T> {
        if !self.is_attached_leaf(leaf) {
            return None;
        }
        self.detach(leaf);
        self.arena.release(leaf)
    }

    /// Updates a leaf's circle after its object moved or resized.
    ///
    /// Keeps the leaf id stable. Returns `false` when `leaf` is not a live leaf.
    pub fn repair(&mut self, leaf: NodeId, circle: Circle) -> bool {
        if !self.is_attached_leaf(leaf) {
            return false;
        }
        let node = self.arena.node(leaf);
        if *node.circle() == circle {
            return true;
        }
        match node.parent() {
            None => self.arena.set_circle(leaf, circle),
            Some(parent) if self.arena.node(parent).circle().contains(&circle) => {
                self.arena.set_circle(leaf, circle);
                self.refit_from(Some(parent));
            }
            Some(_) => {
                let former_sibling = self.detach(leaf);
                self.arena.set_circle(leaf, circle);
                self.attach(leaf, former_sibling);
            }
        }
        true
    }

    /// Collects the payloads of every leaf whose circle intersects `region`
    /// and passes `query`. Order is unspecified.
    pub fn query_intersections<Q>(&self, region: &Circle, query: &Q) -> Vec<T>
    where
        T: Clone,
        Q: CollisionQuery<T> + ?Sized,
    {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.arena.node(id);
            if !node.circle().intersects(region) {
                continue;
            }
            if let Some((left, right)) = node.children() {
                stack.push(right);
                stack.push(left);
            } else if let Some(payload) = node.payload() {
                if query.check_collision(payload, node.circle()) {
                    out.push(payload.clone());
                }
            }
        }
        out
    }

    /// Collects the payloads of every leaf whose circle contains `(x, y)` and
    /// passes `query`.
    pub fn query_point<Q>(&self, x: f64, y: f64, query: &Q) -> Vec<T>
    where
        T: Clone,
        Q: CollisionQuery<T> + ?Sized,
    {
        self.query_intersections(&Circle::point(x, y), query)
    }

    /// Finds any one leaf intersecting `region` that passes `query`.
    ///
    /// With a `start` leaf the search walks outward: the start's sibling
    /// subtree is searched downward first, then the search escalates to the
    /// parent's sibling and so on up to the root. The start leaf itself is
    /// never reported. Without a start the whole tree is searched downward.
    pub fn query_one_intersecting<Q>(
        &self,
        start: Option<NodeId>,
        region: &Circle,
        query: &Q,
    ) -> Option<T>
    where
        T: Clone,
        Q: CollisionQuery<T> + ?Sized,
    {
        let Some(start) = start else {
            return self
                .root
                .and_then(|root| self.first_downwards(root, region, query));
        };
        if !self.is_attached(start) {
            return None;
        }
        let mut cursor = start;
        loop {
            if let Some(sibling) = self.sibling(cursor) {
                if let Some(hit) = self.first_downwards(sibling, region, query) {
                    return Some(hit);
                }
            }
            cursor = self.arena.node(cursor).parent()?;
        }
    }

    /// Visits every node depth-first (pre-order, left before right) with its
    /// depth below the root.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, &Node<T>, usize),
    {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.arena.node(id);
            visit(id, node, depth);
            if let Some(right) = node.right() {
                stack.push((right, depth + 1));
            }
            if let Some(left) = node.left() {
                stack.push((left, depth + 1));
            }
        }
    }

    /// Every leaf as `(id, payload, circle)`.
    #[must_use]
    pub fn leaves(&self) -> Vec<(NodeId, &T, Circle)> {
        let mut out = Vec::with_capacity(self.size);
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.arena.node(id);
            if let Some((left, right)) = node.children() {
                stack.push(right);
                stack.push(left);
            } else if let Some(payload) = node.payload() {
                out.push((id, payload, *node.circle()));
            }
        }
        out
    }

    /// Shape summary.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            arena_slots: self.arena.slot_count(),
            free_slots: self.arena.free_count(),
            ..TreeStats::default()
        };
        self.walk(|_, node, depth| {
            if node.is_internal() {
                stats.internal_nodes += 1;
            } else {
                stats.leaves += 1;
                stats.max_depth = stats.max_depth.max(depth);
            }
        });
        stats
    }

    /// Checks every structural invariant of the hierarchy.
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            return if self.size == 0 {
                Ok(())
            } else {
                Err(TreeError::SizeMismatch {
                    recorded: self.size,
                    reachable: 0,
                })
            };
        };
        let root_node = self.arena.get(root).ok_or(TreeError::DanglingLink(root))?;
        if root_node.parent().is_some() {
            return Err(TreeError::RootHasParent(root));
        }
        let mut reachable = 0usize;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.arena.get(id).ok_or(TreeError::DanglingLink(id))?;
            match (node.left(), node.right()) {
                (None, None) => {
                    if node.payload().is_none() {
                        return Err(TreeError::LeafWithoutPayload(id));
                    }
                    reachable += 1;
                }
                (Some(left), Some(right)) => {
                    if node.payload().is_some() {
                        return Err(TreeError::InternalWithPayload(id));
                    }
                    let l = self.arena.get(left).ok_or(TreeError::DanglingLink(id))?;
                    let r = self.arena.get(right).ok_or(TreeError::DanglingLink(id))?;
                    if l.parent() != Some(id) || r.parent() != Some(id) {
                        return Err(TreeError::BrokenParentLink(id));
                    }
                    if l.circle().merge(r.circle()) != *node.circle() {
                        return Err(TreeError::StaleCircle(id));
                    }
                    stack.push(left);
                    stack.push(right);
                }
                _ => return Err(TreeError::LoneChild(id)),
            }
        }
        if reachable != self.size {
            return Err(TreeError::SizeMismatch {
                recorded: self.size,
                reachable,
            });
        }
        Ok(())
    }

    fn is_attached(&self, id: NodeId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|n| n.parent().is_some() || self.root == Some(id))
    }

    fn is_attached_leaf(&self, id: NodeId) -> bool {
        self.is_attached(id) && self.arena.node(id).is_leaf()
    }

    fn first_downwards<Q>(&self, from: NodeId, region: &Circle, query: &Q) -> Option<T>
    where
        T: Clone,
        Q: CollisionQuery<T> + ?Sized,
    {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let node = self.arena.node(id);
            if !node.circle().intersects(region) {
                continue;
            }
            if let Some((left, right)) = node.children() {
                stack.push(right);
                stack.push(left);
            } else if let Some(payload) = node.payload() {
                if query.check_collision(payload, node.circle()) {
                    return Some(payload.clone());
                }
            }
        }
        None
    }

    /// Links a detached leaf into the tree next to the best sibling.
    fn attach(&mut self, leaf: NodeId, hint: Option<NodeId>) {
        let circle = *self.arena.node(leaf).circle();
        match self.best_sibling(&circle, hint) {
            None => self.root = Some(leaf),
            Some(sibling) => self.splice(leaf, sibling),
        }
        self.size += 1;
    }

    /// Replaces `sibling` with a new internal node holding `sibling` and `leaf`.
    fn splice(&mut self, leaf: NodeId, sibling: NodeId) {
        let old_parent = self.arena.node(sibling).parent();
        let merged = self
            .arena
            .node(sibling)
            .circle()
            .merge(self.arena.node(leaf).circle());
        let branch = self.arena.acquire(merged, None);
        self.arena.set_parent(branch, old_parent);
        self.arena.set_children(branch, sibling, leaf);
        match old_parent {
            None => self.root = Some(branch),
            Some(parent) => self.arena.replace_child(parent, sibling, branch),
        }
        self.arena.set_parent(sibling, Some(branch));
        self.arena.set_parent(leaf, Some(branch));
        self.refit_from(old_parent);
    }

    /// Unlinks `leaf` from the tree without releasing it, collapsing its
    /// parent. Returns the former sibling.
    fn detach(&mut self, leaf: NodeId) -> Option<NodeId> {
        let sibling = match self.arena.node(leaf).parent() {
            None => {
                debug_assert_eq!(self.root, Some(leaf), "detached leaf is not the root");
                self.root = None;
                None
            }
            Some(parent) => {
                let sibling = self.sibling(leaf);
                debug_assert!(sibling.is_some(), "internal node {parent:?} has a single child");
                let grandparent = self.arena.node(parent).parent();
                if let Some(sibling) = sibling {
                    self.arena.set_parent(sibling, grandparent);
                    match grandparent {
                        None => self.root = Some(sibling),
                        Some(g) => self.arena.replace_child(g, parent, sibling),
                    }
                }
                // The parent still lists `leaf` as a child, so releasing it
                // also clears the leaf's parent link.
                self.arena.release(parent);
                self.refit_from(grandparent);
                sibling
            }
        };
        self.arena.reset(leaf);
        if self.last_insertion == Some(leaf) {
            self.last_insertion = None;
        }
        self.size -= 1;
        sibling
    }

    /// Recomputes ancestor circles from `start` upward, stopping once a
    /// circle comes out unchanged (everything above is then still exact).
    fn refit_from(&mut self, start: Option<NodeId>) {
        let mut cursor = start;
        while let Some(id) = cursor {
            let node = self.arena.node(id);
            let Some((left, right)) = node.children() else {
                debug_assert!(false, "refit reached non-internal node {id:?}");
                return;
            };
            let merged = self
                .arena
                .node(left)
                .circle()
                .merge(self.arena.node(right).circle());
            if merged == *node.circle() {
                return;
            }
            cursor = node.parent();
            self.arena.set_circle(id, merged);
        }
    }

    /// Branch-and-bound search for the node whose pairing with `circle`
    /// minimises merged volume plus total ancestor expansion.
    fn best_sibling(&self, circle: &Circle, hint: Option<NodeId>) -> Option<NodeId> {
        let root = self.root?;
        let root_node = self.arena.node(root);
        if root_node.is_leaf() {
            return Some(root);
        }
        let root_fringe = Fringe {
            node: root,
            ancestor_expansion: 0.0,
            volume: root_node.circle().merge(circle).volume(),
        };
        let mut best = root_fringe;
        if let Some(guess) = hint.filter(|h| *h != root) {
            let guess = self.fringe_at(circle, guess);
            if guess.cost() < best.cost() {
                best = guess;
            }
        }

        let mut frontier = BinaryHeap::new();
        frontier.push(root_fringe);
        while let Some(current) = frontier.pop() {
            if current.ancestor_expansion >= best.cost() {
                break;
            }
            let node = self.arena.node(current.node);
            let Some((left, right)) = node.children() else {
                continue;
            };
            // Growth of `current.node` itself joins the ancestors of its children.
            let expansion = current.cost() - node.circle().volume();
            for child in [left, right] {
                let child_node = self.arena.node(child);
                let volume = child_node.circle().merge(circle).volume();
                let candidate = Fringe {
                    node: child,
                    ancestor_expansion: expansion,
                    volume,
                };
                if candidate.cost() < best.cost() {
                    best = candidate;
                }
                if child_node.is_internal() {
                    frontier.push(candidate);
                }
            }
        }
        Some(best.node)
    }

    /// Full cost of pairing `circle` with an arbitrary attached node.
    fn fringe_at(&self, circle: &Circle, node: NodeId) -> Fringe {
        let volume = self.arena.node(node).circle().merge(circle).volume();
        let mut ancestor_expansion = 0.0;
        let mut cursor = self.arena.node(node).parent();
        while let Some(id) = cursor {
            let ancestor = self.arena.node(id);
            let delta = ancestor.circle().merge(circle).volume() - ancestor.circle().volume();
            if delta <= 0.0 {
                // This ancestor already encloses the circle, and so do all above it.
                break;
            }
            ancestor_expansion += delta;
            cursor = ancestor.parent();
        }
        Fringe {
            node,
            ancestor_expansion,
            volume,
        }
    }
}
