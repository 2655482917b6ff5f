// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::cmp::Ordering;

use super::node::NodeId;

/// Candidate insertion point discovered during the best-sibling search.
///
/// `volume` is the volume of the circle that would enclose the candidate and
/// the new leaf; `ancestor_expansion` is the summed volume growth of every
/// ancestor of the candidate caused by that insertion.
#[derive(Debug, Copy, Clone)]
pub struct Fringe {
    /// Candidate sibling.
    pub node: NodeId,
    /// Total ancestor volume growth.
    pub ancestor_expansion: f64,
    /// Volume of the would-be new parent.
    pub volume: f64,
}

impl Fringe {
    /// Total cost of inserting next to `node`.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.ancestor_expansion + self.volume
    }
}

// `BinaryHeap` is a max-heap; reverse the comparison so the smallest ancestor
// expansion pops first. Ties resolve on the node id to keep the search
// deterministic.
impl Ord for Fringe {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .ancestor_expansion
            .total_cmp(&self.ancestor_expansion)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Fringe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Fringe {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fringe {}
