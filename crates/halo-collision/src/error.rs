// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for the collision facade.

use halo_geom::TreeError;
use thiserror::Error;

/// Errors surfaced by [`crate::CollisionChecker`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// Remove or update of an object the checker does not track.
    #[error("object {0} is not tracked")]
    NotTracked(String),
    /// The world reported a bounding circle that is not finite or has a
    /// negative radius.
    #[error("invalid bounding circle for {0}")]
    InvalidBounds(String),
    /// Checker configuration rejected on construction.
    #[error("invalid checker config: {0}")]
    InvalidConfig(String),
    /// Query shape that is not implemented.
    #[error("{0} is not supported")]
    Unsupported(&'static str),
    /// Tracked object count and tree leaf count disagree.
    #[error("{tracked} objects tracked but {in_tree} leaves in the tree")]
    Desync {
        /// Objects in the side table.
        tracked: usize,
        /// Leaves in the tree.
        in_tree: usize,
    },
    /// A tracked object's cached leaf no longer carries that object.
    #[error("cached leaf for {0} does not hold it")]
    StaleHandle(String),
    /// Structural invariant violation inside the tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
