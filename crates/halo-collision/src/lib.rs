// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Collision checking for Halo worlds.
//!
//! [`CollisionChecker`] tracks world objects in a [`halo_geom::CircleTree`],
//! scaling their bounding circles from world units into physical units by the
//! configured cell size, and answers point, range, neighbour and
//! any-intersection queries with an optional class filter.
//!
//! The world itself stays outside the checker: every call receives a
//! [`WorldView`] so the checker never stores callbacks or back-references into
//! caller objects. Object to leaf bookkeeping lives in a side table owned by
//! the checker.

pub mod checker;
pub mod config;
pub mod config_fs;
pub mod error;
pub mod query;
pub mod shared;
pub mod world;

pub use checker::CollisionChecker;
pub use config::{CheckerConfig, ConfigError, ConfigService, ConfigStore, CHECKER_CONFIG_KEY};
pub use config_fs::DirConfigStore;
pub use error::CollisionError;
pub use shared::SharedCollisionChecker;
pub use world::WorldView;
