// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Halo crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`world`] - `ToyWorld`, a small `WorldView` with a class hierarchy
//! - [`scenario`] - Seeded populations, per-frame jitter and brute-force oracles

pub mod config;
pub mod scenario;
pub mod world;

pub use config::InMemoryConfigStore;
pub use scenario::{
    brute_force_in_range, brute_force_intersecting, disjoint_grid, jitter, random_world,
    track_all, ScenarioSpec,
};
pub use world::{Body, BodyId, Kind, ToyWorld};
