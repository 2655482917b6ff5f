// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the index (bounding circles).
//!
//! Semantics notes:
//! - Intersection and containment are inclusive on the boundary so touching
//!   circles are reported as overlapping.
//! - `merge` is the only routine used to build ancestor circles; the tree
//!   relies on it being a pure function of its inputs.

#[doc = "Bounding circles (physical coordinates)."]
pub mod circle;
