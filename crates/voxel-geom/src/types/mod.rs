// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Small value types shared by boxes and grids.
//!
//! Addressing notes:
//! - Voxels are `(i, j, k)` triples along S, T, R; `i` varies fastest in the
//!   linear index `k * s_size * t_size + j * s_size + i`.
//! - Sub-grid bounds are inclusive on `min` and exclusive on `max`.

#[doc = "Box axis and face selectors."]
pub mod axis;
#[doc = "Voxel addresses, grid dimensions, and sub-grid ranges."]
pub mod voxel;

pub use axis::{Axis, Side};
pub use voxel::{GridDims, SubGrid, Voxel};
