// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![doc = r"Oriented-box and voxel-grid geometry.

This crate provides:
- Oriented boxes (`OrientedBox`): a base point plus three edge vectors, with
  corner/edge/face enumeration, direction-cosine basis transforms,
  containment tests, and degenerate-axis recovery.
- Voxel grids (`VoxelGrid`): a box discretized into `S×T×R` voxels, with
  index↔voxel addressing, voxel-center origins, world↔grid coordinate
  mapping, neighbor lookup, enclosing-voxel resolution, and sub-grid
  extraction.
- A shared `BoxGeometry` capability implemented by both.

Design notes:
- Boxes and grids are immutable `Copy` values; `with_*` methods return
  modified copies.
- Failures are typed (`GeomError`); nothing returns sentinel values.
- Tolerances come from `GridConfig`; the plain entry points use its
  defaults.
"]

/// Tolerance configuration.
pub mod config;
/// Error type.
pub mod error;
/// Shared box capability trait.
pub mod geometry;
/// Oriented boxes.
pub mod oriented_box;
/// Axis selectors, voxel addresses, and grid dimensions.
pub mod types;
/// Voxel grids.
pub mod voxel_grid;

pub use config::{ConfigError, GridConfig};
pub use error::GeomError;
pub use geometry::BoxGeometry;
pub use oriented_box::{bounding_box, OrientedBox};
pub use types::{Axis, GridDims, Side, SubGrid, Voxel};
pub use voxel_grid::{GridRecord, VoxelGrid};
pub use voxel_math::{Mat4, Vec3};
