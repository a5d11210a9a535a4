// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by box and grid operations.

use thiserror::Error;
use voxel_math::Vec3;

use crate::types::{GridDims, Voxel};

/// Failure of a box or grid computation.
///
/// None of these are retryable; they describe inputs the geometry cannot
/// resolve and must be propagated to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeomError {
    /// Two or more box axes are zero-length, so no orientation can be
    /// recovered.
    #[error("{zero_axes} of 3 box axes are zero-length; orientation is undefined")]
    DegenerateAxes {
        /// Number of zero-length axes.
        zero_axes: usize,
    },
    /// A linear voxel index lies outside `[0, len)`.
    #[error("voxel index {index} out of range for grid of {len} voxels")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of voxels in the grid.
        len: usize,
    },
    /// A voxel triple lies outside the grid dimensions.
    #[error("voxel {voxel} out of range for grid {dims}")]
    VoxelOutOfRange {
        /// Offending voxel.
        voxel: Voxel,
        /// Grid dimensions.
        dims: GridDims,
    },
    /// A world point resolves to no voxel, even with boundary tolerance.
    #[error("point {point:?} lies outside the grid")]
    PointOutsideGrid {
        /// Offending world-space point.
        point: Vec3,
    },
    /// A grid size is zero.
    #[error("invalid grid dimensions {dims}: every size must be at least 1")]
    InvalidDimensions {
        /// Rejected dimensions.
        dims: GridDims,
    },
    /// A vertex list had the wrong number of corners.
    #[error("expected {expected} box vertices, got {got}")]
    InvalidVertexCount {
        /// Required number of vertices.
        expected: usize,
        /// Number supplied.
        got: usize,
    },
    /// A bounding box was requested for no points.
    #[error("cannot bound an empty point set")]
    EmptyPointSet,
}
