// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared capability for anything laid out over an oriented box.

use voxel_math::{Mat4, Vec3};

use crate::oriented_box::OrientedBox;

/// Types whose geometry is an [`OrientedBox`] ("has a basis transform, has
/// vertices").
///
/// Grids expose their bounding-box queries through this trait instead of
/// inheriting from the box type.
pub trait BoxGeometry {
    /// The underlying box.
    fn oriented_box(&self) -> &OrientedBox;

    /// World-to-local direction frame anchored at the box corner.
    fn basis_transform(&self) -> Mat4 {
        self.oriented_box().basis_transform()
    }

    /// Corners of the box in fixed order.
    fn vertices(&self) -> [Vec3; 8] {
        self.oriented_box().vertices()
    }

    /// Edges of the box as corner pairs.
    fn edges(&self) -> [[Vec3; 2]; 12] {
        self.oriented_box().edges()
    }

    /// Geometric center of the box.
    fn center(&self) -> Vec3 {
        self.oriented_box().center()
    }

    /// Componentwise minimum corner.
    fn min_point(&self) -> Vec3 {
        self.oriented_box().min_point()
    }

    /// Componentwise maximum corner.
    fn max_point(&self) -> Vec3 {
        self.oriented_box().max_point()
    }

    /// Approximate containment test against the box.
    fn contains(&self, p: &Vec3) -> bool {
        self.oriented_box().contains(p)
    }
}

impl BoxGeometry for OrientedBox {
    fn oriented_box(&self) -> &OrientedBox {
        self
    }
}
