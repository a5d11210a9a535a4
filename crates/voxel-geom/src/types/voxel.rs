// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GeomError;
use crate::types::axis::Axis;

/// Integer voxel address `(i, j, k)` along S, T, R.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Voxel {
    /// Index along S.
    pub i: u32,
    /// Index along T.
    pub j: u32,
    /// Index along R.
    pub k: u32,
}

impl Voxel {
    /// Creates a voxel address.
    pub const fn new(i: u32, j: u32, k: u32) -> Self {
        Self { i, j, k }
    }

    /// Returns `[i, j, k]`.
    pub fn to_array(self) -> [u32; 3] {
        [self.i, self.j, self.k]
    }

    /// Index along `axis`.
    pub fn get(self, axis: Axis) -> u32 {
        self.to_array()[axis.index()]
    }
}

impl From<[u32; 3]> for Voxel {
    fn from([i, j, k]: [u32; 3]) -> Self {
        Self::new(i, j, k)
    }
}

impl From<Voxel> for [u32; 3] {
    fn from(value: Voxel) -> Self {
        value.to_array()
    }
}

impl fmt::Display for Voxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

/// Discrete grid dimensions: voxel counts along S, T, R plus per-voxel depth.
///
/// `v_size` is the number of values stored per voxel (e.g. channels); it is
/// not a spatial dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    /// Voxels along S.
    pub s_size: u32,
    /// Voxels along T.
    pub t_size: u32,
    /// Voxels along R.
    pub r_size: u32,
    /// Values per voxel.
    pub v_size: u32,
}

impl GridDims {
    /// Dimensions with a single value per voxel.
    pub const fn new(s_size: u32, t_size: u32, r_size: u32) -> Self {
        Self {
            s_size,
            t_size,
            r_size,
            v_size: 1,
        }
    }

    /// Returns a copy with `v_size` replaced.
    pub const fn with_v_size(self, v_size: u32) -> Self {
        Self { v_size, ..self }
    }

    /// Returns `self` if every size is at least 1.
    pub fn validate(self) -> Result<Self, GeomError> {
        if self.s_size == 0 || self.t_size == 0 || self.r_size == 0 || self.v_size == 0 {
            return Err(GeomError::InvalidDimensions { dims: self });
        }
        Ok(self)
    }

    /// Voxel count along `axis`.
    pub const fn size(&self, axis: Axis) -> u32 {
        match axis {
            Axis::S => self.s_size,
            Axis::T => self.t_size,
            Axis::R => self.r_size,
        }
    }

    /// Number of voxels (`S·T·R`).
    pub fn voxel_count(&self) -> usize {
        self.s_size as usize * self.t_size as usize * self.r_size as usize
    }

    /// Number of stored values (`S·T·R·V`).
    pub fn element_count(&self) -> usize {
        self.voxel_count() * self.v_size as usize
    }

    /// Returns `true` when `voxel` addresses a cell inside these dimensions.
    pub fn contains(&self, voxel: Voxel) -> bool {
        voxel.i < self.s_size && voxel.j < self.t_size && voxel.k < self.r_size
    }

    /// Returns `[s_size, t_size, r_size, v_size]`.
    pub fn to_array(self) -> [u32; 4] {
        [self.s_size, self.t_size, self.r_size, self.v_size]
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}×{}×{}×{}",
            self.s_size, self.t_size, self.r_size, self.v_size
        )
    }
}

/// Rectangular voxel range, inclusive on `min` and exclusive on `max`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubGrid {
    min: [u32; 3],
    max: [u32; 3],
}

impl SubGrid {
    /// Creates a range from its inclusive lower and exclusive upper corners.
    pub const fn new(min: [u32; 3], max: [u32; 3]) -> Self {
        Self { min, max }
    }

    /// Inclusive lower corner.
    pub fn min(&self) -> Voxel {
        Voxel::from(self.min)
    }

    /// Exclusive upper bounds along S, T, R.
    pub fn max(&self) -> [u32; 3] {
        self.max
    }

    /// Returns `[min_i, min_j, min_k, max_i, max_j, max_k]`.
    pub fn to_array(self) -> [u32; 6] {
        let [a, b, c] = self.min;
        let [d, e, f] = self.max;
        [a, b, c, d, e, f]
    }

    /// Number of voxels in the range.
    pub fn len(&self) -> usize {
        (0..3)
            .map(|n| self.max[n].saturating_sub(self.min[n]) as usize)
            .product()
    }

    /// Returns `true` when the range covers no voxels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` when `voxel` falls inside the range.
    pub fn contains(&self, voxel: Voxel) -> bool {
        let v = voxel.to_array();
        (0..3).all(|n| self.min[n] <= v[n] && v[n] < self.max[n])
    }

    /// Iterates the voxels of the range with `i` varying fastest.
    pub fn voxels(&self) -> impl Iterator<Item = Voxel> {
        let [i0, j0, k0] = self.min;
        let [i1, j1, k1] = self.max;
        (k0..k1).flat_map(move |k| {
            (j0..j1).flat_map(move |j| (i0..i1).map(move |i| Voxel::new(i, j, k)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_dims_are_invalid() {
        assert!(GridDims::new(4, 0, 2).validate().is_err());
        assert!(GridDims::new(4, 3, 2).with_v_size(0).validate().is_err());
        assert!(GridDims::new(1, 1, 1).validate().is_ok());
    }

    #[test]
    fn counts_include_depth() {
        let dims = GridDims::new(4, 3, 2).with_v_size(3);
        assert_eq!(dims.voxel_count(), 24);
        assert_eq!(dims.element_count(), 72);
    }

    #[test]
    fn sub_grid_iterates_i_fastest() {
        let sub = SubGrid::new([1, 0, 0], [3, 2, 1]);
        let voxels: Vec<_> = sub.voxels().map(Voxel::to_array).collect();
        assert_eq!(voxels, vec![[1, 0, 0], [2, 0, 0], [1, 1, 0], [2, 1, 0]]);
        assert_eq!(sub.len(), 4);
        assert!(sub.contains(Voxel::new(2, 1, 0)));
        assert!(!sub.contains(Voxel::new(3, 1, 0)));
    }

    #[test]
    fn inverted_sub_grid_is_empty() {
        let sub = SubGrid::new([2, 2, 2], [1, 5, 5]);
        assert!(sub.is_empty());
        assert_eq!(sub.voxels().count(), 0);
    }
}
