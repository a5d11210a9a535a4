// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Voxel grids: an oriented box discretized into `S×T×R` cells.
//!
//! Coordinate frames:
//! - World space: where box corners and query points live.
//! - Grid coordinates: real-valued, one unit per voxel width, with voxel
//!   centers on integers (`origin()` maps to `(0, 0, 0)`).
//! - Voxel addresses: integer `(i, j, k)` triples or linear indices with `i`
//!   varying fastest.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use voxel_math::{self as math, Mat4, Vec3, EPSILON};

use crate::config::GridConfig;
use crate::error::GeomError;
use crate::geometry::BoxGeometry;
use crate::oriented_box::{OrientedBox, ROUNDING_ULPS};
use crate::types::{Axis, GridDims, SubGrid, Voxel};

/// An [`OrientedBox`] discretized into `s_size × t_size × r_size` voxels,
/// each holding `v_size` values.
///
/// Invariants:
/// - Every size is at least 1 (checked on construction).
/// - `absolute_index` and `index_to_voxel` are exact inverses over
///   `[0, s_size·t_size·r_size)`.
///
/// Grids are immutable values; `with_*` methods return modified copies.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord", into = "GridRecord")]
pub struct VoxelGrid {
    bounds: OrientedBox,
    dims: GridDims,
}

/// Flat persistence record for a [`VoxelGrid`]: base point, three axes, and
/// the four sizes.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRecord {
    /// Box base corner.
    pub base_point: Vec3,
    /// S edge vector.
    pub s_axis: Vec3,
    /// T edge vector.
    pub t_axis: Vec3,
    /// R edge vector.
    pub r_axis: Vec3,
    /// Voxels along S.
    pub s_size: u32,
    /// Voxels along T.
    pub t_size: u32,
    /// Voxels along R.
    pub r_size: u32,
    /// Values per voxel.
    pub v_size: u32,
}

impl From<VoxelGrid> for GridRecord {
    fn from(grid: VoxelGrid) -> Self {
        let b = grid.bounds;
        let d = grid.dims;
        Self {
            base_point: b.base_point(),
            s_axis: b.s_axis(),
            t_axis: b.t_axis(),
            r_axis: b.r_axis(),
            s_size: d.s_size,
            t_size: d.t_size,
            r_size: d.r_size,
            v_size: d.v_size,
        }
    }
}

impl TryFrom<GridRecord> for VoxelGrid {
    type Error = GeomError;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        let dims = GridDims {
            s_size: record.s_size,
            t_size: record.t_size,
            r_size: record.r_size,
            v_size: record.v_size,
        };
        let bounds = OrientedBox::new(
            record.base_point,
            record.s_axis,
            record.t_axis,
            record.r_axis,
        );
        Self::new(dims, bounds)
    }
}

impl Default for VoxelGrid {
    /// A single voxel spanning the unit cube.
    fn default() -> Self {
        Self {
            bounds: OrientedBox::default(),
            dims: GridDims::new(1, 1, 1),
        }
    }
}

impl BoxGeometry for VoxelGrid {
    fn oriented_box(&self) -> &OrientedBox {
        &self.bounds
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_f32(n: u32) -> f32 {
    n as f32
}

fn narrow(value: usize, index: usize, len: usize) -> Result<u32, GeomError> {
    u32::try_from(value).map_err(|_| GeomError::IndexOutOfRange { index, len })
}

/// Divides a local coordinate by a voxel width; `None` on a flat axis.
fn per_voxel(local: f32, width: f32) -> Option<f32> {
    (width.abs() > EPSILON).then(|| local / width)
}

/// Bound on the `f32` rounding error, in voxel widths, of a cell coordinate
/// computed from world points of the given `magnitude`.
fn rounding_slack(magnitude: f32, width: f32, size: u32) -> f32 {
    if width.abs() <= EPSILON {
        return 0.0;
    }
    ROUNDING_ULPS * f32::EPSILON * (magnitude / width.abs() + as_f32(size))
}

/// Floors a cell coordinate (measured from the box corner) into `[0, size)`.
///
/// A floored value one step outside either face is pulled back to the edge
/// cell when `cell` lies within `tolerance` of that face.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn resolve_cell(cell: f32, size: u32, tolerance: f32) -> Option<u32> {
    if !cell.is_finite() {
        return None;
    }
    let upper = as_f32(size);
    let floored = cell.floor();
    if floored < 0.0 {
        let snap = floored >= -1.0 && cell >= -tolerance;
        if snap {
            trace!(cell, "snapped point below base face to first voxel");
        }
        return snap.then_some(0);
    }
    if floored >= upper {
        let snap = floored <= upper && cell <= upper + tolerance;
        if snap {
            trace!(cell, size, "snapped point on outer face to last voxel");
        }
        return snap.then_some(size - 1);
    }
    Some(floored as u32)
}

impl VoxelGrid {
    /// Creates a grid over `bounds`.
    ///
    /// # Errors
    /// [`GeomError::InvalidDimensions`] if any size is zero.
    pub fn new(dims: GridDims, bounds: OrientedBox) -> Result<Self, GeomError> {
        Ok(Self {
            bounds,
            dims: dims.validate()?,
        })
    }

    /// Creates a grid with one value per voxel.
    pub fn with_sizes(
        s_size: u32,
        t_size: u32,
        r_size: u32,
        bounds: OrientedBox,
    ) -> Result<Self, GeomError> {
        Self::new(GridDims::new(s_size, t_size, r_size), bounds)
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Voxels along S.
    pub fn s_size(&self) -> u32 {
        self.dims.s_size
    }

    /// Voxels along T.
    pub fn t_size(&self) -> u32 {
        self.dims.t_size
    }

    /// Voxels along R.
    pub fn r_size(&self) -> u32 {
        self.dims.r_size
    }

    /// Values per voxel.
    pub fn v_size(&self) -> u32 {
        self.dims.v_size
    }

    /// Voxels along `axis`.
    pub fn size(&self, axis: Axis) -> u32 {
        self.dims.size(axis)
    }

    /// Number of voxels (`S·T·R`).
    pub fn voxel_count(&self) -> usize {
        self.dims.voxel_count()
    }

    /// Number of stored values (`S·T·R·V`).
    pub fn element_count(&self) -> usize {
        self.dims.element_count()
    }

    /// The bounding box the voxels subdivide.
    pub fn bounds(&self) -> OrientedBox {
        self.bounds
    }

    /// Returns a copy with new dimensions.
    pub fn with_dims(self, dims: GridDims) -> Result<Self, GeomError> {
        Self::new(dims, self.bounds)
    }

    /// Returns a copy over a new bounding box.
    pub fn with_bounds(self, bounds: OrientedBox) -> Self {
        Self { bounds, ..self }
    }

    /// Returns a copy with the box base point replaced.
    pub fn with_base_point(self, base_point: Vec3) -> Self {
        self.with_bounds(self.bounds.with_base_point(base_point))
    }

    /// Returns a copy with the S edge vector replaced.
    pub fn with_s_axis(self, axis: Vec3) -> Self {
        self.with_bounds(self.bounds.with_s_axis(axis))
    }

    /// Returns a copy with the T edge vector replaced.
    pub fn with_t_axis(self, axis: Vec3) -> Self {
        self.with_bounds(self.bounds.with_t_axis(axis))
    }

    /// Returns a copy with the R edge vector replaced.
    pub fn with_r_axis(self, axis: Vec3) -> Self {
        self.with_bounds(self.bounds.with_r_axis(axis))
    }

    /// Returns a copy with the S extent rescaled to `dim`.
    pub fn with_s_dim(self, dim: f32) -> Self {
        self.with_bounds(self.bounds.with_s_dim(dim))
    }

    /// Returns a copy with the T extent rescaled to `dim`.
    pub fn with_t_dim(self, dim: f32) -> Self {
        self.with_bounds(self.bounds.with_t_dim(dim))
    }

    /// Returns a copy with the R extent rescaled to `dim`.
    pub fn with_r_dim(self, dim: f32) -> Self {
        self.with_bounds(self.bounds.with_r_dim(dim))
    }

    // ── Addressing ──────────────────────────────────────────────────────

    fn linear_index(&self, voxel: Voxel) -> usize {
        let s = self.dims.s_size as usize;
        let t = self.dims.t_size as usize;
        voxel.k as usize * s * t + voxel.j as usize * s + voxel.i as usize
    }

    /// Linear index `k·s_size·t_size + j·s_size + i` of `voxel`.
    ///
    /// # Errors
    /// [`GeomError::VoxelOutOfRange`] if any component is outside the grid.
    pub fn absolute_index(&self, voxel: Voxel) -> Result<usize, GeomError> {
        if !self.dims.contains(voxel) {
            return Err(GeomError::VoxelOutOfRange {
                voxel,
                dims: self.dims,
            });
        }
        Ok(self.linear_index(voxel))
    }

    /// Voxel at linear index `index`; the inverse of
    /// [`VoxelGrid::absolute_index`].
    ///
    /// # Errors
    /// [`GeomError::IndexOutOfRange`] if `index ≥ s_size·t_size·r_size`.
    pub fn index_to_voxel(&self, index: usize) -> Result<Voxel, GeomError> {
        let len = self.voxel_count();
        if index >= len {
            return Err(GeomError::IndexOutOfRange { index, len });
        }
        let s = self.dims.s_size as usize;
        let slab = s * self.dims.t_size as usize;
        let r = index / slab;
        let residual = index - r * slab;
        let t = residual / s;
        let s_coord = residual - t * s;
        Ok(Voxel::new(
            narrow(s_coord, index, len)?,
            narrow(t, index, len)?,
            narrow(r, index, len)?,
        ))
    }

    /// Linear indices of the face-adjacent neighbors of voxel `index`, in
    /// S−, S+, T−, T+, R−, R+ order. Neighbors past the grid edge are
    /// omitted, so corners have 3, edges 4, faces 5, and interior voxels 6.
    pub fn neighbors(&self, index: usize) -> Result<Vec<usize>, GeomError> {
        let voxel = self.index_to_voxel(index)?;
        let mut out = Vec::with_capacity(6);
        for axis in Axis::ALL {
            let n = axis.index();
            let c = voxel.get(axis);
            let mut step = |value: u32| {
                let mut v = voxel.to_array();
                v[n] = value;
                out.push(self.linear_index(Voxel::from(v)));
            };
            if c > 0 {
                step(c - 1);
            }
            if c + 1 < self.size(axis) {
                step(c + 1);
            }
        }
        Ok(out)
    }

    /// Vertical flip of a T index (`t_size − j − 1`), as used when slices
    /// are written as images with the first row at the top.
    pub fn flip_t(&self, j: u32) -> Result<u32, GeomError> {
        if j >= self.dims.t_size {
            return Err(GeomError::IndexOutOfRange {
                index: j as usize,
                len: self.dims.t_size as usize,
            });
        }
        Ok(self.dims.t_size - j - 1)
    }

    /// The whole grid as a sub-grid range.
    pub fn full_sub_grid(&self) -> SubGrid {
        SubGrid::new(
            [0, 0, 0],
            [self.dims.s_size, self.dims.t_size, self.dims.r_size],
        )
    }

    /// Every voxel in linear-index order.
    pub fn voxels(&self) -> impl Iterator<Item = Voxel> {
        self.full_sub_grid().voxels()
    }

    // ── Geometry ────────────────────────────────────────────────────────

    /// Geometric span along S used for voxel sizing; the raw S axis length.
    pub fn geom_extent_s(&self) -> f32 {
        self.bounds.s_dim()
    }

    /// Geometric span along T used for voxel sizing; the raw T axis length.
    pub fn geom_extent_t(&self) -> f32 {
        self.bounds.t_dim()
    }

    /// Geometric span along R used for voxel sizing; the raw R axis length.
    pub fn geom_extent_r(&self) -> f32 {
        self.bounds.r_dim()
    }

    /// Geometric spans along S, T, R.
    pub fn geom_extents(&self) -> [f32; 3] {
        [
            self.geom_extent_s(),
            self.geom_extent_t(),
            self.geom_extent_r(),
        ]
    }

    /// Voxel widths along S, T, R (`geom_extent / size`).
    pub fn voxel_size(&self) -> Vec3 {
        let [s, t, r] = self.geom_extents();
        Vec3::new(
            s / as_f32(self.dims.s_size),
            t / as_f32(self.dims.t_size),
            r / as_f32(self.dims.r_size),
        )
    }

    /// World-space displacement of one voxel along each axis.
    fn voxel_steps(&self) -> [Vec3; 3] {
        let widths = self.voxel_size().to_array();
        let units = self.bounds.axes().map(|a| a.normalize());
        [
            units[0].scale(widths[0]),
            units[1].scale(widths[1]),
            units[2].scale(widths[2]),
        ]
    }

    /// World-space center of voxel `(0, 0, 0)`: the base point plus half a
    /// voxel along each axis.
    pub fn origin(&self) -> Vec3 {
        let [s, t, r] = self.voxel_steps();
        self.bounds
            .base_point()
            .add(&s.add(&t).add(&r).scale(0.5))
    }

    fn midpoint_unchecked(&self, voxel: Voxel) -> Vec3 {
        let [s, t, r] = self.voxel_steps();
        self.origin()
            .add(&s.scale(as_f32(voxel.i)))
            .add(&t.scale(as_f32(voxel.j)))
            .add(&r.scale(as_f32(voxel.k)))
    }

    /// World-space center of `voxel`.
    ///
    /// # Errors
    /// [`GeomError::VoxelOutOfRange`] if `voxel` is outside the grid.
    pub fn voxel_midpoint(&self, voxel: Voxel) -> Result<Vec3, GeomError> {
        if !self.dims.contains(voxel) {
            return Err(GeomError::VoxelOutOfRange {
                voxel,
                dims: self.dims,
            });
        }
        Ok(self.midpoint_unchecked(voxel))
    }

    /// World-space center of the voxel at linear index `index`.
    pub fn voxel_midpoint_at(&self, index: usize) -> Result<Vec3, GeomError> {
        Ok(self.midpoint_unchecked(self.index_to_voxel(index)?))
    }

    /// Grid vertices are voxel centers; same as
    /// [`VoxelGrid::voxel_midpoint_at`].
    pub fn vertex(&self, index: usize) -> Result<Vec3, GeomError> {
        self.voxel_midpoint_at(index)
    }

    /// Center of the first voxel (equal to [`VoxelGrid::origin`]).
    pub fn min_voxel_midpoint(&self) -> Vec3 {
        self.midpoint_unchecked(Voxel::new(0, 0, 0))
    }

    /// Center of the last voxel.
    pub fn max_voxel_midpoint(&self) -> Vec3 {
        self.midpoint_unchecked(Voxel::new(
            self.dims.s_size - 1,
            self.dims.t_size - 1,
            self.dims.r_size - 1,
        ))
    }

    /// Position of `p` in voxel widths along S, T, R, measured from the box
    /// corner. Flat axes yield `None`.
    ///
    /// Measuring from the base point keeps the box corners exact: the base
    /// maps to 0 and the opposite corner to the grid size.
    fn cell_coordinates(&self, p: &Vec3) -> [Option<f32>; 3] {
        let offset = p.sub(&self.bounds.base_point());
        let local = self
            .bounds
            .basis_transform()
            .transform_direction(&offset)
            .to_array();
        let width = self.voxel_size().to_array();
        [0, 1, 2].map(|n| per_voxel(local[n], width[n]))
    }

    /// Real-valued grid coordinate of world point `p`.
    ///
    /// Rotates `p - base_point` into the box frame with the direction cosines
    /// of [`OrientedBox::basis_transform`], divides by the voxel widths, and
    /// shifts by half a voxel so that voxel centers map to integers
    /// ([`VoxelGrid::origin`] is `(0, 0, 0)`). Flat axes map to 0.
    pub fn grid_coordinate(&self, p: &Vec3) -> Vec3 {
        let [s, t, r] = self
            .cell_coordinates(p)
            .map(|cell| cell.map_or(0.0, |c| c - 0.5));
        Vec3::new(s, t, r)
    }

    /// Voxel enclosing world point `p`, using the default [`GridConfig`].
    ///
    /// # Errors
    /// [`GeomError::PointOutsideGrid`] when `p` lies beyond the boundary
    /// tolerance on any axis.
    pub fn enclosing_voxel(&self, p: &Vec3) -> Result<Voxel, GeomError> {
        self.enclosing_voxel_with(p, &GridConfig::default())
    }

    /// Voxel enclosing world point `p`.
    ///
    /// The position of `p` in voxel widths from the box corner is floored on
    /// each axis. A floored value of −1 resolves to 0, and one equal to the
    /// size resolves to `size − 1`, provided the point is within
    /// `config.boundary_tolerance` voxel widths of that face, widened by the
    /// `f32` rounding error at the point's magnitude. Anything further out
    /// fails.
    pub fn enclosing_voxel_with(&self, p: &Vec3, config: &GridConfig) -> Result<Voxel, GeomError> {
        let cells = self.cell_coordinates(p);
        let width = self.voxel_size().to_array();
        let mag = p.max_abs().max(self.bounds.base_point().max_abs());
        let mut out = [0_u32; 3];
        for axis in Axis::ALL {
            let n = axis.index();
            let size = self.size(axis);
            let tolerance = config.boundary_tolerance + rounding_slack(mag, width[n], size);
            // A flat axis has a single layer of cells.
            let cell = cells[n].unwrap_or(0.5);
            out[n] = resolve_cell(cell, size, tolerance)
                .ok_or(GeomError::PointOutsideGrid { point: *p })?;
        }
        Ok(Voxel::from(out))
    }

    /// [`OrientedBox::basis_transform`] composed with
    /// `diag(voxel_s, voxel_t, voxel_r, 1)`: the anisotropic world↔voxel
    /// transform.
    pub fn scaled_basis_transform(&self) -> Mat4 {
        let w = self.voxel_size();
        self.bounds
            .basis_transform()
            .multiply(&Mat4::scale(w.x(), w.y(), w.z()))
    }

    /// Like [`OrientedBox::basis_transform`] but anchored at
    /// [`VoxelGrid::origin`] (the first voxel center) instead of the box
    /// corner.
    pub fn grid_basis_transform(&self) -> Mat4 {
        OrientedBox::direction_frame(self.bounds.axes(), self.origin())
    }

    /// Index range of the voxels spanned by the world points `p1` and `p2`,
    /// using the default [`GridConfig`].
    pub fn sub_grid(&self, p1: &Vec3, p2: &Vec3) -> Result<SubGrid, GeomError> {
        self.sub_grid_with(p1, p2, &GridConfig::default())
    }

    /// Index range of the voxels spanned by the world points `p1` and `p2`.
    ///
    /// A point outside the bounds is clamped componentwise between the first
    /// and last voxel centers (a per-axis clamp, not a projection). Both
    /// points are then resolved with [`VoxelGrid::enclosing_voxel_with`]. The
    /// upper bound is exclusive and never exceeds the grid size.
    ///
    /// # Errors
    /// [`GeomError::PointOutsideGrid`] if neither point lies inside the
    /// grid, or if a clamped point still resolves to no voxel.
    pub fn sub_grid_with(
        &self,
        p1: &Vec3,
        p2: &Vec3,
        config: &GridConfig,
    ) -> Result<SubGrid, GeomError> {
        let in1 = self.bounds.contains_within(p1, config.epsilon);
        let in2 = self.bounds.contains_within(p2, config.epsilon);
        if !in1 && !in2 {
            debug!(?p1, ?p2, "sub-grid request lies entirely outside grid");
            return Err(GeomError::PointOutsideGrid { point: *p1 });
        }

        let first = self.min_voxel_midpoint();
        let last = self.max_voxel_midpoint();
        let lo = math::min_point(&first, &last);
        let hi = math::max_point(&first, &last);
        let clamp = |p: &Vec3, inside: bool| {
            if inside {
                *p
            } else {
                let q = math::min_point(&math::max_point(p, &lo), &hi);
                debug!(from = ?p, to = ?q, "clamped sub-grid corner into grid");
                q
            }
        };
        let q1 = clamp(p1, in1);
        let q2 = clamp(p2, in2);

        let c1 = self
            .enclosing_voxel_with(&q1, config)
            .inspect_err(|_| debug!(?q1, "no enclosing voxel for sub-grid corner"))?
            .to_array();
        let c2 = self
            .enclosing_voxel_with(&q2, config)
            .inspect_err(|_| debug!(?q2, "no enclosing voxel for sub-grid corner"))?
            .to_array();

        let sizes = [self.dims.s_size, self.dims.t_size, self.dims.r_size];
        let min = [0, 1, 2].map(|n| c1[n].min(c2[n]));
        let max = [0, 1, 2].map(|n| sizes[n].min(c1[n].max(c2[n]) + 1));
        Ok(SubGrid::new(min, max))
    }
}
