// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Oriented boxes: a base point plus three edge vectors.

use core::cmp::Ordering;
use core::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use tracing::debug;
use voxel_math::{self as math, Mat4, Vec3, EPSILON};

use crate::error::GeomError;
use crate::types::{Axis, Side};

/// Ulps of `f32` rounding tolerated on world-space differences.
pub(crate) const ROUNDING_ULPS: f32 = 4.0;

/// Pairwise tolerance on unit-axis dot products for [`OrientedBox::is_orthogonal`].
const ORTHOGONALITY_TOLERANCE: f32 = 1e-5;

/// Rectangular volume defined by a base point and three edge vectors.
///
/// Invariants:
/// - Each axis vector's length is the box's extent along that edge.
/// - Axes are expected, but not required, to be mutually orthogonal; the
///   basis transforms and containment tests assume it. Use
///   [`OrientedBox::is_orthogonal`] to check.
///
/// Boxes are immutable values; the `with_*` methods return modified copies.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    base_point: Vec3,
    s_axis: Vec3,
    t_axis: Vec3,
    r_axis: Vec3,
}

impl Default for OrientedBox {
    /// Unit cube at the world origin with axes along X, Y, Z.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::UNIT_X, Vec3::UNIT_Y, Vec3::UNIT_Z)
    }
}

impl OrientedBox {
    /// Creates a box from its base point and three edge vectors.
    pub const fn new(base_point: Vec3, s_axis: Vec3, t_axis: Vec3, r_axis: Vec3) -> Self {
        Self {
            base_point,
            s_axis,
            t_axis,
            r_axis,
        }
    }

    /// World-aligned box with corner `min` and extents `size` along X, Y, Z.
    pub fn axis_aligned(min: Vec3, size: Vec3) -> Self {
        Self::new(
            min,
            Vec3::new(size.x(), 0.0, 0.0),
            Vec3::new(0.0, size.y(), 0.0),
            Vec3::new(0.0, 0.0, size.z()),
        )
    }

    /// Base corner of the box.
    pub fn base_point(&self) -> Vec3 {
        self.base_point
    }

    /// S edge vector (analogous to X).
    pub fn s_axis(&self) -> Vec3 {
        self.s_axis
    }

    /// T edge vector (analogous to Y).
    pub fn t_axis(&self) -> Vec3 {
        self.t_axis
    }

    /// R edge vector (analogous to Z).
    pub fn r_axis(&self) -> Vec3 {
        self.r_axis
    }

    /// Edge vector for `axis`.
    pub fn axis(&self, axis: Axis) -> Vec3 {
        match axis {
            Axis::S => self.s_axis,
            Axis::T => self.t_axis,
            Axis::R => self.r_axis,
        }
    }

    /// The three edge vectors in S, T, R order.
    pub fn axes(&self) -> [Vec3; 3] {
        [self.s_axis, self.t_axis, self.r_axis]
    }

    /// Geometric extent along `axis` (the edge vector's length).
    pub fn dim(&self, axis: Axis) -> f32 {
        self.axis(axis).length()
    }

    /// Extent along S.
    pub fn s_dim(&self) -> f32 {
        self.s_axis.length()
    }

    /// Extent along T.
    pub fn t_dim(&self) -> f32 {
        self.t_axis.length()
    }

    /// Extent along R.
    pub fn r_dim(&self) -> f32 {
        self.r_axis.length()
    }

    /// Returns a copy with the base point replaced.
    pub fn with_base_point(self, base_point: Vec3) -> Self {
        Self { base_point, ..self }
    }

    /// Returns a copy with the S edge vector replaced.
    pub fn with_s_axis(self, s_axis: Vec3) -> Self {
        Self { s_axis, ..self }
    }

    /// Returns a copy with the T edge vector replaced.
    pub fn with_t_axis(self, t_axis: Vec3) -> Self {
        Self { t_axis, ..self }
    }

    /// Returns a copy with the R edge vector replaced.
    pub fn with_r_axis(self, r_axis: Vec3) -> Self {
        Self { r_axis, ..self }
    }

    /// Returns a copy with the edge vector for `axis` replaced.
    pub fn with_axis(self, axis: Axis, vector: Vec3) -> Self {
        match axis {
            Axis::S => self.with_s_axis(vector),
            Axis::T => self.with_t_axis(vector),
            Axis::R => self.with_r_axis(vector),
        }
    }

    /// Returns a copy whose `axis` keeps its direction but has length `dim`.
    ///
    /// A zero-length axis stays zero.
    pub fn with_dim(self, axis: Axis, dim: f32) -> Self {
        let scaled = self.axis(axis).with_length(dim);
        self.with_axis(axis, scaled)
    }

    /// Rescales the S axis to length `dim`.
    pub fn with_s_dim(self, dim: f32) -> Self {
        self.with_dim(Axis::S, dim)
    }

    /// Rescales the T axis to length `dim`.
    pub fn with_t_dim(self, dim: f32) -> Self {
        self.with_dim(Axis::T, dim)
    }

    /// Rescales the R axis to length `dim`.
    pub fn with_r_dim(self, dim: f32) -> Self {
        self.with_dim(Axis::R, dim)
    }

    /// The 8 corners in fixed order: base; base+s; base+t; base+r; base+r+s;
    /// base+r+t; base+s+t; base+r+s+t.
    pub fn vertices(&self) -> [Vec3; 8] {
        let b = self.base_point;
        let (s, t, r) = (self.s_axis, self.t_axis, self.r_axis);
        [
            b,
            b.add(&s),
            b.add(&t),
            b.add(&r),
            b.add(&r).add(&s),
            b.add(&r).add(&t),
            b.add(&s).add(&t),
            b.add(&r).add(&s).add(&t),
        ]
    }

    /// Corner `index` (0..8) in [`OrientedBox::vertices`] order.
    pub fn vertex(&self, index: usize) -> Result<Vec3, GeomError> {
        self.vertices()
            .get(index)
            .copied()
            .ok_or(GeomError::IndexOutOfRange { index, len: 8 })
    }

    /// The corners flattened as `[x0, y0, z0, x1, ...]`.
    pub fn coords(&self) -> [f32; 24] {
        let mut out = [0.0; 24];
        for (chunk, v) in out.chunks_exact_mut(3).zip(self.vertices()) {
            chunk.copy_from_slice(&v.to_array());
        }
        out
    }

    /// Rebuilds a box from flattened corner coordinates.
    ///
    /// Only corners 0–3 (base, base+s, base+t, base+r) are read; the rest are
    /// redundant and assumed consistent.
    pub fn from_coords(coords: &[f32; 24]) -> Self {
        let corner = |n: usize| Vec3::new(coords[n * 3], coords[n * 3 + 1], coords[n * 3 + 2]);
        Self::from_corners(corner(0), corner(1), corner(2), corner(3))
    }

    /// Rebuilds a box from its 8 corners in [`OrientedBox::vertices`] order.
    ///
    /// Only the first four corners are read.
    pub fn from_vertices(vertices: &[Vec3]) -> Result<Self, GeomError> {
        match vertices {
            [base, s, t, r, _, _, _, _] => Ok(Self::from_corners(*base, *s, *t, *r)),
            _ => Err(GeomError::InvalidVertexCount {
                expected: 8,
                got: vertices.len(),
            }),
        }
    }

    fn from_corners(base: Vec3, s_corner: Vec3, t_corner: Vec3, r_corner: Vec3) -> Self {
        Self::new(
            base,
            s_corner.sub(&base),
            t_corner.sub(&base),
            r_corner.sub(&base),
        )
    }

    /// The 12 edges as corner pairs: four along S, then four along T, then
    /// four along R.
    pub fn edges(&self) -> [[Vec3; 2]; 12] {
        const PAIRS: [(usize, usize); 12] = [
            (0, 1),
            (2, 6),
            (3, 4),
            (5, 7),
            (0, 2),
            (1, 6),
            (3, 5),
            (4, 7),
            (0, 3),
            (1, 4),
            (2, 5),
            (6, 7),
        ];
        let v = self.vertices();
        PAIRS.map(|(a, b)| [v[a], v[b]])
    }

    /// Geometric center: `base + (s + t + r) / 2`.
    pub fn center(&self) -> Vec3 {
        let half = self.r_axis.add(&self.s_axis).add(&self.t_axis).scale(0.5);
        self.base_point.add(&half)
    }

    /// Corner diagonally opposite the base point.
    pub fn opposite_point(&self) -> Vec3 {
        self.base_point
            .add(&self.s_axis)
            .add(&self.t_axis)
            .add(&self.r_axis)
    }

    /// Componentwise minimum of the base and opposite corners.
    pub fn min_point(&self) -> Vec3 {
        math::min_point(&self.opposite_point(), &self.base_point)
    }

    /// Componentwise maximum of the base and opposite corners.
    pub fn max_point(&self) -> Vec3 {
        math::max_point(&self.opposite_point(), &self.base_point)
    }

    /// Matrix mapping world directions into the box's local direction frame.
    ///
    /// Rotation rows are the direction cosines of S, T, R against world
    /// X, Y, Z (unit vectors, not scaled by extent); the translation column
    /// is the base point. A zero axis yields a zero row. Only valid as a
    /// change of basis when the axes are orthogonal.
    pub fn basis_transform(&self) -> Mat4 {
        Self::direction_frame(self.axes(), self.base_point)
    }

    pub(crate) fn direction_frame(axes: [Vec3; 3], anchor: Vec3) -> Mat4 {
        Mat4::from_rows(axes.map(|a| a.normalize()), anchor)
    }

    /// Inverse of [`OrientedBox::basis_transform`]: rotation rows become axis
    /// directions rescaled to the given extents and the translation column
    /// becomes the base point.
    pub fn from_basis_transform(transform: &Mat4, s_dim: f32, t_dim: f32, r_dim: f32) -> Self {
        Self::new(
            transform.translation_part(),
            transform.row3(0).with_length(s_dim),
            transform.row3(1).with_length(t_dim),
            transform.row3(2).with_length(r_dim),
        )
    }

    /// The four corners of the face normal to `axis` on side `which`.
    ///
    /// Points run start, start+a1, start+a1+a2, start+a2, where `(a1, a2)`
    /// is `(r, t)` for S, `(s, r)` for T, and `(s, t)` for R.
    pub fn side(&self, which: Side, axis: Axis) -> [Vec3; 4] {
        let (s, t, r) = (self.s_axis, self.t_axis, self.r_axis);
        let (normal, a1, a2) = match axis {
            Axis::S => (s, r, t),
            Axis::T => (t, s, r),
            Axis::R => (r, s, t),
        };
        let start = match which {
            Side::Base => self.base_point,
            Side::Opposite => self.base_point.add(&normal),
        };
        [
            start,
            start.add(&a1),
            start.add(&a1).add(&a2),
            start.add(&a2),
        ]
    }

    /// Approximate containment test using [`EPSILON`] as tolerance.
    ///
    /// See [`OrientedBox::contains_within`].
    pub fn contains(&self, p: &Vec3) -> bool {
        self.contains_within(p, EPSILON)
    }

    /// Approximate containment test.
    ///
    /// `p` is inside when it coincides with the base point, or when the angle
    /// between `p - base` and every axis is at most 90° and the projected
    /// length along every axis is at most that axis's length. Zero-length
    /// axes impose no constraint. For oblique axes this is a heuristic; see
    /// [`OrientedBox::contains_exact`].
    pub fn contains_within(&self, p: &Vec3, tolerance: f32) -> bool {
        let v = p.sub(&self.base_point);
        if v.approx_eq(&Vec3::ZERO, tolerance) {
            return true;
        }
        // Error from subtracting the base point grows with the coordinates.
        let slack = ROUNDING_ULPS * f32::EPSILON * p.max_abs().max(self.base_point.max_abs());
        self.axes().iter().all(|axis| {
            let Some(angle) = v.angle(axis) else {
                return true;
            };
            if math::compare_float(angle, FRAC_PI_2, tolerance) == Ordering::Greater {
                return false;
            }
            let len = axis.length();
            let projected = v.dot(axis) / len;
            math::compare_float(projected, len, tolerance * len.max(1.0) + slack)
                != Ordering::Greater
        })
    }

    /// Affine coordinates `(a, b, c)` of `p` such that
    /// `p = base + a·s + b·t + c·r`, or `None` when the box has no volume.
    pub fn fractional_coordinates(&self, p: &Vec3) -> Option<Vec3> {
        let (s, t, r) = (self.s_axis, self.t_axis, self.r_axis);
        let t_x_r = t.cross(&r);
        let det = s.dot(&t_x_r);
        let scale = s.length() * t.length() * r.length();
        if scale <= EPSILON || det.abs() <= EPSILON * scale {
            return None;
        }
        let v = p.sub(&self.base_point);
        Some(Vec3::new(
            v.dot(&t_x_r) / det,
            v.dot(&r.cross(&s)) / det,
            v.dot(&s.cross(&t)) / det,
        ))
    }

    /// Exact containment for oblique boxes: every affine coordinate of `p`
    /// lies in `[0, 1]` within [`EPSILON`].
    ///
    /// Falls back to [`OrientedBox::contains`] for boxes without volume.
    pub fn contains_exact(&self, p: &Vec3) -> bool {
        match self.fractional_coordinates(p) {
            Some(f) => f
                .to_array()
                .iter()
                .all(|c| (-EPSILON..=1.0 + EPSILON).contains(c)),
            None => self.contains(p),
        }
    }

    /// Returns the three axes with a single zero-length axis rebuilt.
    ///
    /// When exactly one axis is zero it is replaced by the unit cross product
    /// of the other two, right-handed (`s = t×r`, `t = r×s`, `r = s×t`); the
    /// supplied axes are returned unchanged. This lets flat boxes (e.g. an
    /// image plane) still yield a full triad.
    ///
    /// # Errors
    /// [`GeomError::DegenerateAxes`] when two or more axes are zero, or when
    /// the remaining axes are parallel.
    pub fn nonzero_axes(&self) -> Result<[Vec3; 3], GeomError> {
        let [s, t, r] = self.axes();
        let zero = [s.is_zero(), t.is_zero(), r.is_zero()];
        let zero_axes = zero.iter().filter(|z| **z).count();
        let (missing, rebuilt) = match zero {
            [false, false, false] => return Ok([s, t, r]),
            [true, false, false] => (Axis::S, t.cross(&r).normalize()),
            [false, true, false] => (Axis::T, r.cross(&s).normalize()),
            [false, false, true] => (Axis::R, s.cross(&t).normalize()),
            _ => return Err(GeomError::DegenerateAxes { zero_axes }),
        };
        if rebuilt.is_zero() {
            debug!(?missing, "remaining box axes are parallel; cannot rebuild");
            return Err(GeomError::DegenerateAxes { zero_axes });
        }
        debug!(?missing, "rebuilt zero-length box axis from cross product");
        let mut axes = [s, t, r];
        axes[missing.index()] = rebuilt;
        Ok(axes)
    }

    /// Returns a copy carrying the axes from [`OrientedBox::nonzero_axes`].
    pub fn with_nonzero_axes(self) -> Result<Self, GeomError> {
        let [s_axis, t_axis, r_axis] = self.nonzero_axes()?;
        Ok(Self {
            s_axis,
            t_axis,
            r_axis,
            ..self
        })
    }

    /// Returns `true` when the nonzero axes are pairwise orthogonal.
    pub fn is_orthogonal(&self) -> bool {
        let [s, t, r] = self.axes().map(|a| a.normalize());
        [s.dot(&t), t.dot(&r), r.dot(&s)]
            .iter()
            .all(|d| d.abs() <= ORTHOGONALITY_TOLERANCE)
    }
}

/// Smallest world-aligned box enclosing `points`.
///
/// # Errors
/// [`GeomError::EmptyPointSet`] if `points` is empty.
pub fn bounding_box(points: &[Vec3]) -> Result<OrientedBox, GeomError> {
    let (lo, hi) = math::bounding_points(points).ok_or(GeomError::EmptyPointSet)?;
    Ok(OrientedBox::axis_aligned(lo, hi.sub(&lo)))
}
