// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::EPSILON;

/// Float32 3D vector used for both points and directions.
///
/// * Components are world-space units and may represent either points or
///   directions depending on the calling context.
/// * [`crate::Mat4::transform_direction`] treats the vector as a direction
///   (homogeneous `w = 0`); subtract an anchor first to map a point.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Vec3 {
    data: [f32; 3],
}

impl Vec3 {
    /// The zero vector (also the world origin).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit vector pointing along the positive Z axis.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { data: [x, y, z] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f32; 3] {
        self.data
    }

    /// X component.
    pub fn x(&self) -> f32 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f32 {
        self.data[1]
    }

    /// Z component.
    pub fn z(&self) -> f32 {
        self.data[2]
    }

    pub(crate) fn component(&self, idx: usize) -> f32 {
        self.data[idx]
    }

    /// Adds two vectors.
    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.component(0) + other.component(0),
            self.component(1) + other.component(1),
            self.component(2) + other.component(2),
        )
    }

    /// Subtracts another vector.
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.component(0) - other.component(0),
            self.component(1) - other.component(1),
            self.component(2) - other.component(2),
        )
    }

    /// Scales the vector by a scalar.
    pub fn scale(&self, scalar: f32) -> Self {
        Self::new(
            self.component(0) * scalar,
            self.component(1) * scalar,
            self.component(2) * scalar,
        )
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f32 {
        self.component(0) * other.component(0)
            + self.component(1) * other.component(1)
            + self.component(2) * other.component(2)
    }

    /// Cross product with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        let ax = self.component(0);
        let ay = self.component(1);
        let az = self.component(2);
        let bx = other.component(0);
        let by = other.component(1);
        let bz = other.component(2);
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Vector length (magnitude).
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalises the vector, returning the zero vector if length ≤ `EPSILON`.
    ///
    /// Vectors with length ≤ `EPSILON` are degenerate and normalise to zero so
    /// downstream callers can detect them with [`Vec3::is_zero`].
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len <= EPSILON {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// Returns the vector with the same direction and length `len`.
    ///
    /// A degenerate vector stays zero.
    pub fn with_length(&self, len: f32) -> Self {
        self.normalize().scale(len)
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0.0, |m, c| m.max(c.abs()))
    }

    /// Returns `true` when every component is within `EPSILON` of zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|c| c.abs() < EPSILON)
    }

    /// Angle in radians between `self` and `other`, in `[0, π]`.
    ///
    /// Returns `None` when either vector is degenerate, since no direction
    /// exists to measure against.
    pub fn angle(&self, other: &Self) -> Option<f32> {
        let denom = self.length() * other.length();
        if denom <= EPSILON {
            return None;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        Some(cos.acos())
    }

    /// Componentwise minimum.
    pub fn min(&self, other: &Self) -> Self {
        Self::new(
            self.component(0).min(other.component(0)),
            self.component(1).min(other.component(1)),
            self.component(2).min(other.component(2)),
        )
    }

    /// Componentwise maximum.
    pub fn max(&self, other: &Self) -> Self {
        Self::new(
            self.component(0).max(other.component(0)),
            self.component(1).max(other.component(1)),
            self.component(2).max(other.component(2)),
        )
    }

    /// Returns `true` when each component differs from `other` by less than
    /// `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() < tolerance)
    }
}

/// Converts a 3-element `[f32; 3]` array into a `Vec3` interpreted as `(x, y, z)`.
///
/// # Examples
/// ```
/// use voxel_math::Vec3;
/// let v = Vec3::from([1.0, 2.0, 3.0]);
/// assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
/// ```
impl From<[f32; 3]> for Vec3 {
    fn from(value: [f32; 3]) -> Self {
        Self { data: value }
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(value: Vec3) -> Self {
        value.data
    }
}

impl core::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Vec3::add(&self, &rhs)
    }
}

impl core::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::sub(&self, &rhs)
    }
}

impl core::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    #[test]
    fn angle_of_degenerate_vector_is_none() {
        assert!(Vec3::ZERO.angle(&Vec3::UNIT_X).is_none());
        assert!(Vec3::UNIT_X.angle(&Vec3::ZERO).is_none());
    }

    #[test]
    fn angle_between_perpendicular_axes_is_right() {
        let a = Vec3::UNIT_X.angle(&Vec3::new(0.0, 5.0, 0.0));
        assert!(a.is_some_and(|a| (a - FRAC_PI_2).abs() < 1e-6));
    }

    #[test]
    fn max_abs_picks_largest_magnitude() {
        assert_eq!(Vec3::new(3.0, -7.5, 2.0).max_abs(), 7.5);
        assert_eq!(Vec3::ZERO.max_abs(), 0.0);
    }

    #[test]
    fn with_length_keeps_direction() {
        let v = Vec3::new(3.0, 0.0, 4.0).with_length(10.0);
        assert!(v.approx_eq(&Vec3::new(6.0, 0.0, 8.0), 1e-5));
    }

    #[test]
    fn operators_match_methods() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 0.5, 2.0);
        assert_eq!(a + b, a.add(&b));
        assert_eq!(a - b, a.sub(&b));
        assert_eq!(a * 2.0, a.scale(2.0));
    }
}
