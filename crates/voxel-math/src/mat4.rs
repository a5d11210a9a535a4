// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::Vec3;

/// Column‑major 4×4 matrix for affine transforms.
///
/// - Stored in column‑major order; `at(row, col)` reads `data[col * 4 + row]`.
/// - Represents affine frames: the upper-left 3×3 block rotates or scales
///   directions (`w = 0`); the last column carries the frame anchor.
///
/// # Examples
/// ```
/// use voxel_math::{Mat4, Vec3};
/// let m = Mat4::scale(2.0, 3.0, 4.0);
/// let d = Vec3::new(1.0, 1.0, -1.0);
/// assert_eq!(m.transform_direction(&d).to_array(), [2.0, 3.0, -4.0]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Mat4 {
    data: [f32; 16],
}

impl Mat4 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Builds a non-uniform scale matrix.
    pub const fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            data: [
                sx, 0.0, 0.0, 0.0, // col 0
                0.0, sy, 0.0, 0.0, // col 1
                0.0, 0.0, sz, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Builds an affine matrix whose upper-left 3×3 rows are `rows` and whose
    /// translation column is `translation`.
    ///
    /// The bottom row is `[0, 0, 0, 1]`. Row `n` of the result maps a
    /// direction `v` to `rows[n] · v`.
    pub fn from_rows(rows: [Vec3; 3], translation: Vec3) -> Self {
        let [r0, r1, r2] = rows;
        Self::new([
            r0.x(),
            r1.x(),
            r2.x(),
            0.0, // col 0
            r0.y(),
            r1.y(),
            r2.y(),
            0.0, // col 1
            r0.z(),
            r1.z(),
            r2.z(),
            0.0, // col 2
            translation.x(),
            translation.y(),
            translation.z(),
            1.0, // col 3
        ])
    }

    /// Creates a matrix from column-major array data.
    ///
    /// Callers must supply 16 finite values already laid out column-major.
    pub const fn new(data: [f32; 16]) -> Self {
        Self { data }
    }

    /// Returns the matrix as a column‑major array.
    pub fn to_array(self) -> [f32; 16] {
        self.data
    }

    /// Reads the element at `row`, `col` (both `0..4`).
    ///
    /// # Panics
    /// Panics if either index is ≥ 4.
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[col * 4 + row]
    }

    /// Returns the first three entries of row `row` as a vector.
    ///
    /// # Panics
    /// Panics if `row` ≥ 4.
    pub fn row3(&self, row: usize) -> Vec3 {
        Vec3::new(self.at(row, 0), self.at(row, 1), self.at(row, 2))
    }

    /// Returns the translation column (`m03, m13, m23`).
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.at(0, 3), self.at(1, 3), self.at(2, 3))
    }

    /// Multiplies the matrix with another matrix (`self * rhs`).
    ///
    /// # Examples
    /// ```
    /// use voxel_math::Mat4;
    /// let a = Mat4::identity();
    /// let b = Mat4::scale(2.0, 3.0, 4.0);
    /// assert_eq!(a.multiply(&b).to_array(), b.to_array());
    /// ```
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out[col * 4 + row] = sum;
            }
        }
        Self::new(out)
    }

    /// Transforms a direction vector (ignores translation, `w = 0`).
    ///
    /// Only the upper-left 3×3 block affects the result.
    pub fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        let x = direction.component(0);
        let y = direction.component(1);
        let z = direction.component(2);

        let nx = self.at(0, 0) * x + self.at(0, 1) * y + self.at(0, 2) * z;
        let ny = self.at(1, 0) * x + self.at(1, 1) * y + self.at(1, 2) * z;
        let nz = self.at(2, 0) * x + self.at(2, 1) * y + self.at(2, 2) * z;

        Vec3::new(nx, ny, nz)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f32; 16]> for Mat4 {
    fn from(value: [f32; 16]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}
