// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![doc = r"Float32 math primitives for oriented-box and voxel-grid geometry.

This crate provides:
- A 3-component vector (`Vec3`) used for both points and directions.
- A column-major 4×4 affine matrix (`Mat4`).
- Stateless scalar and point helpers (tolerant comparison, componentwise
  min/max, bounding extremes).

Design notes:
- All arithmetic is `f32`; no fused multiply-add.
- Helpers are free functions with no shared global state.
"]

use core::cmp::Ordering;

mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;

/// Global epsilon used by math routines when detecting degenerate values.
pub const EPSILON: f32 = 1e-6;

/// Three-way comparison of `a` and `b` that treats values closer than
/// `tolerance` as equal.
pub fn compare_float(a: f32, b: f32, tolerance: f32) -> Ordering {
    if (a - b).abs() < tolerance {
        Ordering::Equal
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// Returns `true` when `a` and `b` differ by less than [`EPSILON`].
pub fn approx_eq(a: f32, b: f32) -> bool {
    compare_float(a, b, EPSILON) == Ordering::Equal
}

/// Componentwise minimum of two points.
pub fn min_point(a: &Vec3, b: &Vec3) -> Vec3 {
    a.min(b)
}

/// Componentwise maximum of two points.
pub fn max_point(a: &Vec3, b: &Vec3) -> Vec3 {
    a.max(b)
}

/// Returns the `(min, max)` extremes of `points`, or `None` if the slice is
/// empty.
pub fn bounding_points(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let (first, rest) = points.split_first()?;
    let bounds = rest
        .iter()
        .fold((*first, *first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some(bounds)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use super::*;

    #[test]
    fn compare_float_respects_tolerance() {
        assert_eq!(compare_float(1.0, 1.0 + 1e-7, EPSILON), Ordering::Equal);
        assert_eq!(compare_float(1.0, 1.1, EPSILON), Ordering::Less);
        assert_eq!(compare_float(1.1, 1.0, EPSILON), Ordering::Greater);
        assert_eq!(compare_float(1.0, 1.05, 0.1), Ordering::Equal);
    }

    #[test]
    fn bounding_points_empty_is_none() {
        assert!(bounding_points(&[]).is_none());
    }

    #[test]
    fn bounding_points_spans_all_inputs() {
        let pts = [
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.5),
            Vec3::new(0.0, 0.0, 7.0),
        ];
        let (lo, hi) = bounding_points(&pts).expect("non-empty input");
        assert_eq!(lo.to_array(), [-1.0, -2.0, 0.5]);
        assert_eq!(hi.to_array(), [1.0, 4.0, 7.0]);
    }
}
