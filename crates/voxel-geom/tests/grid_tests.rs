// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used)]
use proptest::prelude::*;
use voxel_geom::{
    BoxGeometry, GeomError, GridConfig, GridDims, OrientedBox, SubGrid, Vec3, Voxel, VoxelGrid,
};

const TOL: f32 = 1e-4;

fn vec_close(a: Vec3, b: Vec3) -> bool {
    a.approx_eq(&b, TOL)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// 10×10×10 voxels over the axis-aligned cube `[0, 10]³`.
fn ten_grid() -> VoxelGrid {
    let bounds = OrientedBox::axis_aligned(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));
    VoxelGrid::with_sizes(10, 10, 10, bounds).expect("valid grid")
}

/// 2×2×2 voxels over a 2-unit cube rotated 90° about Z.
fn turned_grid() -> VoxelGrid {
    let bounds = OrientedBox::new(
        Vec3::ZERO,
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::new(-2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0),
    );
    VoxelGrid::with_sizes(2, 2, 2, bounds).expect("valid grid")
}

/// Quarter-turn about Z, based at `base`: S along +Y, T along −X.
fn turned_grid_at(base: Vec3, extent: Vec3, sizes: [u32; 3]) -> VoxelGrid {
    let bounds = OrientedBox::new(
        base,
        Vec3::new(0.0, extent.x(), 0.0),
        Vec3::new(-extent.y(), 0.0, 0.0),
        Vec3::new(0.0, 0.0, extent.z()),
    );
    let [s, t, r] = sizes;
    VoxelGrid::with_sizes(s, t, r, bounds).expect("valid grid")
}

#[test]
fn sizes_and_counts() {
    let g = VoxelGrid::new(
        GridDims::new(4, 3, 2).with_v_size(5),
        OrientedBox::default(),
    )
    .expect("valid grid");
    assert_eq!((g.s_size(), g.t_size(), g.r_size(), g.v_size()), (4, 3, 2, 5));
    assert_eq!(g.voxel_count(), 24);
    assert_eq!(g.element_count(), 120);
    assert_eq!(g.voxels().count(), 24);
}

#[test]
fn absolute_index_is_i_fastest() {
    let g = VoxelGrid::with_sizes(4, 3, 2, OrientedBox::default()).expect("valid grid");
    assert_eq!(g.absolute_index(Voxel::new(0, 0, 0)), Ok(0));
    assert_eq!(g.absolute_index(Voxel::new(1, 0, 0)), Ok(1));
    assert_eq!(g.absolute_index(Voxel::new(0, 1, 0)), Ok(4));
    assert_eq!(g.absolute_index(Voxel::new(0, 0, 1)), Ok(12));
    assert_eq!(g.absolute_index(Voxel::new(3, 2, 1)), Ok(23));
    let order: Vec<usize> = g
        .voxels()
        .map(|v| g.absolute_index(v).expect("in range"))
        .collect();
    assert_eq!(order, (0..24).collect::<Vec<_>>());
}

#[test]
fn first_voxel_midpoint_is_origin() {
    let g = ten_grid();
    assert_eq!(g.voxel_midpoint(Voxel::new(0, 0, 0)), Ok(g.origin()));
    assert!(vec_close(g.origin(), Vec3::new(0.5, 0.5, 0.5)));
    assert_eq!(g.min_voxel_midpoint(), g.origin());
    assert!(vec_close(g.max_voxel_midpoint(), Vec3::new(9.5, 9.5, 9.5)));
    assert!(matches!(
        g.voxel_midpoint(Voxel::new(10, 0, 0)),
        Err(GeomError::VoxelOutOfRange { .. })
    ));
}

#[test]
fn grid_exposes_bounding_box_geometry() {
    let g = ten_grid();
    assert!(vec_close(g.center(), Vec3::new(5.0, 5.0, 5.0)));
    assert_eq!(g.vertices(), g.bounds().vertices());
    assert!(g.contains(&Vec3::new(9.9, 0.1, 5.0)));
    assert!(!g.contains(&Vec3::new(11.0, 5.0, 5.0)));
}

#[test]
fn voxel_size_divides_extent_by_count() {
    let bounds = OrientedBox::axis_aligned(Vec3::ZERO, Vec3::new(8.0, 3.0, 1.0));
    let g = VoxelGrid::with_sizes(4, 6, 1, bounds).expect("valid grid");
    assert_eq!(g.geom_extents(), [8.0, 3.0, 1.0]);
    assert!(vec_close(g.voxel_size(), Vec3::new(2.0, 0.5, 1.0)));
    assert!(vec_close(g.origin(), Vec3::new(1.0, 0.25, 0.5)));
    assert!(vec_close(
        g.vertex(5).expect("in range"),
        Vec3::new(3.0, 0.75, 0.5)
    ));
}

#[test]
fn grid_coordinates_of_voxel_centers_are_integers() {
    let g = ten_grid();
    for v in [Voxel::new(0, 0, 0), Voxel::new(3, 7, 2), Voxel::new(9, 9, 9)] {
        let mid = g.voxel_midpoint(v).expect("in range");
        let c = g.grid_coordinate(&mid).to_array();
        for (got, want) in c.iter().zip(v.to_array()) {
            assert!((got - want as f32).abs() < TOL, "{c:?} vs {v}");
        }
    }
}

#[test]
fn enclosing_voxel_floors_and_snaps_outer_face() {
    init_tracing();
    let g = ten_grid();
    let p = |x: f32| Vec3::new(x, x, x);
    assert_eq!(g.enclosing_voxel(&p(0.05)), Ok(Voxel::new(0, 0, 0)));
    assert_eq!(g.enclosing_voxel(&p(0.0)), Ok(Voxel::new(0, 0, 0)));
    assert_eq!(g.enclosing_voxel(&p(9.95)), Ok(Voxel::new(9, 9, 9)));
    assert_eq!(g.enclosing_voxel(&p(10.0)), Ok(Voxel::new(9, 9, 9)));
    assert_eq!(
        g.enclosing_voxel(&p(10.5)),
        Err(GeomError::PointOutsideGrid { point: p(10.5) })
    );
    assert!(g.enclosing_voxel(&Vec3::new(5.0, -0.5, 5.0)).is_err());
}

#[test]
fn enclosing_voxel_honors_configured_tolerance() {
    let g = ten_grid();
    let loose = GridConfig {
        boundary_tolerance: 0.6,
        ..GridConfig::default()
    };
    let p = Vec3::new(10.5, 5.0, 5.0);
    assert!(g.enclosing_voxel(&p).is_err());
    assert_eq!(g.enclosing_voxel_with(&p, &loose), Ok(Voxel::new(9, 5, 5)));
}

#[test]
fn neighbor_counts_by_position() {
    let g = VoxelGrid::with_sizes(3, 3, 3, OrientedBox::default()).expect("valid grid");
    let count = |v: Voxel| {
        let idx = g.absolute_index(v).expect("in range");
        g.neighbors(idx).expect("in range").len()
    };
    assert_eq!(count(Voxel::new(0, 0, 0)), 3);
    assert_eq!(count(Voxel::new(1, 0, 0)), 4);
    assert_eq!(count(Voxel::new(1, 1, 0)), 5);
    assert_eq!(count(Voxel::new(1, 1, 1)), 6);
    assert_eq!(count(Voxel::new(2, 2, 2)), 3);
    assert_eq!(g.neighbors(0), Ok(vec![1, 3, 9]));
}

#[test]
fn neighbors_reject_out_of_range_index() {
    let g = VoxelGrid::with_sizes(2, 2, 2, OrientedBox::default()).expect("valid grid");
    assert_eq!(
        g.neighbors(8),
        Err(GeomError::IndexOutOfRange { index: 8, len: 8 })
    );
}

#[test]
fn sub_grid_of_bounds_corners_is_whole_grid() {
    let g = ten_grid();
    let sub = g
        .sub_grid(&g.min_point(), &g.max_point())
        .expect("corners lie in grid");
    assert_eq!(sub.to_array(), [0, 0, 0, 10, 10, 10]);
    assert_eq!(sub, g.full_sub_grid());
}

#[test]
fn sub_grid_orders_corners_and_is_exclusive() {
    let g = ten_grid();
    let sub = g
        .sub_grid(&Vec3::new(7.2, 3.5, 9.0), &Vec3::new(2.1, 4.9, 0.3))
        .expect("both inside");
    assert_eq!(sub, SubGrid::new([2, 3, 0], [8, 5, 10]));
    assert_eq!(sub.len(), 6 * 2 * 10);
    assert!(sub.contains(Voxel::new(7, 4, 9)));
    assert!(!sub.contains(Voxel::new(8, 4, 9)));
}

#[test]
fn sub_grid_clamps_a_point_outside() {
    init_tracing();
    let g = ten_grid();
    let sub = g
        .sub_grid(&Vec3::new(4.5, 4.5, 4.5), &Vec3::new(25.0, -3.0, 5.5))
        .expect("one corner inside");
    assert_eq!(sub, SubGrid::new([4, 0, 4], [10, 5, 6]));
}

#[test]
fn sub_grid_fails_when_both_points_outside() {
    let g = ten_grid();
    let p1 = Vec3::new(-1.0, -1.0, -1.0);
    let p2 = Vec3::new(20.0, 20.0, 20.0);
    assert_eq!(
        g.sub_grid(&p1, &p2),
        Err(GeomError::PointOutsideGrid { point: p1 })
    );
}

#[test]
fn rotated_grid_maps_world_points_through_box_frame() {
    let g = turned_grid();
    assert!(vec_close(g.origin(), Vec3::new(-0.5, 0.5, 0.5)));
    let mid = g.voxel_midpoint(Voxel::new(1, 0, 0)).expect("in range");
    assert!(vec_close(mid, Vec3::new(-0.5, 1.5, 0.5)));
    assert!(vec_close(g.grid_coordinate(&mid), Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(g.enclosing_voxel(&mid), Ok(Voxel::new(1, 0, 0)));
    assert_eq!(
        g.enclosing_voxel(&Vec3::new(-1.8, 0.2, 1.9)),
        Ok(Voxel::new(0, 1, 1))
    );
}

#[test]
fn grid_basis_transform_is_anchored_at_origin() {
    let g = turned_grid();
    let m = g.grid_basis_transform();
    assert!(vec_close(m.translation_part(), g.origin()));
    assert_eq!(m.row3(0), g.basis_transform().row3(0));
    assert_eq!(g.basis_transform().translation_part(), Vec3::ZERO);
}

#[test]
fn scaled_basis_transform_scales_each_axis_by_voxel_width() {
    let bounds = OrientedBox::axis_aligned(Vec3::ZERO, Vec3::new(8.0, 3.0, 1.0));
    let g = VoxelGrid::with_sizes(4, 6, 1, bounds).expect("valid grid");
    let m = g.scaled_basis_transform();
    let d = m.transform_direction(&Vec3::new(1.0, 1.0, 1.0));
    assert!(vec_close(d, Vec3::new(2.0, 0.5, 1.0)));
}

#[test]
fn with_dim_rescales_grid_bounds() {
    let g = ten_grid().with_s_dim(20.0);
    assert!((g.geom_extent_s() - 20.0).abs() < TOL);
    assert!(vec_close(g.voxel_size(), Vec3::new(2.0, 1.0, 1.0)));
    let moved = g.with_base_point(Vec3::new(1.0, 0.0, 0.0));
    assert!(vec_close(moved.origin(), Vec3::new(2.0, 0.5, 0.5)));
    assert_eq!(moved.dims(), g.dims());
}

#[test]
fn serde_round_trip_revalidates_dims() {
    let g = turned_grid();
    let json = serde_json::to_string(&g).expect("serialize");
    let back: VoxelGrid = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, g);

    let zero = json.replace("\"s_size\":2", "\"s_size\":0");
    assert!(serde_json::from_str::<VoxelGrid>(&zero).is_err());
}

#[test]
fn far_from_origin_corners_resolve_to_grid_extremes() {
    init_tracing();
    for b in [1000.0, 10000.0] {
        let base = Vec3::new(b, b, b);
        let bounds = OrientedBox::axis_aligned(base, Vec3::new(100.0, 100.0, 100.0));
        let g = VoxelGrid::with_sizes(100, 100, 100, bounds).expect("valid grid");
        assert_eq!(
            g.sub_grid(&g.min_point(), &g.max_point()),
            Ok(g.full_sub_grid()),
            "base {b}"
        );
        assert_eq!(g.enclosing_voxel(&base), Ok(Voxel::new(0, 0, 0)));
        assert_eq!(
            g.enclosing_voxel(&g.bounds().opposite_point()),
            Ok(Voxel::new(99, 99, 99))
        );
        let c = g.grid_coordinate(&g.bounds().opposite_point());
        assert!(c.approx_eq(&Vec3::new(99.5, 99.5, 99.5), 1e-3), "got {c:?}");
        let mid = g.voxel_midpoint(Voxel::new(42, 7, 99)).expect("in range");
        assert_eq!(g.enclosing_voxel(&mid), Ok(Voxel::new(42, 7, 99)));
    }
}

#[test]
fn far_from_origin_rotated_grid_spans_full_range() {
    for b in [1000.0, 10000.0] {
        let g = turned_grid_at(
            Vec3::new(b, b, b),
            Vec3::new(20.0, 20.0, 20.0),
            [20, 20, 20],
        );
        assert_eq!(g.sub_grid(&g.min_point(), &g.max_point()), Ok(g.full_sub_grid()));
        // The world-space min corner is the far end of T.
        assert_eq!(g.enclosing_voxel(&g.min_point()), Ok(Voxel::new(0, 19, 0)));
        assert_eq!(
            g.enclosing_voxel(&g.bounds().opposite_point()),
            Ok(Voxel::new(19, 19, 19))
        );
    }
}

#[test]
fn far_from_origin_grid_still_rejects_points_past_a_face() {
    let base = Vec3::new(10000.0, 10000.0, 10000.0);
    let bounds = OrientedBox::axis_aligned(base, Vec3::new(100.0, 100.0, 100.0));
    let g = VoxelGrid::with_sizes(100, 100, 100, bounds).expect("valid grid");
    let past = g.bounds().opposite_point().add(&Vec3::new(0.5, 0.0, 0.0));
    assert_eq!(
        g.enclosing_voxel(&past),
        Err(GeomError::PointOutsideGrid { point: past })
    );
}

proptest! {
    #[test]
    fn index_and_voxel_round_trip(
        s in 1u32..9, t in 1u32..9, r in 1u32..9, seed in any::<u32>(),
    ) {
        let g = VoxelGrid::with_sizes(s, t, r, OrientedBox::default()).expect("valid grid");
        let idx = seed as usize % g.voxel_count();
        let v = g.index_to_voxel(idx).expect("in range");
        prop_assert_eq!(g.absolute_index(v), Ok(idx));
        prop_assert!(v.i < s && v.j < t && v.k < r);
    }

    #[test]
    fn voxel_midpoints_resolve_to_their_voxel(
        s in 1u32..6, t in 1u32..6, r in 1u32..6,
        w in 0.5f32..20.0, h in 0.5f32..20.0, d in 0.5f32..20.0,
        seed in any::<u32>(),
    ) {
        let bounds = OrientedBox::axis_aligned(Vec3::new(-3.0, 1.0, 2.0), Vec3::new(w, h, d));
        let g = VoxelGrid::with_sizes(s, t, r, bounds).expect("valid grid");
        let idx = seed as usize % g.voxel_count();
        let v = g.index_to_voxel(idx).expect("in range");
        let mid = g.voxel_midpoint(v).expect("in range");
        prop_assert_eq!(g.enclosing_voxel(&mid), Ok(v));
        prop_assert!(g.contains(&mid));
    }

    #[test]
    fn translated_grid_corners_span_full_grid(
        x in -10000.0f32..10000.0, y in -10000.0f32..10000.0, z in -10000.0f32..10000.0,
        w in 0.5f32..50.0, h in 0.5f32..50.0, d in 0.5f32..50.0,
        s in 1u32..64, t in 1u32..64, r in 1u32..64,
    ) {
        let bounds = OrientedBox::axis_aligned(Vec3::new(x, y, z), Vec3::new(w, h, d));
        let g = VoxelGrid::with_sizes(s, t, r, bounds).expect("valid grid");
        let span = g.sub_grid(&g.min_point(), &g.max_point());
        prop_assert_eq!(span, Ok(g.full_sub_grid()));
        let opposite = g.bounds().opposite_point();
        prop_assert_eq!(g.enclosing_voxel(&opposite), Ok(Voxel::new(s - 1, t - 1, r - 1)));
    }

    #[test]
    fn rotated_grid_corners_span_full_grid(
        x in -10000.0f32..10000.0, y in -10000.0f32..10000.0, z in -10000.0f32..10000.0,
        w in 0.5f32..50.0, h in 0.5f32..50.0, d in 0.5f32..50.0,
        s in 1u32..64, t in 1u32..64, r in 1u32..64,
    ) {
        let g = turned_grid_at(Vec3::new(x, y, z), Vec3::new(w, h, d), [s, t, r]);
        let span = g.sub_grid(&g.min_point(), &g.max_point());
        prop_assert_eq!(span, Ok(g.full_sub_grid()));
        let opposite = g.bounds().opposite_point();
        prop_assert_eq!(g.enclosing_voxel(&opposite), Ok(Voxel::new(s - 1, t - 1, r - 1)));
    }
}
