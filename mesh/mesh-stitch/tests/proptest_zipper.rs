//! Property-based tests for seam zippering and overlap removal.
//!
//! Run with: cargo test -p mesh-stitch -- proptest

use mesh_region::{AnatomicalGroup, GroupSubmesh};
use mesh_stitch::{Winding, remove_overlap, smooth_chain, zip_chains, zip_sorted};
use mesh_types::{Point2, Point3, Vertex};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Two disjoint chains: front indices `0..m`, back indices `100..100 + n`.
fn arb_chains() -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
    (1u32..40, 1u32..40).prop_map(|(m, n)| ((0..m).collect(), (100..100 + n).collect()))
}

fn arb_points(len: usize) -> impl Strategy<Value = Vec<Point3<f64>>> {
    prop::collection::vec(
        (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0).prop_map(|(x, y, z)| Point3::new(x, y, z)),
        len,
    )
}

/// A half whose vertices all lie on one side of `z = 0`.
fn arb_half(sign: f64) -> impl Strategy<Value = GroupSubmesh> {
    prop::collection::vec((-0.1f64..0.1, -0.1f64..0.1, 0.5f64..1.0), 1..30).prop_map(
        move |coords| {
            let mut sub = GroupSubmesh::new(AnatomicalGroup::UpperTorso, Point3::origin());
            for (i, (x, y, z)) in coords.into_iter().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                sub.push_vertex(i as u32, Vertex::new(Point3::new(x, y, sign * z), Point2::origin()));
            }
            sub
        },
    )
}

// =============================================================================
// Zipper
// =============================================================================

proptest! {
    #[test]
    fn proptest_zip_triangle_count((front, back) in arb_chains()) {
        let tris = zip_sorted(&front, &back, Winding::Clockwise);
        let total = front.len() + back.len();
        prop_assert_eq!(tris.len(), total.saturating_sub(3));
    }

    #[test]
    fn proptest_zip_triangles_span_both_chains((front, back) in arb_chains()) {
        for tri in zip_sorted(&front, &back, Winding::CounterClockwise) {
            let from_front = tri.iter().filter(|&&v| v < 100).count();
            prop_assert!(from_front == 1 || from_front == 2);
            prop_assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        }
    }

    #[test]
    fn proptest_zip_chains_count_independent_of_order(
        points in arb_points(60),
        m in 1usize..30,
        vertical in any::<bool>(),
        greater in any::<bool>(),
    ) {
        #[allow(clippy::cast_possible_truncation)]
        let front: Vec<u32> = (0..m as u32).rev().collect();
        #[allow(clippy::cast_possible_truncation)]
        let back: Vec<u32> = (30..60u32).collect();
        let tris = zip_chains(&points, &front, &back, vertical, greater);
        prop_assert_eq!(tris.len(), m + 30 - 3);
    }
}

// =============================================================================
// Smoothing and overlap
// =============================================================================

proptest! {
    #[test]
    fn proptest_smoothing_keeps_chain_ends(points in arb_points(12), iterations in 0usize..5) {
        let mut smoothed = points.clone();
        let chain: Vec<u32> = (0..12).collect();
        smooth_chain(&mut smoothed, &chain, true, iterations);

        let lowest = (0..12).min_by(|&a, &b| points[a].y.total_cmp(&points[b].y)).unwrap();
        let highest = (0..12).max_by(|&a, &b| points[a].y.total_cmp(&points[b].y)).unwrap();
        prop_assert_eq!(smoothed[lowest], points[lowest]);
        prop_assert_eq!(smoothed[highest], points[highest]);
    }

    #[test]
    fn proptest_overlap_removal_clean_halves(front in arb_half(-1.0), back in arb_half(1.0)) {
        let (mut front, mut back) = (front, back);
        prop_assert_eq!(remove_overlap(&mut front, &back).unwrap(), 0);
        prop_assert_eq!(remove_overlap(&mut back, &front).unwrap(), 0);
    }

    #[test]
    fn proptest_overlap_removal_is_idempotent(front in arb_half(-1.0), back in arb_half(1.0)) {
        let (mut front, mut back) = (front, back);
        // Push one vertex of the front half past the split plane
        front.mesh.vertices[0].position.z = 0.3;
        remove_overlap(&mut front, &back).unwrap();
        remove_overlap(&mut back, &front).unwrap();
        prop_assert_eq!(remove_overlap(&mut front, &back).unwrap(), 0);
        prop_assert!(front.is_consistent());
    }
}
