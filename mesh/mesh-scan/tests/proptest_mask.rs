//! Property-based tests for mask denoising and lattice reconstruction.
//!
//! Run with: cargo test -p mesh-scan -- proptest

use mesh_scan::denoise::{dilate, erode, keep_largest_region, label_regions};
use mesh_scan::lattice::{DepthLattice, DepthSample, reconstruct_lattice};
use mesh_scan::mask::{MaskValue, RasterMask};
use mesh_scan::{MaskDenoiseParams, denoise_mask, find_scanned_edges};
use mesh_types::{MeshTopology, Point2, Point3};
use proptest::prelude::*;
use std::collections::VecDeque;

// =============================================================================
// Strategies
// =============================================================================

/// Random binary mask up to 16x16.
fn arb_mask() -> impl Strategy<Value = RasterMask> {
    (1usize..=16, 1usize..=16).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<bool>(), w * h)
            .prop_map(move |flags| RasterMask::from_flags(w, h, &flags).unwrap())
    })
}

fn lattice_for(mask: &RasterMask) -> DepthLattice {
    let (w, h) = mask.dimensions();
    let samples = (0..w * h)
        .map(|i| {
            let (x, y) = ((i % w) as f64, (i / w) as f64);
            DepthSample::new(Point3::new(x, y, 1.0), Point2::new(x / w as f64, y / h as f64), true)
        })
        .collect();
    DepthLattice::new(w, h, samples).unwrap()
}

/// Flood-fills from the first unmasked cell and returns how many cells it reached.
fn reachable_from_first(mask: &RasterMask) -> usize {
    let (w, h) = mask.dimensions();
    let Some(start) = (0..w * h).find(|&i| mask.is_unmasked(i % w, i / w)) else {
        return 0;
    };
    let mut seen = vec![false; w * h];
    let mut queue = VecDeque::from([(start % w, start / w)]);
    seen[start] = true;
    let mut count = 0;
    while let Some((x, y)) = queue.pop_front() {
        count += 1;
        for (nx, ny) in mask.neighbours(x, y) {
            let i = mask.index(nx, ny);
            if !seen[i] && mask.is_unmasked(nx, ny) {
                seen[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    count
}

// =============================================================================
// Morphology
// =============================================================================

proptest! {
    #[test]
    fn proptest_erode_factor_zero_on_full_mask(w in 1usize..12, h in 1usize..12) {
        let mut mask = RasterMask::filled(w, h, MaskValue::Unmasked);
        erode(&mut mask, 0);
        prop_assert_eq!(mask.unmasked_count(), w * h);
    }

    #[test]
    fn proptest_dilate_on_empty_mask(w in 1usize..12, h in 1usize..12, factor in 0u32..=8) {
        let mut mask = RasterMask::filled(w, h, MaskValue::Masked);
        dilate(&mut mask, factor);
        prop_assert_eq!(mask.unmasked_count(), 0);
    }

    #[test]
    fn proptest_erode_never_grows(mask in arb_mask(), factor in 0u32..=8) {
        let before = mask.unmasked_count();
        let mut eroded = mask.clone();
        erode(&mut eroded, factor);
        prop_assert!(eroded.unmasked_count() <= before);
    }

    #[test]
    fn proptest_denoise_output_binary(mask in arb_mask()) {
        let mut m = mask;
        denoise_mask(&mut m, &MaskDenoiseParams::gentle());
        prop_assert!(m.is_binary());
    }
}

// =============================================================================
// Regions
// =============================================================================

proptest! {
    #[test]
    fn proptest_largest_region_is_connected(mask in arb_mask()) {
        let before = mask.unmasked_count();
        let mut m = mask;
        let kept = keep_largest_region(&mut m);

        prop_assert!(kept <= before);
        prop_assert_eq!(m.unmasked_count(), kept);
        prop_assert_eq!(reachable_from_first(&m), kept);
    }

    #[test]
    fn proptest_labels_cover_unmasked(mask in arb_mask()) {
        let regions = label_regions(&mask);
        for (cell, &label) in mask.cells().iter().zip(&regions.labels) {
            prop_assert_eq!(cell.is_unmasked(), label != 0);
        }
    }
}

// =============================================================================
// Reconstruction
// =============================================================================

proptest! {
    #[test]
    fn proptest_one_vertex_per_unmasked_cell(mask in arb_mask()) {
        let lattice = lattice_for(&mask);
        let scan = reconstruct_lattice(&lattice, &mask).unwrap();

        prop_assert_eq!(scan.mesh.vertex_count(), mask.unmasked_count());
        let n = scan.mesh.vertex_count() as u32;
        prop_assert!(scan.mesh.faces.iter().flatten().all(|&i| i < n));
        prop_assert!(scan.mesh.face_count() <= 2 * mask.width() * mask.height());
    }

    #[test]
    fn proptest_edges_subset_of_vertices(mask in arb_mask()) {
        let lattice = lattice_for(&mask);
        let scan = reconstruct_lattice(&lattice, &mask).unwrap();
        let edges = find_scanned_edges(&scan);

        prop_assert!(edges.len() <= scan.mesh.vertex_count());
        prop_assert!(edges.iter().all(|v| (v as usize) < scan.mesh.vertex_count()));
    }
}
