//! Seam smoothing.

use mesh_types::Point3;

use crate::chains::sort_along;

/// Pulls the interior vertices of a boundary chain toward their neighbours.
///
/// The chain is sorted along the seam, then for `iterations` passes every
/// vertex except the two ends moves to the midpoint of its sorted
/// neighbours. Updates happen in place, so later vertices in a pass see the
/// already moved earlier ones.
pub fn smooth_chain(
    positions: &mut [Point3<f64>],
    chain: &[u32],
    vertical: bool,
    iterations: usize,
) {
    let mut sorted: Vec<u32> = chain
        .iter()
        .copied()
        .filter(|&v| (v as usize) < positions.len())
        .collect();
    if sorted.len() < 3 {
        return;
    }
    sort_along(&mut sorted, positions, vertical);

    for _ in 0..iterations {
        for w in sorted.windows(3) {
            let (prev, mid, next) = (w[0] as usize, w[1] as usize, w[2] as usize);
            positions[mid] = nalgebra::center(&positions[prev], &positions[next]);
        }
    }
}

/// Smooths the front and back chains of one seam side.
pub fn smooth_seam(
    positions: &mut [Point3<f64>],
    front: &[u32],
    back: &[u32],
    vertical: bool,
    iterations: usize,
) {
    smooth_chain(positions, front, vertical, iterations);
    smooth_chain(positions, back, vertical, iterations);
}
