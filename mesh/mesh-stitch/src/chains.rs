//! Splitting a half's scan boundary into the two seam sides.
//!
//! The boundary vertices of one half are binned into quadrants around their
//! mean. For a vertical group (a torso or leg) the seams run down the left
//! and right sides; for a horizontal group (an arm) they run along the top
//! and bottom.

use std::cmp::Ordering;

use mesh_types::Point3;

/// Boundary vertices of one half, split into the two seam sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeamSides {
    /// Left side (vertical groups) or bottom side (horizontal groups).
    pub a: Vec<u32>,
    /// The opposite side.
    pub b: Vec<u32>,
}

impl SeamSides {
    /// Splits `edges` of one half into seam sides.
    #[must_use]
    pub fn from_edges(positions: &[Point3<f64>], edges: &[u32], vertical: bool) -> Self {
        let [q0, q1, q2, q3] = quarter_edges(positions, edges);
        let (a_extra, b_extra) = if vertical { (q2, q1) } else { (q1, q2) };
        Self {
            a: q0.into_iter().chain(a_extra).collect(),
            b: q3.into_iter().chain(b_extra).collect(),
        }
    }

    /// Shifts every index by `by`, for a half appended after another.
    #[must_use]
    pub fn offset(mut self, by: u32) -> Self {
        for v in self.a.iter_mut().chain(self.b.iter_mut()) {
            *v += by;
        }
        self
    }

    /// True if both sides are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }
}

/// Bins boundary vertices into quadrants around their mean position.
///
/// Quadrant index is `+1` if the vertex lies right of the mean and `+2` if
/// it lies above. Indices missing from `positions` are skipped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quarter_edges(positions: &[Point3<f64>], edges: &[u32]) -> [Vec<u32>; 4] {
    let present: Vec<(u32, &Point3<f64>)> = edges
        .iter()
        .filter_map(|&v| positions.get(v as usize).map(|p| (v, p)))
        .collect();
    let mut quarters: [Vec<u32>; 4] = Default::default();
    if present.is_empty() {
        return quarters;
    }

    let sum = present
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, (_, p)| acc + p.coords);
    let mean = sum / present.len() as f64;

    for (v, p) in present {
        let mut quadrant = 0;
        if p.x > mean.x {
            quadrant += 1;
        }
        if p.y > mean.y {
            quadrant += 2;
        }
        quarters[quadrant].push(v);
    }
    quarters
}

/// Sorts a chain along Y (vertical groups) or X (horizontal groups).
///
/// The sort is stable, so vertices at the same height keep their boundary
/// order.
pub fn sort_along(chain: &mut [u32], positions: &[Point3<f64>], vertical: bool) {
    let axis = usize::from(vertical);
    let key = |v: &u32| positions.get(*v as usize).map_or(0.0, |p| p[axis]);
    chain.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four corners of a unit square plus its centre.
    fn square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ]
    }

    #[test]
    fn test_quarter_edges() {
        let q = quarter_edges(&square(), &[0, 1, 2, 3]);
        assert_eq!(q, [vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_quarter_ignores_unlisted_vertices() {
        // Mean of 0 and 3 is the centre; vertex 4 is never binned
        let q = quarter_edges(&square(), &[0, 3, 99]);
        assert_eq!(q, [vec![0], vec![], vec![], vec![3]]);
    }

    #[test]
    fn test_seam_sides_vertical() {
        let sides = SeamSides::from_edges(&square(), &[0, 1, 2, 3], true);
        // Left column and right column
        assert_eq!(sides.a, vec![0, 2]);
        assert_eq!(sides.b, vec![3, 1]);
    }

    #[test]
    fn test_seam_sides_horizontal() {
        let sides = SeamSides::from_edges(&square(), &[0, 1, 2, 3], false);
        // Bottom row and top row
        assert_eq!(sides.a, vec![0, 1]);
        assert_eq!(sides.b, vec![3, 2]);
    }

    #[test]
    fn test_offset() {
        let sides = SeamSides {
            a: vec![0, 2],
            b: vec![1],
        }
        .offset(10);
        assert_eq!(sides.a, vec![10, 12]);
        assert_eq!(sides.b, vec![11]);
        assert!(SeamSides::default().is_empty());
    }

    #[test]
    fn test_sort_along() {
        let positions = square();
        let mut chain = vec![3, 0, 1, 2];
        sort_along(&mut chain, &positions, true);
        assert_eq!(chain, vec![0, 1, 3, 2]);

        let mut chain = vec![3, 2, 1, 0];
        sort_along(&mut chain, &positions, false);
        assert_eq!(chain, vec![2, 0, 3, 1]);
    }
}
