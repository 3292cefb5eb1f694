//! Zipper triangulation between two boundary chains.
//!
//! Given the front and back vertices along one seam, both sorted along the
//! seam direction, the zipper walks the two chains in lockstep and emits a
//! strip of triangles joining them.

use mesh_types::Point3;

use crate::chains::sort_along;

/// Winding of emitted triangles as seen from outside the seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Emit `(a, b, c)`.
    Clockwise,
    /// Emit `(a, c, b)`.
    CounterClockwise,
}

impl Winding {
    /// Winding for a seam side.
    ///
    /// `greater` marks the side whose chains lie on the positive side of
    /// the group (right for vertical groups, top for horizontal ones).
    #[must_use]
    pub const fn for_side(vertical: bool, greater: bool) -> Self {
        let counter_clockwise = if vertical { greater } else { !greater };
        if counter_clockwise {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }

    const fn emit(self, a: u32, b: u32, c: u32) -> [u32; 3] {
        match self {
            Self::Clockwise => [a, b, c],
            Self::CounterClockwise => [a, c, b],
        }
    }
}

/// Sorts both chains along the seam and zips them together.
///
/// Returns the new triangles in the index space of `positions`. Emits
/// nothing if either chain is empty.
#[must_use]
pub fn zip_chains(
    positions: &[Point3<f64>],
    front: &[u32],
    back: &[u32],
    vertical: bool,
    greater: bool,
) -> Vec<[u32; 3]> {
    if front.is_empty() || back.is_empty() {
        return Vec::new();
    }
    let mut front = front.to_vec();
    let mut back = back.to_vec();
    sort_along(&mut front, positions, vertical);
    sort_along(&mut back, positions, vertical);
    zip_sorted(&front, &back, Winding::for_side(vertical, greater))
}

/// Zips two already sorted chains.
///
/// Each step takes the head of both chains and a third vertex from the
/// second element of one of them, then drops that chain's head. The source
/// of the third vertex alternates while both chains have at least two
/// elements; once one chain is down to its last vertex the rest is a fan
/// from it. Stops when three vertices remain, so two non-empty chains of
/// lengths `m` and `n` give exactly `m + n - 3` triangles when `m + n > 3`.
#[must_use]
pub fn zip_sorted(front: &[u32], back: &[u32], winding: Winding) -> Vec<[u32; 3]> {
    if front.is_empty() || back.is_empty() {
        return Vec::new();
    }

    let mut triangles = Vec::with_capacity((front.len() + back.len()).saturating_sub(3));
    let (mut f, mut b) = (front, back);
    let mut take_front = true;

    while f.len() + b.len() > 3 {
        let (a0, b0) = (f[0], b[0]);
        let c = if f.len() > 1 && b.len() > 1 {
            let c = if take_front { f[1] } else { b[1] };
            if take_front {
                f = &f[1..];
            } else {
                b = &b[1..];
            }
            take_front = !take_front;
            c
        } else if f.len() == 1 {
            let c = b[1];
            b = &b[1..];
            c
        } else {
            let c = f[1];
            f = &f[1..];
            c
        };
        triangles.push(winding.emit(a0, b0, c));
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winding_for_side() {
        assert_eq!(Winding::for_side(true, false), Winding::Clockwise);
        assert_eq!(Winding::for_side(true, true), Winding::CounterClockwise);
        assert_eq!(Winding::for_side(false, false), Winding::CounterClockwise);
        assert_eq!(Winding::for_side(false, true), Winding::Clockwise);
    }

    #[test]
    fn test_zip_alternates() {
        let tris = zip_sorted(&[0, 1, 2], &[10, 11, 12], Winding::Clockwise);
        assert_eq!(tris, vec![[0, 10, 1], [1, 10, 11], [1, 11, 2]]);
    }

    #[test]
    fn test_zip_counter_clockwise() {
        let tris = zip_sorted(&[0, 1], &[10, 11], Winding::CounterClockwise);
        assert_eq!(tris, vec![[0, 1, 10]]);
    }

    #[test]
    fn test_zip_fans_from_single_vertex() {
        let tris = zip_sorted(&[0], &[10, 11, 12, 13], Winding::Clockwise);
        assert_eq!(tris, vec![[0, 10, 11], [0, 11, 12]]);
    }

    #[test]
    fn test_zip_uneven_chains() {
        let tris = zip_sorted(&[0, 1, 2, 3, 4], &[10, 11], Winding::Clockwise);
        assert_eq!(tris.len(), 4);
        assert_eq!(tris[0], [0, 10, 1]);
        assert_eq!(tris[1], [1, 10, 11]);
        // Back chain is down to one vertex: fan along the front
        assert_eq!(tris[2], [1, 11, 2]);
        assert_eq!(tris[3], [2, 11, 3]);
    }

    #[test]
    fn test_zip_small_or_empty() {
        assert!(zip_sorted(&[0, 1], &[10], Winding::Clockwise).is_empty());
        assert!(zip_sorted(&[], &[10, 11, 12, 13], Winding::Clockwise).is_empty());
    }

    #[test]
    fn test_zip_chains_sorts_first() {
        let positions: Vec<Point3<f64>> = (0..6)
            .map(|i| {
                let side = if i < 3 { 0.0 } else { 1.0 };
                Point3::new(side, f64::from(i % 3), 0.0)
            })
            .collect();
        let tris = zip_chains(&positions, &[2, 0, 1], &[5, 3, 4], true, false);
        assert_eq!(tris, vec![[0, 3, 1], [1, 3, 4], [1, 4, 2]]);
    }
}
