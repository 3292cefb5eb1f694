//! Connected-region labelling of unmasked cells (8-connectivity).

use crate::mask::{MaskValue, RasterMask};

/// Region label per cell. `0` means "no region".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLabels {
    /// Label per cell, row-major.
    pub labels: Vec<u32>,
    /// Number of distinct regions.
    pub region_count: usize,
}

impl RegionLabels {
    /// Pixel count per label, indexed by label (index 0 is unused).
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        let max = self.labels.iter().copied().max().unwrap_or(0) as usize;
        let mut sizes = vec![0; max + 1];
        for &label in &self.labels {
            if label != 0 {
                sizes[label as usize] += 1;
            }
        }
        sizes
    }

    /// The label with the most pixels, ties broken towards the smaller label.
    ///
    /// Returns `None` when there are no regions.
    #[must_use]
    pub fn largest(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (label, &size) in self.sizes().iter().enumerate().skip(1) {
            if size == 0 {
                continue;
            }
            if best.is_none_or(|(_, s)| size > s) {
                #[allow(clippy::cast_possible_truncation)]
                let label = label as u32;
                best = Some((label, size));
            }
        }
        best.map(|(label, _)| label)
    }
}

fn find(parent: &mut [u32], mut label: u32) -> u32 {
    while parent[label as usize] != label {
        let grand = parent[parent[label as usize] as usize];
        parent[label as usize] = grand;
        label = grand;
    }
    label
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra < rb {
        parent[rb as usize] = ra;
    } else if rb < ra {
        parent[ra as usize] = rb;
    }
}

/// Labels every unmasked cell with a positive region id.
///
/// Labels are assigned in a single row-major sweep; when a cell touches
/// several labelled neighbours, their labels are merged and the smallest id
/// becomes the region id.
#[must_use]
pub fn label_regions(mask: &RasterMask) -> RegionLabels {
    let (width, height) = mask.dimensions();
    let mut labels = vec![0u32; width * height];
    // parent[0] is a sentinel for "unlabelled"
    let mut parent: Vec<u32> = vec![0];

    for y in 0..height {
        for x in 0..width {
            if !mask.is_unmasked(x, y) {
                continue;
            }

            // Neighbours already visited in a row-major sweep
            let mut seen = [0u32; 4];
            let candidates = [
                (x.checked_sub(1), Some(y)),
                (x.checked_sub(1), y.checked_sub(1)),
                (Some(x), y.checked_sub(1)),
                (Some(x + 1).filter(|&nx| nx < width), y.checked_sub(1)),
            ];
            for (slot, candidate) in seen.iter_mut().zip(candidates) {
                if let (Some(nx), Some(ny)) = candidate {
                    *slot = labels[mask.index(nx, ny)];
                }
            }

            let label = match seen.iter().copied().filter(|&l| l != 0).min() {
                Some(min) => {
                    for &other in seen.iter().filter(|&&l| l != 0) {
                        union(&mut parent, min, other);
                    }
                    min
                }
                None => {
                    #[allow(clippy::cast_possible_truncation)]
                    let next = parent.len() as u32;
                    parent.push(next);
                    next
                }
            };
            labels[mask.index(x, y)] = label;
        }
    }

    let mut roots = std::collections::BTreeSet::new();
    for label in &mut labels {
        if *label != 0 {
            *label = find(&mut parent, *label);
            roots.insert(*label);
        }
    }

    RegionLabels {
        labels,
        region_count: roots.len(),
    }
}

/// Keeps only the largest unmasked region; every other cell becomes masked.
///
/// Returns the number of cells kept. A mask with no unmasked cells is left
/// all-masked and yields `0`.
pub fn keep_largest_region(mask: &mut RasterMask) -> usize {
    let regions = label_regions(mask);
    let keep = regions.largest();
    let mut kept = 0;

    for (cell, &label) in mask.cells_mut().iter_mut().zip(&regions.labels) {
        if keep.is_some_and(|k| k == label) {
            *cell = MaskValue::Unmasked;
            kept += 1;
        } else {
            *cell = MaskValue::Masked;
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(width: usize, rows: &[&str]) -> RasterMask {
        let raw: Vec<u8> = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| u8::from(b == b'#')))
            .collect();
        RasterMask::from_raw(width, rows.len(), &raw).unwrap()
    }

    #[test]
    fn test_label_two_regions() {
        let m = mask(5, &["##...", "##...", "....#", "...##"]);
        let regions = label_regions(&m);
        assert_eq!(regions.region_count, 2);
        assert_eq!(regions.largest(), Some(1));
    }

    #[test]
    fn test_diagonal_is_connected() {
        let m = mask(3, &["#..", ".#.", "..#"]);
        assert_eq!(label_regions(&m).region_count, 1);
    }

    #[test]
    fn test_merge_keeps_smallest_id() {
        // A "U" shape: both arms get labels before the bottom joins them
        let m = mask(3, &["#.#", "#.#", "###"]);
        let regions = label_regions(&m);
        assert_eq!(regions.region_count, 1);
        assert!(regions.labels.iter().all(|&l| l == 0 || l == 1));
    }

    #[test]
    fn test_keep_largest_region() {
        let mut m = mask(6, &["###...", "###..#", "......", "#....."]);
        let kept = keep_largest_region(&mut m);
        assert_eq!(kept, 6);
        assert_eq!(m.unmasked_count(), 6);
        assert!(!m.is_unmasked(5, 1));
        assert!(!m.is_unmasked(0, 3));
    }

    #[test]
    fn test_keep_largest_tie_prefers_first_region() {
        let mut m = mask(5, &["#...#"]);
        keep_largest_region(&mut m);
        assert!(m.is_unmasked(0, 0));
        assert!(!m.is_unmasked(4, 0));
    }

    #[test]
    fn test_empty_mask_has_no_regions() {
        let mut m = RasterMask::filled(4, 4, MaskValue::Masked);
        let regions = label_regions(&m);
        assert_eq!(regions.region_count, 0);
        assert_eq!(regions.largest(), None);
        assert_eq!(keep_largest_region(&mut m), 0);
    }
}
