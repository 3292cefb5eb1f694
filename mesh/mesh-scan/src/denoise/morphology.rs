//! Erode and dilate passes over a [`RasterMask`].
//!
//! Both passes read from a snapshot of the mask so the result does not depend
//! on scan order.

use crate::mask::{MaskValue, RasterMask};

/// Erodes the mask in place.
///
/// An unmasked cell stays unmasked if at least `factor` of its in-bounds
/// 8-neighbours are unmasked, otherwise it becomes [`MaskValue::Eroded`].
/// Every other cell, including cells eroded by an earlier pass, becomes
/// [`MaskValue::Masked`].
///
/// Returns the number of cells that moved from unmasked to eroded.
pub fn erode(mask: &mut RasterMask, factor: u32) -> usize {
    let snapshot = mask.clone();
    let (width, height) = snapshot.dimensions();
    let mut eroded = 0;

    for y in 0..height {
        for x in 0..width {
            let next = match snapshot.get(x, y) {
                Some(MaskValue::Unmasked) => {
                    if snapshot.count_unmasked_neighbours(x, y) >= factor as usize {
                        MaskValue::Unmasked
                    } else {
                        eroded += 1;
                        MaskValue::Eroded
                    }
                }
                _ => MaskValue::Masked,
            };
            mask.set(x, y, next);
        }
    }

    eroded
}

/// Dilates the mask in place.
///
/// An eroded cell is restored if at least `factor` of its in-bounds
/// 8-neighbours are unmasked, otherwise it becomes masked. Unmasked cells
/// stay unmasked and masked cells stay masked.
///
/// Returns the number of restored cells.
pub fn dilate(mask: &mut RasterMask, factor: u32) -> usize {
    let snapshot = mask.clone();
    let (width, height) = snapshot.dimensions();
    let mut restored = 0;

    for y in 0..height {
        for x in 0..width {
            if snapshot.get(x, y) != Some(MaskValue::Eroded) {
                continue;
            }
            if snapshot.count_unmasked_neighbours(x, y) >= factor as usize {
                restored += 1;
                mask.set(x, y, MaskValue::Unmasked);
            } else {
                mask.set(x, y, MaskValue::Masked);
            }
        }
    }

    restored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: usize, inner: (usize, usize, usize, usize)) -> RasterMask {
        let mut mask = RasterMask::filled(size, size, MaskValue::Masked);
        for y in inner.1..inner.3 {
            for x in inner.0..inner.2 {
                mask.set(x, y, MaskValue::Unmasked);
            }
        }
        mask
    }

    #[test]
    fn test_erode_factor_zero_is_noop() {
        let mut mask = RasterMask::filled(5, 4, MaskValue::Unmasked);
        let before = mask.clone();
        assert_eq!(erode(&mut mask, 0), 0);
        assert_eq!(mask, before);
    }

    #[test]
    fn test_dilate_all_masked_is_noop() {
        for factor in 0..=8 {
            let mut mask = RasterMask::filled(4, 4, MaskValue::Masked);
            assert_eq!(dilate(&mut mask, factor), 0);
            assert_eq!(mask.unmasked_count(), 0);
        }
    }

    #[test]
    fn test_erode_strips_border_of_block() {
        let mut mask = square(6, (1, 1, 5, 5));
        erode(&mut mask, 8);

        // Only the 2x2 core has all 8 neighbours unmasked
        assert_eq!(mask.unmasked_count(), 4);
        assert!(mask.is_unmasked(2, 2));
        assert_eq!(mask.get(1, 1), Some(MaskValue::Eroded));
        assert_eq!(mask.get(0, 0), Some(MaskValue::Masked));
    }

    #[test]
    fn test_erode_then_dilate_restores_block() {
        let mut mask = square(6, (1, 1, 5, 5));
        erode(&mut mask, 8);
        let restored = dilate(&mut mask, 1);

        assert_eq!(restored, 12);
        assert_eq!(mask.unmasked_count(), 16);
        assert!(mask.is_binary());
    }

    #[test]
    fn test_erode_removes_isolated_pixel() {
        let mut mask = square(6, (1, 1, 4, 4));
        mask.set(5, 5, MaskValue::Unmasked);
        erode(&mut mask, 1);
        assert_eq!(mask.get(5, 5), Some(MaskValue::Eroded));
        dilate(&mut mask, 1);
        assert_eq!(mask.get(5, 5), Some(MaskValue::Masked));
        assert!(mask.is_unmasked(2, 2));
    }

    #[test]
    fn test_second_erode_clears_previous_marks() {
        let mut mask = square(6, (1, 1, 5, 5));
        erode(&mut mask, 8);
        erode(&mut mask, 8);
        assert_eq!(mask.get(1, 1), Some(MaskValue::Masked));
        assert_eq!(mask.get(2, 2), Some(MaskValue::Eroded));
    }
}
