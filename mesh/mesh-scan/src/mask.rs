//! Per-pixel body masks.

use crate::error::{ScanError, ScanResult};

/// State of a single mask cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskValue {
    /// Background; never produces geometry.
    #[default]
    Masked,
    /// Part of the body.
    Unmasked,
    /// Marked by the last erode pass; a dilate pass decides its fate.
    Eroded,
}

impl MaskValue {
    /// Raw integer encoding (`0`, `1`, `2`).
    #[must_use]
    pub const fn to_raw(self) -> u8 {
        match self {
            Self::Masked => 0,
            Self::Unmasked => 1,
            Self::Eroded => 2,
        }
    }

    /// Decodes a raw integer, if it is one of `0`, `1`, `2`.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Masked),
            1 => Some(Self::Unmasked),
            2 => Some(Self::Eroded),
            _ => None,
        }
    }

    /// True for [`MaskValue::Unmasked`].
    #[must_use]
    pub const fn is_unmasked(self) -> bool {
        matches!(self, Self::Unmasked)
    }
}

/// A 2D grid of [`MaskValue`]s, stored row-major (`x + y * width`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterMask {
    width: usize,
    height: usize,
    cells: Vec<MaskValue>,
}

impl RasterMask {
    /// Creates a mask with every cell set to `value`.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: MaskValue) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Wraps existing cells.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::SizeMismatch`] if `cells.len() != width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<MaskValue>) -> ScanResult<Self> {
        if cells.len() != width * height {
            return Err(ScanError::SizeMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Decodes a raw `{0, 1, 2}` buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::SizeMismatch`] on a length mismatch and
    /// [`ScanError::InvalidMaskValue`] for any value above `2`.
    pub fn from_raw(width: usize, height: usize, raw: &[u8]) -> ScanResult<Self> {
        let cells = raw
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                MaskValue::from_raw(value).ok_or(ScanError::InvalidMaskValue { value, index })
            })
            .collect::<ScanResult<Vec<_>>>()?;
        Self::from_cells(width, height, cells)
    }

    /// Builds a binary mask from per-cell flags (`true` = unmasked).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::SizeMismatch`] on a length mismatch.
    pub fn from_flags(width: usize, height: usize, flags: &[bool]) -> ScanResult<Self> {
        let cells = flags
            .iter()
            .map(|&f| if f { MaskValue::Unmasked } else { MaskValue::Masked })
            .collect();
        Self::from_cells(width, height, cells)
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Flat index of `(x, y)`.
    #[must_use]
    pub const fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    /// Value at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<MaskValue> {
        if x < self.width && y < self.height {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Sets the value at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: MaskValue) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells[i] = value;
        }
    }

    /// True if `(x, y)` is in bounds and unmasked.
    #[must_use]
    pub fn is_unmasked(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(MaskValue::is_unmasked)
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[MaskValue] {
        &self.cells
    }

    /// Raw `{0, 1, 2}` encoding, row-major.
    #[must_use]
    pub fn to_raw(&self) -> Vec<u8> {
        self.cells.iter().map(|v| v.to_raw()).collect()
    }

    /// Number of unmasked cells.
    #[must_use]
    pub fn unmasked_count(&self) -> usize {
        self.cells.iter().filter(|v| v.is_unmasked()).count()
    }

    /// True if no cell holds [`MaskValue::Eroded`].
    #[must_use]
    pub fn is_binary(&self) -> bool {
        !self.cells.contains(&MaskValue::Eroded)
    }

    /// In-bounds 8-neighbours of `(x, y)`, no wraparound.
    pub fn neighbours(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        const OFFSETS: [(isize, isize); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            (nx < self.width && ny < self.height).then_some((nx, ny))
        })
    }

    /// Number of unmasked 8-neighbours of `(x, y)`.
    #[must_use]
    pub fn count_unmasked_neighbours(&self, x: usize, y: usize) -> usize {
        self.neighbours(x, y)
            .filter(|&(nx, ny)| self.is_unmasked(nx, ny))
            .count()
    }

    /// Returns the mask rotated by 180 degrees.
    #[must_use]
    pub fn rotated_180(&self) -> Self {
        let mut cells = self.cells.clone();
        cells.reverse();
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Checks this mask against expected dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ShapeMismatch`] if the dimensions differ.
    pub fn check_dimensions(&self, what: &'static str, expected: (usize, usize)) -> ScanResult<()> {
        if self.dimensions() == expected {
            Ok(())
        } else {
            Err(ScanError::ShapeMismatch {
                what,
                expected,
                actual: self.dimensions(),
            })
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [MaskValue] {
        &mut self.cells
    }
}
