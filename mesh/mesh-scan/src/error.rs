//! Error types for scan processing operations.

use std::fmt;

/// Result type for scan processing operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur during scan processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Two rasters that must share dimensions do not.
    ShapeMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected `(width, height)`.
        expected: (usize, usize),
        /// Actual `(width, height)`.
        actual: (usize, usize),
    },

    /// Backing storage length does not match `width * height`.
    SizeMismatch {
        /// Expected number of cells.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// A raw mask value outside `{0, 1, 2}`.
    InvalidMaskValue {
        /// The offending value.
        value: u8,
        /// Flat index of the offending cell.
        index: usize,
    },

    /// Lattice has zero width or height.
    EmptyLattice,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{what} shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "raster size mismatch: expected {expected} cells, got {actual}")
            }
            Self::InvalidMaskValue { value, index } => {
                write!(f, "invalid mask value {value} at cell {index}")
            }
            Self::EmptyLattice => write!(f, "lattice is empty"),
        }
    }
}

impl std::error::Error for ScanError {}
