//! Error types for stitching operations.

use mesh_region::RegionError;
use thiserror::Error;

/// Result type for stitching operations.
pub type StitchResult<T> = Result<T, StitchError>;

/// Errors that can occur while stitching front and back scans.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum StitchError {
    /// A segmented scan or container list does not cover every group.
    #[error("{what} has {actual} groups, expected {expected}")]
    GroupCount {
        /// What was being checked.
        what: &'static str,
        /// Required count.
        expected: usize,
        /// Supplied count.
        actual: usize,
    },

    /// Back-scan turn angle is not finite.
    #[error("invalid back turn angle: {0} degrees")]
    InvalidTurn(f64),

    /// A submesh update failed.
    #[error(transparent)]
    Region(#[from] RegionError),
}
