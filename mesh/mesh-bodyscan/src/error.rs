//! Error types for body-scan sessions.

use mesh_atlas::AtlasError;
use mesh_region::RegionError;
use mesh_scan::ScanError;
use mesh_stitch::StitchError;
use thiserror::Error;

use crate::report::Stage;

/// Result type for body-scan operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while reconstructing or packaging a body scan.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SessionError {
    /// A stage was run before the stage it depends on.
    #[error("cannot run {stage}: {missing} has not been done")]
    MissingStage {
        /// Stage that was requested.
        stage: Stage,
        /// Stage that must come first.
        missing: Stage,
    },

    /// Two rasters of one capture disagree in size.
    #[error("{what} is {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected `(width, height)`.
        expected: (usize, usize),
        /// Actual `(width, height)`.
        actual: (usize, usize),
    },

    /// A package array does not have the length its counts imply.
    #[error("package {what} has {actual} entries, expected {expected}")]
    PackageLayout {
        /// Which array.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Packaged bytes do not start with the package magic.
    #[error("invalid package magic: {0:?}")]
    InvalidMagic([u8; 4]),

    /// Packaged bytes use an unknown format version.
    #[error("unsupported package version: {0}")]
    UnsupportedVersion(u32),

    /// Encoding the package failed.
    #[error("failed to serialize package: {0}")]
    Serialize(String),

    /// Decoding the package failed.
    #[error("failed to deserialize package: {0}")]
    Deserialize(String),

    /// Mask or lattice processing failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Segmentation failed.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Stitching failed.
    #[error(transparent)]
    Stitch(#[from] StitchError),

    /// Atlas building failed.
    #[error(transparent)]
    Atlas(#[from] AtlasError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_stage_message() {
        let err = SessionError::MissingStage {
            stage: Stage::SelectBack,
            missing: Stage::SelectFront,
        };
        assert_eq!(
            err.to_string(),
            "cannot run back selection: front selection has not been done"
        );
    }

    #[test]
    fn test_wrapped_errors_are_transparent() {
        let err: SessionError = ScanError::EmptyLattice.into();
        assert_eq!(err.to_string(), "lattice is empty");
        let err: SessionError = AtlasError::EmptyTexture.into();
        assert_eq!(err.to_string(), "texture is empty");
    }
}
