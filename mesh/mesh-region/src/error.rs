//! Error types for skeleton and segmentation operations.

use thiserror::Error;

/// Result type for region operations.
pub type RegionResult<T> = Result<T, RegionError>;

/// Errors that can occur during skeleton or segmentation operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegionError {
    /// A skeleton was built from the wrong number of joints.
    #[error("expected {expected} joints, got {actual}")]
    JointCount {
        /// Required joint count.
        expected: usize,
        /// Supplied joint count.
        actual: usize,
    },

    /// A POI index outside `0..49`.
    #[error("invalid point-of-interest index {index}")]
    InvalidPoi {
        /// The invalid index.
        index: usize,
    },

    /// An invalid vertex index was found in a face.
    #[error("invalid vertex index {index} (mesh has {vertex_count} vertices)")]
    InvalidVertexIndex {
        /// The invalid index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Per-vertex side data does not match the mesh.
    #[error("{what} covers {actual} vertices, mesh has {expected}")]
    VertexCountMismatch {
        /// What was being compared.
        what: &'static str,
        /// Mesh vertex count.
        expected: usize,
        /// Side-data length.
        actual: usize,
    },
}
