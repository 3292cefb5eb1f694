//! Body-scan reconstruction toolkit.
//!
//! This umbrella crate re-exports all mesh-* crates used to turn a front
//! and a back depth capture into a stitched, textured body. All crates are
//! Layer 0 (zero Bevy dependencies) and can be used in CLI tools, WASM,
//! servers, or Python bindings.
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh::prelude::*;
//!
//! # fn captures() -> (ScanSnapshot, ScanSnapshot) { unimplemented!() }
//! let (front, back) = captures();
//!
//! let mut session = ReconstructionSession::new(BodyScanParams::for_body_scan());
//! session.select_front(&front);
//! session.select_back(&back).unwrap();
//! let scan = session.run().unwrap();
//! println!("{}", scan.report);
//!
//! // Flatten for transport
//! let bytes = ScanPackage::from_body_scan(&scan).to_bytes().unwrap();
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`types`] - Core data structures: `IndexedMesh`, `Vertex`
//! - [`transform`] - Poses and transform composition
//!
//! ## Capture Processing
//! - [`scan`] - Depth lattices, mask denoising, lattice triangulation
//! - [`region`] - Skeletons, POIs, anatomical segmentation
//!
//! ## Assembly
//! - [`stitch`] - Overlap removal, seam zippering, linking meshes
//! - [`atlas`] - Per-region texture atlases
//! - [`bodyscan`] - The reconstruction session and transport package

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![doc(html_root_url = "https://docs.rs/mesh/0.7.0")]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `IndexedMesh`, `Vertex`.
pub use mesh_types as types;

/// Poses, transform composition.
pub use mesh_transform as transform;

/// Depth lattices, mask denoising, lattice triangulation.
pub use mesh_scan as scan;

/// Skeletons, POIs, anatomical segmentation.
pub use mesh_region as region;

/// Front/back stitching and linking meshes.
pub use mesh_stitch as stitch;

/// Per-region texture atlases.
pub use mesh_atlas as atlas;

/// Reconstruction session and transport package.
pub use mesh_bodyscan as bodyscan;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for body-scan reconstruction.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{IndexedMesh, MeshTopology, Vertex};

    // Transform
    pub use mesh_transform::Pose;

    // Capture
    pub use mesh_scan::{DepthLattice, DepthSample, RasterMask};

    // Anatomy
    pub use mesh_region::{AnatomicalGroup, Skeleton, TextureRegion};

    // Texture
    pub use mesh_atlas::ScanTexture;

    // Session (main use case)
    pub use mesh_bodyscan::{
        BodyScan, BodyScanParams, ReconstructionSession, ScanPackage, ScanSnapshot,
        reconstruct_body,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let mesh = IndexedMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::IndexedMesh::new();
        let _ = scan::MaskDenoiseParams::default();
        let _ = bodyscan::BodyScanParams::default();
        assert_eq!(region::TextureRegion::COUNT, 5);
    }
}
