//! Depth-lattice scan processing.
//!
//! This crate turns one depth-camera capture into a triangle mesh:
//!
//! - **Mask** - Per-pixel body mask with masked/unmasked/eroded states
//! - **Denoising** - Erode/dilate passes and largest-region selection
//! - **Lattice** - Depth samples on a 2D grid and their triangulation
//! - **Edges** - Boundary vertices of the reconstructed surface
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero engine dependencies. All types are
//! plain data designed for pure Rust computational pipelines.
//!
//! # Quick Start
//!
//! ```
//! use mesh_scan::denoise::{denoise_mask, MaskDenoiseParams};
//! use mesh_scan::edges::find_scanned_edges;
//! use mesh_scan::lattice::{reconstruct_lattice, DepthLattice, DepthSample};
//! use mesh_types::{MeshTopology, Point2, Point3};
//!
//! let (w, h) = (6, 6);
//! let samples = (0..w * h)
//!     .map(|i| {
//!         let (x, y) = ((i % w) as f64, (i / w) as f64);
//!         let inside = (1.0..5.0).contains(&x) && (1.0..5.0).contains(&y);
//!         DepthSample::new(Point3::new(x * 0.01, y * 0.01, 1.5), Point2::new(x / 6.0, y / 6.0), inside)
//!     })
//!     .collect();
//! let lattice = DepthLattice::new(w, h, samples).unwrap();
//!
//! let mut mask = lattice.body_mask();
//! denoise_mask(&mut mask, &MaskDenoiseParams::none());
//!
//! let scan = reconstruct_lattice(&lattice, &mask).unwrap();
//! let edges = find_scanned_edges(&scan);
//!
//! assert_eq!(scan.mesh.vertex_count(), 16);
//! assert_eq!(scan.mesh.face_count(), 18);
//! assert_eq!(edges.len(), 12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod denoise;
pub mod edges;
pub mod error;
pub mod lattice;
pub mod mask;

pub use denoise::{MaskDenoiseParams, MaskDenoiseResult, denoise_colour_mask, denoise_mask};
pub use edges::{ScannedEdges, find_scanned_edges};
pub use error::{ScanError, ScanResult};
pub use lattice::{DepthLattice, DepthSample, LatticeMesh, reconstruct_lattice};
pub use mask::{MaskValue, RasterMask};
