//! Core mesh types for body-scan reconstruction.
//!
//! This crate provides the foundational types shared by every stage of the
//! scan pipeline:
//!
//! - [`Vertex`] - A point in 3D space with a texture coordinate
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`IndexRemap`] - Old-to-new index table produced when vertices are removed
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Meshes are plain
//! data; placement in a scene is expressed with explicit transforms
//! (see `mesh-transform`), never with a live scene graph.
//!
//! # Units
//!
//! Positions are `f64` in the depth camera's space (meters).
//! Texture coordinates are `f64` in `[0, 1]`, with `v = 0` on the first
//! raster row.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology, Point2, Point3, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0), Point2::new(0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0), Point2::new(1.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 1.0, 0.0), Point2::new(0.0, 1.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod mesh;
mod remap;
mod traits;
mod vertex;

pub use mesh::IndexedMesh;
pub use remap::IndexRemap;
pub use traits::MeshTopology;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, UnitQuaternion, Vector3};
