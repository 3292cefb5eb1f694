//! Skeleton-driven segmentation of body scans.
//!
//! A tracked skeleton gives 25 joints; 24 bones are derived between fixed
//! joint pairs. Together they form 49 points of interest (POIs). Every scan
//! vertex is assigned to its nearest POI, every POI belongs to one of 21
//! anatomical groups, and the scan is split into one submesh per group.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Group placement
//! is plain data (an origin per submesh); there is no scene graph.
//!
//! # Overview
//!
//! - [`Skeleton`] - Joints, derived bones, back-scan reversal
//! - [`AnatomicalGroup`] / [`TextureRegion`] - Fixed lookup tables
//! - [`GroupSubmesh`] - One group's geometry with boundary index tables
//! - [`segment_scan`] - Splits a scan into [`SegmentedScan`]
//!
//! # Quick Start
//!
//! ```
//! use mesh_region::{segment_scan, AnatomicalGroup, SegmentParams, Skeleton};
//! use mesh_scan::ScannedEdges;
//! use mesh_types::{IndexedMesh, MeshTopology, Point2, Vertex};
//!
//! let skeleton = Skeleton::reference();
//! let head = skeleton.poi_position(AnatomicalGroup::Head.anchor());
//!
//! let mut mesh = IndexedMesh::new();
//! for dx in [0.0, 0.01, 0.0] {
//!     mesh.vertices.push(Vertex::new(head + nalgebra::Vector3::new(dx, dx, 0.0), Point2::origin()));
//! }
//! mesh.vertices[2].position.y += 0.02;
//! mesh.faces.push([0, 1, 2]);
//!
//! let edges = ScannedEdges::from_vertices(3, [0, 1, 2]);
//! let scan = segment_scan(&mesh, &edges, &skeleton, &SegmentParams::new()).unwrap();
//!
//! assert_eq!(scan.group(AnatomicalGroup::Head).face_count(), 1);
//! println!("{scan}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod anatomy;
mod error;
pub mod nearest;
pub mod segment;
pub mod skeleton;
mod submesh;

pub use anatomy::{AnatomicalGroup, TextureRegion, poi_is_vertical};
pub use error::{RegionError, RegionResult};
pub use nearest::{assign_nearest_pois, nearest_poi};
pub use segment::{SegmentParams, SegmentedScan, segment_scan};
pub use skeleton::{
    BONE_COUNT, BONE_JOINTS, JOINT_COUNT, Joint, POI_COUNT, Poi, ReverseOffsets, Skeleton,
    bone_name,
};
pub use submesh::{CreatedEdge, GroupSubmesh};
