//! Stitching the front and back halves of a body scan.
//!
//! After segmentation each scan is a set of 21 group submeshes. This crate
//! joins matching groups: the back half is turned into the front frame,
//! overlapping geometry is cut away along the group's split plane, and the
//! two remaining boundaries are zipped together with new triangles. Cuts
//! between neighbouring groups are then refilled by one linking mesh per
//! texture region.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Group
//! placement is a plain [`Pose`](mesh_transform::Pose) per group; linking
//! meshes follow their groups through [`EdgeHook`]s.
//!
//! # Overview
//!
//! - [`stitch_body`] - Stitches two [`SegmentedScan`](mesh_region::SegmentedScan)s
//! - [`remove_overlap`] - Split-plane overlap removal for one half
//! - [`zip_chains`] - Zipper triangulation between two boundary chains
//! - [`smooth_chain`] - Seam smoothing
//! - [`LinkingMesh`] - Seam-filling mesh across segmentation cuts
//!
//! # Quick Start
//!
//! ```
//! use mesh_stitch::{Winding, zip_sorted};
//!
//! // Three front and three back boundary vertices
//! let triangles = zip_sorted(&[0, 1, 2], &[3, 4, 5], Winding::Clockwise);
//! assert_eq!(triangles.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

mod body;
pub mod chains;
mod combine;
mod error;
pub mod linking;
pub mod overlap;
pub mod smooth;
pub mod zipper;

pub use body::{GroupStatus, GroupStitchReport, StitchParams, StitchedBody, stitch_body};
pub use chains::{SeamSides, quarter_edges};
pub use combine::{StitchedGroupMesh, combine_halves};
pub use error::{StitchError, StitchResult};
pub use linking::{EdgeHook, LinkingMesh, LinkingSource, build_linking_meshes};
pub use overlap::{SplitPlane, align_by_centroids, identify_overlap, place_back, remove_overlap};
pub use smooth::{smooth_chain, smooth_seam};
pub use zipper::{Winding, zip_chains, zip_sorted};
