//! Two-capture body reconstruction.
//!
//! A [`ReconstructionSession`] takes one front and one back capture and
//! turns them into a closed, textured body split into anatomical groups:
//! masks are denoised, lattices triangulated, surfaces segmented by the
//! nearest skeleton POI, the halves stitched along their seams and the
//! colour rasters cut into one atlas image per texture region.
//!
//! Every stage records a [`StageReport`], so callers can tell a clean run
//! from one that fell back to the reference skeleton or left regions
//! without colour.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. The finished
//! [`BodyScan`] can be flattened into a [`ScanPackage`] of primitive
//! arrays for transport to any renderer.
//!
//! # Overview
//!
//! - [`ScanSnapshot`] - One capture from the capture layer
//! - [`ReconstructionSession`] - Stage-by-stage pipeline state
//! - [`reconstruct_body`] - The whole pipeline in one call
//! - [`BodyScan`] - Stitched meshes, atlas and skeleton
//! - [`ScanPackage`] - Flat arrays with a small binary header
//!
//! # Quick Start
//!
//! ```
//! use mesh_bodyscan::{ReconstructionSession, SessionError, Stage};
//!
//! let mut session = ReconstructionSession::default();
//!
//! // Stages refuse to run out of order
//! let err = session.reconstruct().unwrap_err();
//! assert_eq!(
//!     err,
//!     SessionError::MissingStage { stage: Stage::Reconstruct, missing: Stage::SelectBack }
//! );
//! assert!(!session.report().is_complete());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

mod error;
mod package;
mod params;
mod report;
mod scan;
mod session;
mod snapshot;

pub use error::{SessionError, SessionResult};
pub use package::{
    MeshSet, PACKAGE_HEADER_SIZE, PACKAGE_MAGIC, PACKAGE_VERSION, PackedMesh, ScanPackage,
};
pub use params::BodyScanParams;
pub use report::{PipelineReport, Side, Stage, StageReport, StageStatus};
pub use scan::BodyScan;
pub use session::{
    FrontBack, PreparedScan, ReconstructedScan, ReconstructionSession, reconstruct_body,
};
pub use snapshot::ScanSnapshot;
