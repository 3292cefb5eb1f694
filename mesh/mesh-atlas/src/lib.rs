//! Texture atlases for stitched body scans.
//!
//! Each of the five texture regions gets one image cut from both scan
//! textures. The crop boxes come from the texture footprints of the
//! region's POIs, rounded outward to a pixel grid. Background pixels are
//! extrapolated away so that filtering near seams picks up skin colour,
//! and the back crop is stacked above the front crop.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Images are
//! plain [`image::RgbaImage`] buffers.
//!
//! # Overview
//!
//! - [`ScanTexture`] - Colour raster plus colour mask
//! - [`UvBounds`] / [`PixelBounds`] - Crop boxes
//! - [`extrapolate_background`] - Background fill from the crop centre
//! - [`build_atlas`] - One [`RegionAtlas`] per region
//! - [`remap_uv`] - Scan UV to atlas UV
//!
//! # Quick Start
//!
//! ```
//! use mesh_atlas::{UvBounds, remap_uv};
//! use mesh_types::Point2;
//!
//! let bounds = UvBounds { min_u: 0.25, max_u: 0.75, min_v: 0.0, max_v: 0.5 };
//!
//! // Front UVs land in the lower half of the atlas
//! let uv = remap_uv(&bounds, Point2::new(0.75, 0.5), true);
//! assert_eq!(uv, Point2::new(1.0, 1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

mod atlas;
pub mod bounds;
mod error;
pub mod extrapolate;
mod texture;

pub use atlas::{
    AtlasParams, RegionAtlas, TextureAtlas, build_atlas, join_halves, remap_mesh_uvs, remap_uv,
};
pub use bounds::{PixelBounds, UvBounds};
pub use error::{AtlasError, AtlasResult};
pub use extrapolate::{NeighbourWeights, extrapolate_background};
pub use texture::{BACKGROUND, ScanTexture};
