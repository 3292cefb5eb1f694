//! Per-region texture atlases.
//!
//! Each texture region gets one image: the back crop in the top half and
//! the front crop in the bottom half. Mesh UVs are remapped into the half
//! that matches the scan they came from.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage, imageops};
use mesh_region::{SegmentedScan, TextureRegion};
use mesh_types::{IndexedMesh, Point2};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bounds::{PixelBounds, UvBounds};
use crate::error::{AtlasError, AtlasResult};
use crate::extrapolate::extrapolate_background;
use crate::texture::{BACKGROUND, ScanTexture};

/// Parameters for atlas building.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasParams {
    /// Crop bounds are rounded outward to multiples of this many pixels.
    /// Default: 30.
    pub pixel_interval: u32,
    /// Background extrapolation passes per crop. Default: 2.
    pub extrapolation_iterations: usize,
    /// Colour treated as background. Default: [`BACKGROUND`].
    pub background: Rgba<u8>,
    /// Build regions on the rayon pool. Default: true.
    pub parallel: bool,
}

impl Default for AtlasParams {
    fn default() -> Self {
        Self {
            pixel_interval: 30,
            extrapolation_iterations: 2,
            background: BACKGROUND,
            parallel: true,
        }
    }
}

impl AtlasParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the crop rounding interval.
    #[must_use]
    pub const fn with_pixel_interval(mut self, interval: u32) -> Self {
        self.pixel_interval = interval;
        self
    }

    /// Sets the number of extrapolation passes.
    #[must_use]
    pub const fn with_extrapolation_iterations(mut self, iterations: usize) -> Self {
        self.extrapolation_iterations = iterations;
        self
    }

    /// Sets the background colour.
    #[must_use]
    pub const fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    /// Sets whether regions are built in parallel.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// The joined texture of one region and the crop boxes it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAtlas {
    /// The region.
    pub region: TextureRegion,
    /// Back crop on top, front crop below, both at the front crop's size.
    pub image: RgbaImage,
    /// Front crop box as a fraction of the front texture.
    pub front_bounds: UvBounds,
    /// Back crop box as a fraction of the back texture.
    pub back_bounds: UvBounds,
    /// Front crop box in front-texture pixels.
    pub front_pixels: PixelBounds,
    /// Back crop box in back-texture pixels.
    pub back_pixels: PixelBounds,
    /// False when both crops were pure background.
    pub has_colour: bool,
}

impl RegionAtlas {
    /// Maps a scan texture coordinate into this atlas.
    ///
    /// `u' = (u - min_u) / (max_u - min_u)` and
    /// `v' = (v - min_v) / (max_v - min_v) / 2`, plus `0.5` for the front
    /// scan. A zero-width box maps to 0 along that axis.
    #[must_use]
    pub fn remap_uv(&self, uv: Point2<f64>, front: bool) -> Point2<f64> {
        remap_uv(
            if front { &self.front_bounds } else { &self.back_bounds },
            uv,
            front,
        )
    }

    /// Width of the joined image.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the joined image.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encodes the joined image as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Encode`] if the encoder fails.
    pub fn to_png_bytes(&self) -> AtlasResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| AtlasError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

/// Maps `uv` into the front (lower) or back (upper) half of an atlas cut
/// from `bounds`.
#[must_use]
pub fn remap_uv(bounds: &UvBounds, uv: Point2<f64>, front: bool) -> Point2<f64> {
    let scale = |c: f64, min: f64, max: f64| {
        let span = max - min;
        if span.abs() > f64::EPSILON { (c - min) / span } else { 0.0 }
    };
    let u = scale(uv.x, bounds.min_u, bounds.max_u);
    let v = scale(uv.y, bounds.min_v, bounds.max_v) / 2.0;
    Point2::new(u, if front { v + 0.5 } else { v })
}

/// Remaps every vertex UV of `mesh` into `atlas`.
///
/// Vertices below `front_vertex_count` come from the front scan, the rest
/// from the back scan.
pub fn remap_mesh_uvs(atlas: &RegionAtlas, mesh: &mut IndexedMesh, front_vertex_count: usize) {
    for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
        vertex.uv = atlas.remap_uv(vertex.uv, i < front_vertex_count);
    }
}

/// Stacks `back` over `front`, resizing `back` to the front's size.
#[must_use]
pub fn join_halves(front: &RgbaImage, back: &RgbaImage) -> RgbaImage {
    let (width, height) = front.dimensions();
    let back = if back.dimensions() == (width, height) {
        back.clone()
    } else {
        imageops::resize(back, width, height, imageops::FilterType::Triangle)
    };

    let mut joined = RgbaImage::new(width, height * 2);
    imageops::replace(&mut joined, &back, 0, 0);
    imageops::replace(&mut joined, front, 0, i64::from(height));
    joined
}

/// One atlas per texture region, in region order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAtlas {
    /// Region atlases indexed by [`TextureRegion::index`].
    pub regions: Vec<RegionAtlas>,
}

impl TextureAtlas {
    /// Atlas of `region`.
    #[must_use]
    pub fn region(&self, region: TextureRegion) -> &RegionAtlas {
        &self.regions[region.index()]
    }

    /// Regions whose crops held no colour at all.
    pub fn blank_regions(&self) -> impl Iterator<Item = TextureRegion> + '_ {
        self.regions.iter().filter(|r| !r.has_colour).map(|r| r.region)
    }
}

/// Builds the atlas of every texture region.
///
/// For each region the texture footprints of its POIs bound a crop in each
/// scan texture. Masked pixels are painted background, the background is
/// extrapolated away from the body, and the two crops are joined.
///
/// # Errors
///
/// Returns [`AtlasError::InvalidInterval`] for a zero pixel interval.
pub fn build_atlas(
    front: &ScanTexture,
    front_scan: &SegmentedScan,
    back: &ScanTexture,
    back_scan: &SegmentedScan,
    params: &AtlasParams,
) -> AtlasResult<TextureAtlas> {
    if params.pixel_interval == 0 {
        return Err(AtlasError::InvalidInterval);
    }

    let front_masked = front.masked_image(params.background);
    let back_masked = back.masked_image(params.background);
    let build = |region: &TextureRegion| {
        let (front_crop, front_pixels, front_colour) =
            region_crop(&front_masked, front_scan, *region, params);
        let (back_crop, back_pixels, back_colour) =
            region_crop(&back_masked, back_scan, *region, params);
        if !front_colour && !back_colour {
            warn!(region = region.name(), "Region crops are all background");
        }
        RegionAtlas {
            region: *region,
            image: join_halves(&front_crop, &back_crop),
            front_bounds: front_pixels.to_uv(front.width(), front.height()),
            back_bounds: back_pixels.to_uv(back.width(), back.height()),
            front_pixels,
            back_pixels,
            has_colour: front_colour || back_colour,
        }
    };

    let regions: Vec<RegionAtlas> = if params.parallel {
        TextureRegion::ALL.par_iter().map(build).collect()
    } else {
        TextureRegion::ALL.iter().map(build).collect()
    };

    let atlas = TextureAtlas { regions };
    info!(
        regions = atlas.regions.len(),
        blank = atlas.blank_regions().count(),
        "Texture atlas built"
    );
    Ok(atlas)
}

fn region_crop(
    masked: &RgbaImage,
    scan: &SegmentedScan,
    region: TextureRegion,
    params: &AtlasParams,
) -> (RgbaImage, PixelBounds, bool) {
    let (width, height) = masked.dimensions();
    let uv = UvBounds::from_uvs(scan.region_uvs(region));
    let pixels = PixelBounds::from_uv(&uv, width, height, params.pixel_interval);
    let mut crop = imageops::crop_imm(
        masked,
        pixels.min_x,
        pixels.min_y,
        pixels.width(),
        pixels.height(),
    )
    .to_image();

    let has_colour = crop.pixels().any(|p| *p != params.background);
    if has_colour {
        extrapolate_background(&mut crop, params.background, params.extrapolation_iterations);
    }
    debug!(region = region.name(), ?pixels, has_colour, "Region crop");
    (crop, pixels, has_colour)
}
