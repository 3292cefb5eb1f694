//! Body-mask denoising.
//!
//! Scan masks are noisy at the silhouette and often carry small islands of
//! background that the depth camera mistook for the body. Denoising runs a
//! sequence of morphological passes and then keeps only the largest connected
//! region:
//!
//! - **Erode** - drops unmasked cells with too few unmasked neighbours
//! - **Dilate** - restores eroded cells that still touch the body
//! - **Regions** - 8-connected labelling and largest-region selection
//!
//! # Quick Start
//!
//! ```
//! use mesh_scan::denoise::{denoise_mask, MaskDenoiseParams};
//! use mesh_scan::mask::{MaskValue, RasterMask};
//!
//! let mut mask = RasterMask::filled(8, 8, MaskValue::Masked);
//! for y in 2..6 {
//!     for x in 2..6 {
//!         mask.set(x, y, MaskValue::Unmasked);
//!     }
//! }
//! mask.set(7, 7, MaskValue::Unmasked); // speckle
//!
//! let result = denoise_mask(&mut mask, &MaskDenoiseParams::for_body_scan());
//! assert!(!mask.is_unmasked(7, 7));
//! println!("{}", result);
//! ```

pub mod morphology;
pub mod regions;

pub use morphology::{dilate, erode};
pub use regions::{RegionLabels, keep_largest_region, label_regions};

use tracing::debug;

use crate::mask::RasterMask;

/// Parameters for mask denoising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskDenoiseParams {
    /// Alternating pass factors: even positions erode, odd positions dilate.
    ///
    /// Default: `[8]`.
    pub passes: Vec<u32>,

    /// How many times each erode pass is repeated on a colour mask.
    /// Default: 6.
    pub colour_erode_repeats: u32,
}

impl Default for MaskDenoiseParams {
    fn default() -> Self {
        Self {
            passes: vec![8],
            colour_erode_repeats: 6,
        }
    }
}

impl MaskDenoiseParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single strict erode pass, as used for full-body scans.
    #[must_use]
    pub fn for_body_scan() -> Self {
        Self::default()
    }

    /// Two erode/dilate rounds with a permissive factor.
    #[must_use]
    pub fn gentle() -> Self {
        Self {
            passes: vec![4, 4, 4, 4],
            colour_erode_repeats: 2,
        }
    }

    /// No morphological passes; only largest-region selection runs.
    #[must_use]
    pub fn none() -> Self {
        Self {
            passes: Vec::new(),
            colour_erode_repeats: 1,
        }
    }

    /// Sets the pass sequence.
    #[must_use]
    pub fn with_passes(mut self, passes: Vec<u32>) -> Self {
        self.passes = passes;
        self
    }

    /// Sets the colour-mask erode repeat count.
    #[must_use]
    pub const fn with_colour_erode_repeats(mut self, repeats: u32) -> Self {
        self.colour_erode_repeats = repeats;
        self
    }
}

/// Result of mask denoising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskDenoiseResult {
    /// Unmasked cells before denoising.
    pub unmasked_before: usize,
    /// Unmasked cells after denoising.
    pub unmasked_after: usize,
    /// Number of regions found before keeping the largest.
    pub region_count: usize,
    /// Erode passes applied (repeats included).
    pub erode_passes: usize,
    /// Dilate passes applied.
    pub dilate_passes: usize,
}

impl MaskDenoiseResult {
    /// Number of cells that were masked out.
    #[must_use]
    pub const fn removed(&self) -> usize {
        self.unmasked_before.saturating_sub(self.unmasked_after)
    }

    /// True if nothing survived.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.unmasked_after == 0
    }
}

impl std::fmt::Display for MaskDenoiseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mask denoise: {} -> {} cells ({} erode, {} dilate, {} regions)",
            self.unmasked_before,
            self.unmasked_after,
            self.erode_passes,
            self.dilate_passes,
            self.region_count
        )
    }
}

fn run_passes(mask: &mut RasterMask, passes: &[u32], erode_repeats: u32) -> MaskDenoiseResult {
    let unmasked_before = mask.unmasked_count();
    let mut erode_passes = 0;
    let mut dilate_passes = 0;

    for (i, &factor) in passes.iter().enumerate() {
        if i % 2 == 0 {
            for _ in 0..erode_repeats.max(1) {
                erode(mask, factor);
                erode_passes += 1;
            }
        } else {
            dilate(mask, factor);
            dilate_passes += 1;
        }
    }

    let region_count = label_regions(mask).region_count;
    let unmasked_after = keep_largest_region(mask);
    if unmasked_after == 0 {
        debug!("mask denoise left no unmasked cells");
    }

    MaskDenoiseResult {
        unmasked_before,
        unmasked_after,
        region_count,
        erode_passes,
        dilate_passes,
    }
}

/// Denoises a body mask in place.
///
/// Runs the erode/dilate sequence from `params.passes` and keeps the
/// largest 8-connected region. The output is always binary. An all-masked
/// input stays all-masked.
pub fn denoise_mask(mask: &mut RasterMask, params: &MaskDenoiseParams) -> MaskDenoiseResult {
    let result = run_passes(mask, &params.passes, 1);
    debug!(%result, "body mask denoised");
    result
}

/// Denoises a colour-raster mask in place.
///
/// Identical to [`denoise_mask`] except each erode pass is repeated
/// `params.colour_erode_repeats` times; colour silhouettes carry a wider
/// fringe than depth silhouettes.
pub fn denoise_colour_mask(mask: &mut RasterMask, params: &MaskDenoiseParams) -> MaskDenoiseResult {
    let result = run_passes(mask, &params.passes, params.colour_erode_repeats);
    debug!(%result, "colour mask denoised");
    result
}
