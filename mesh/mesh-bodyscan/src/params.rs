//! Session parameters.

use mesh_atlas::AtlasParams;
use mesh_region::SegmentParams;
use mesh_scan::MaskDenoiseParams;
use mesh_stitch::StitchParams;

/// Parameters for every stage of a body-scan session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyScanParams {
    /// Body and colour mask denoising.
    pub denoise: MaskDenoiseParams,
    /// Nearest-POI segmentation.
    pub segment: SegmentParams,
    /// Front/back stitching.
    pub stitch: StitchParams,
    /// Texture atlas building.
    pub atlas: AtlasParams,
}

impl BodyScanParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings used for full-body captures.
    #[must_use]
    pub fn for_body_scan() -> Self {
        Self {
            denoise: MaskDenoiseParams::for_body_scan(),
            ..Self::default()
        }
    }

    /// Everything on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default().with_parallel(false)
    }

    /// Sets the mask denoising parameters.
    #[must_use]
    pub fn with_denoise(mut self, denoise: MaskDenoiseParams) -> Self {
        self.denoise = denoise;
        self
    }

    /// Sets the stitching parameters.
    #[must_use]
    pub fn with_stitch(mut self, stitch: StitchParams) -> Self {
        self.stitch = stitch;
        self
    }

    /// Sets the atlas parameters.
    #[must_use]
    pub fn with_atlas(mut self, atlas: AtlasParams) -> Self {
        self.atlas = atlas;
        self
    }

    /// Turns rayon on or off for every stage that supports it.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.segment = self.segment.with_parallel(parallel);
        self.stitch = self.stitch.with_parallel(parallel);
        self.atlas = self.atlas.with_parallel(parallel);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let params = BodyScanParams::for_body_scan();
        assert_eq!(params.denoise.passes, vec![8]);
        assert_eq!(params.stitch.smoothing_iterations, 3);
        assert_eq!(params.atlas.pixel_interval, 30);

        let seq = BodyScanParams::sequential();
        assert!(!seq.segment.parallel);
        assert!(!seq.stitch.parallel);
        assert!(!seq.atlas.parallel);
    }
}
