//! Captures handed over by the capture layer.

use mesh_atlas::ScanTexture;
use mesh_region::Skeleton;
use mesh_scan::{DepthLattice, RasterMask};

use crate::error::SessionResult;

/// One timestamped capture: depth lattice, colour texture and skeleton.
///
/// Snapshots belong to the capture layer. A session copies what it needs
/// and never changes the snapshot itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSnapshot {
    /// Capture time key.
    pub timestamp: u64,
    /// Depth samples.
    pub lattice: DepthLattice,
    /// Body mask over the lattice, before denoising.
    pub body_mask: RasterMask,
    /// Colour raster and colour mask.
    pub texture: ScanTexture,
    /// Tracked skeleton, if the tracker found a body.
    pub skeleton: Option<Skeleton>,
}

impl ScanSnapshot {
    /// Bundles a capture, taking the body mask from the lattice's body flags.
    #[must_use]
    pub fn new(
        timestamp: u64,
        lattice: DepthLattice,
        texture: ScanTexture,
        skeleton: Option<Skeleton>,
    ) -> Self {
        let body_mask = lattice.body_mask();
        Self {
            timestamp,
            lattice,
            body_mask,
            texture,
            skeleton,
        }
    }

    /// Replaces the body mask with one computed elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`mesh_scan::ScanError::ShapeMismatch`] (wrapped) if the
    /// mask does not match the lattice.
    pub fn with_body_mask(mut self, mask: RasterMask) -> SessionResult<Self> {
        mask.check_dimensions("body mask", self.lattice.dimensions())?;
        self.body_mask = mask;
        Ok(self)
    }

    /// Lattice `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        self.lattice.dimensions()
    }
}
