//! Depth-camera sample lattices and their triangulation.

mod reconstruct;

pub use reconstruct::{LatticeMesh, reconstruct_lattice};

use mesh_types::{Point2, Point3};

use crate::error::{ScanError, ScanResult};
use crate::mask::RasterMask;

/// One depth-camera sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthSample {
    /// Camera-space position (meters).
    pub position: Point3<f64>,
    /// Texture coordinate into the colour raster.
    pub uv: Point2<f64>,
    /// True if the sensor classified this sample as part of the body.
    pub in_body: bool,
}

impl DepthSample {
    /// Create a sample.
    #[must_use]
    pub const fn new(position: Point3<f64>, uv: Point2<f64>, in_body: bool) -> Self {
        Self {
            position,
            uv,
            in_body,
        }
    }
}

/// A `width x height` grid of [`DepthSample`]s, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthLattice {
    width: usize,
    height: usize,
    samples: Vec<DepthSample>,
}

impl DepthLattice {
    /// Wrap a row-major sample buffer.
    ///
    /// # Errors
    ///
    /// [`ScanError::EmptyLattice`] for a zero dimension,
    /// [`ScanError::SizeMismatch`] if `samples.len() != width * height`.
    pub fn new(width: usize, height: usize, samples: Vec<DepthSample>) -> ScanResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScanError::EmptyLattice);
        }
        if samples.len() != width * height {
            return Err(ScanError::SizeMismatch {
                expected: width * height,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Width in samples.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in samples.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Sample at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&DepthSample> {
        if x < self.width && y < self.height {
            self.samples.get(x + y * self.width)
        } else {
            None
        }
    }

    /// All samples, row-major.
    #[must_use]
    pub fn samples(&self) -> &[DepthSample] {
        &self.samples
    }

    /// Binary mask built from the per-sample body flags.
    #[must_use]
    pub fn body_mask(&self) -> RasterMask {
        let flags: Vec<bool> = self.samples.iter().map(|s| s.in_body).collect();
        // Dimensions are validated at construction
        RasterMask::from_flags(self.width, self.height, &flags)
            .unwrap_or_else(|_| RasterMask::filled(self.width, self.height, Default::default()))
    }

    /// Mirror every texture coordinate (`uv -> 1 - uv`).
    ///
    /// Applied to back scans, whose colour raster is rotated by 180 degrees.
    pub fn mirror_uvs(&mut self) {
        for sample in &mut self.samples {
            sample.uv = Point2::new(1.0 - sample.uv.x, 1.0 - sample.uv.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lattice(width: usize, height: usize) -> DepthLattice {
        let samples = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                DepthSample::new(
                    Point3::new(x as f64, y as f64, 1.0),
                    Point2::new(x as f64 / width as f64, y as f64 / height as f64),
                    x > 0,
                )
            })
            .collect();
        DepthLattice::new(width, height, samples).unwrap()
    }

    #[test]
    fn test_new_validates_size() {
        assert_eq!(
            DepthLattice::new(0, 3, Vec::new()).unwrap_err(),
            ScanError::EmptyLattice
        );
        let err = DepthLattice::new(2, 2, vec![lattice(1, 1).samples()[0]; 3]).unwrap_err();
        assert!(matches!(err, ScanError::SizeMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_body_mask_follows_flags() {
        let l = lattice(3, 2);
        let mask = l.body_mask();
        assert_eq!(mask.dimensions(), (3, 2));
        assert!(!mask.is_unmasked(0, 1));
        assert!(mask.is_unmasked(2, 1));
        assert_eq!(mask.unmasked_count(), 4);
    }

    #[test]
    fn test_mirror_uvs() {
        let mut l = lattice(4, 2);
        l.mirror_uvs();
        let s = l.get(1, 1).unwrap();
        assert_relative_eq!(s.uv.x, 0.75);
        assert_relative_eq!(s.uv.y, 0.5);
    }
}
