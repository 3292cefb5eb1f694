//! Colour rasters captured alongside a depth scan.
//!
//! Pixel `(x, y)` corresponds to texture coordinate
//! `(x / width, y / height)`: columns follow U and rows follow V.

use image::{Rgba, RgbaImage, imageops};
use mesh_scan::{MaskDenoiseParams, MaskDenoiseResult, RasterMask, denoise_colour_mask};

use crate::error::{AtlasError, AtlasResult};

/// Colour written over masked-out pixels: opaque green.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// An RGBA colour raster and its body mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTexture {
    image: RgbaImage,
    mask: RasterMask,
}

impl ScanTexture {
    /// Pairs a raster with its mask.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::EmptyTexture`] for a zero-sized raster and
    /// [`AtlasError::ShapeMismatch`] if the mask has different dimensions.
    pub fn new(image: RgbaImage, mask: RasterMask) -> AtlasResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AtlasError::EmptyTexture);
        }
        let expected = (image.width() as usize, image.height() as usize);
        if mask.dimensions() != expected {
            return Err(AtlasError::ShapeMismatch {
                what: "colour mask",
                expected,
                actual: mask.dimensions(),
            });
        }
        Ok(Self { image, mask })
    }

    /// Builds a texture from row-major RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::PixelBufferSize`] if `rgba` is not
    /// `width * height * 4` bytes, plus the errors of [`ScanTexture::new`].
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>, mask: RasterMask) -> AtlasResult<Self> {
        let actual = rgba.len();
        let image = RgbaImage::from_raw(width, height, rgba).ok_or(AtlasError::PixelBufferSize {
            width,
            height,
            actual,
        })?;
        Self::new(image, mask)
    }

    /// An unmasked texture filled with one colour.
    #[must_use]
    pub fn solid(width: u32, height: u32, colour: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, colour),
            mask: RasterMask::filled(
                width as usize,
                height as usize,
                mesh_scan::MaskValue::Unmasked,
            ),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The raw colour raster.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The colour mask.
    #[must_use]
    pub const fn mask(&self) -> &RasterMask {
        &self.mask
    }

    /// Mutable colour mask.
    pub fn mask_mut(&mut self) -> &mut RasterMask {
        &mut self.mask
    }

    /// Denoises the colour mask with the colour-specific erode repeats.
    pub fn denoise_mask(&mut self, params: &MaskDenoiseParams) -> MaskDenoiseResult {
        denoise_colour_mask(&mut self.mask, params)
    }

    /// Copy of the raster with every pixel outside the body painted
    /// `background`.
    #[must_use]
    pub fn masked_image(&self, background: Rgba<u8>) -> RgbaImage {
        let mut out = self.image.clone();
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            if !self.mask.is_unmasked(x as usize, y as usize) {
                *pixel = background;
            }
        }
        out
    }

    /// The same capture seen from the other side: raster and mask turned
    /// 180 degrees.
    #[must_use]
    pub fn rotated_180(&self) -> Self {
        Self {
            image: imageops::rotate180(&self.image),
            mask: self.mask.rotated_180(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_scan::MaskValue;

    fn checker() -> ScanTexture {
        let image = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 10, y as u8 * 10, 0, 255]));
        let mut mask = RasterMask::filled(3, 2, MaskValue::Unmasked);
        mask.set(0, 0, MaskValue::Masked);
        mask.set(2, 1, MaskValue::Eroded);
        ScanTexture::new(image, mask).unwrap()
    }

    #[test]
    fn test_shape_checked() {
        let image = RgbaImage::new(3, 2);
        let mask = RasterMask::filled(2, 2, MaskValue::Unmasked);
        assert!(matches!(
            ScanTexture::new(image, mask),
            Err(AtlasError::ShapeMismatch { .. })
        ));
        assert_eq!(
            ScanTexture::new(RgbaImage::new(0, 0), RasterMask::filled(0, 0, MaskValue::Masked)),
            Err(AtlasError::EmptyTexture)
        );
    }

    #[test]
    fn test_from_rgba() {
        let mask = RasterMask::filled(2, 1, MaskValue::Unmasked);
        let tex = ScanTexture::from_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8], mask.clone()).unwrap();
        assert_eq!(tex.image().get_pixel(1, 0), &Rgba([5, 6, 7, 8]));
        assert!(matches!(
            ScanTexture::from_rgba(2, 1, vec![0; 7], mask),
            Err(AtlasError::PixelBufferSize { actual: 7, .. })
        ));
    }

    #[test]
    fn test_masked_image() {
        let masked = checker().masked_image(BACKGROUND);
        assert_eq!(masked.get_pixel(0, 0), &BACKGROUND);
        assert_eq!(masked.get_pixel(2, 1), &BACKGROUND);
        assert_eq!(masked.get_pixel(1, 1), &Rgba([10, 10, 0, 255]));
    }

    #[test]
    fn test_rotated_180() {
        let tex = checker().rotated_180();
        assert_eq!(tex.image().get_pixel(0, 0), &Rgba([20, 10, 0, 255]));
        assert_eq!(tex.mask().get(2, 1), Some(MaskValue::Masked));
        assert_eq!(tex.mask().get(0, 0), Some(MaskValue::Eroded));
    }
}
