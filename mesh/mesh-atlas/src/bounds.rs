//! Texture-coordinate and pixel bounding boxes.

use mesh_types::Point2;

/// Bounding box in texture-coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvBounds {
    /// Smallest U.
    pub min_u: f64,
    /// Largest U.
    pub max_u: f64,
    /// Smallest V.
    pub min_v: f64,
    /// Largest V.
    pub max_v: f64,
}

impl Default for UvBounds {
    fn default() -> Self {
        Self::FULL
    }
}

impl UvBounds {
    /// The whole texture.
    pub const FULL: Self = Self {
        min_u: 0.0,
        max_u: 1.0,
        min_v: 0.0,
        max_v: 1.0,
    };

    /// Bounds of every coordinate strictly inside `(0, 1)`.
    ///
    /// Samples the camera could not map land exactly on 0 or 1 and are
    /// ignored per axis. An axis with no usable value keeps the full range.
    #[allow(clippy::float_cmp)]
    pub fn from_uvs<'a>(uvs: impl IntoIterator<Item = &'a Point2<f64>>) -> Self {
        let inside = |c: f64| c > 0.0 && c < 1.0;
        let mut min_u = 1.0_f64;
        let mut max_u = 0.0_f64;
        let mut min_v = 1.0_f64;
        let mut max_v = 0.0_f64;

        for uv in uvs {
            if inside(uv.x) {
                min_u = min_u.min(uv.x);
                max_u = max_u.max(uv.x);
            }
            if inside(uv.y) {
                min_v = min_v.min(uv.y);
                max_v = max_v.max(uv.y);
            }
        }

        // An axis that never updated falls back to its full range
        if min_u == 1.0 {
            min_u = 0.0;
        }
        if max_u == 0.0 {
            max_u = 1.0;
        }
        if min_v == 1.0 {
            min_v = 0.0;
        }
        if max_v == 0.0 {
            max_v = 1.0;
        }

        Self {
            min_u,
            max_u,
            min_v,
            max_v,
        }
    }
}

/// Bounding box in pixels: columns `min_x..max_x`, rows `min_y..max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelBounds {
    /// First column.
    pub min_x: u32,
    /// One past the last column.
    pub max_x: u32,
    /// First row.
    pub min_y: u32,
    /// One past the last row.
    pub max_y: u32,
}

impl PixelBounds {
    /// The whole of a `width` x `height` image.
    #[must_use]
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            min_x: 0,
            max_x: width,
            min_y: 0,
            max_y: height,
        }
    }

    /// Rounds `uv` outward onto a grid of `interval` pixels.
    ///
    /// The grid has `dimension / interval` cells per axis, so bounds always
    /// land on multiples of `interval` and never exceed the image. An axis
    /// that would come out empty covers the whole image instead.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_lossless
    )]
    pub fn from_uv(uv: &UvBounds, width: u32, height: u32, interval: u32) -> Self {
        let interval = interval.max(1);
        let axis = |min: f64, max: f64, dimension: u32| -> (u32, u32) {
            let cells = f64::from(dimension / interval);
            let lo = ((min * cells).floor().max(0.0) as u32).saturating_mul(interval);
            let hi = ((max * cells).ceil().max(0.0) as u32).saturating_mul(interval);
            let (lo, hi) = (lo.min(dimension), hi.min(dimension));
            if hi > lo { (lo, hi) } else { (0, dimension) }
        };
        let (min_x, max_x) = axis(uv.min_u, uv.max_u, width);
        let (min_y, max_y) = axis(uv.min_v, uv.max_v, height);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    /// The same box as a fraction of a `width` x `height` texture.
    #[must_use]
    pub fn to_uv(&self, width: u32, height: u32) -> UvBounds {
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
        UvBounds {
            min_u: f64::from(self.min_x) / w,
            max_u: f64::from(self.max_x) / w,
            min_v: f64::from(self.min_y) / h,
            max_v: f64::from(self.max_y) / h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uv_bounds_ignore_edges() {
        let uvs = [
            Point2::new(0.2, 0.0),
            Point2::new(0.6, 0.5),
            Point2::new(1.0, 0.3),
            Point2::new(0.4, 1.0),
        ];
        let b = UvBounds::from_uvs(&uvs);
        assert_relative_eq!(b.min_u, 0.2);
        assert_relative_eq!(b.max_u, 0.6);
        assert_relative_eq!(b.min_v, 0.3);
        assert_relative_eq!(b.max_v, 0.5);
    }

    #[test]
    fn test_uv_bounds_defaults() {
        assert_eq!(UvBounds::from_uvs(std::iter::empty()), UvBounds::FULL);
        let only_edges = [Point2::new(0.0, 1.0), Point2::new(1.0, 0.0)];
        assert_eq!(UvBounds::from_uvs(&only_edges), UvBounds::FULL);
    }

    #[test]
    fn test_pixel_bounds_round_outward() {
        let uv = UvBounds {
            min_u: 0.26,
            max_u: 0.51,
            min_v: 0.1,
            max_v: 0.9,
        };
        // 300 px wide: 10 cells of 30 px
        let px = PixelBounds::from_uv(&uv, 300, 120, 30);
        assert_eq!(px.min_x, 60);
        assert_eq!(px.max_x, 180);
        // 120 px tall: 4 cells
        assert_eq!(px.min_y, 0);
        assert_eq!(px.max_y, 120);
        assert_eq!(px.width(), 120);
    }

    #[test]
    fn test_pixel_bounds_clamped_and_non_empty() {
        // Narrower than one interval: no grid cells at all
        let px = PixelBounds::from_uv(&UvBounds::FULL, 20, 20, 30);
        assert_eq!(px, PixelBounds::full(20, 20));

        let exact = UvBounds {
            min_u: 0.5,
            max_u: 0.5,
            min_v: 0.0,
            max_v: 1.0,
        };
        let px = PixelBounds::from_uv(&exact, 60, 60, 30);
        assert_eq!((px.min_x, px.max_x), (0, 60));
    }

    #[test]
    fn test_to_uv() {
        let px = PixelBounds {
            min_x: 30,
            max_x: 90,
            min_y: 0,
            max_y: 60,
        };
        let uv = px.to_uv(120, 60);
        assert_relative_eq!(uv.min_u, 0.25);
        assert_relative_eq!(uv.max_u, 0.75);
        assert_relative_eq!(uv.max_v, 1.0);
    }
}
