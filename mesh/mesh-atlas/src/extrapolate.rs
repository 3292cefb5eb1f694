//! Background extrapolation for texture crops.
//!
//! A crop around a body part contains background (masked) pixels around
//! the silhouette. Texture filtering near a seam would bleed that colour
//! into the mesh, so background pixels are replaced by a weighted average
//! of their non-background neighbours, growing outward from the centre of
//! the crop.

use image::{Rgba, RgbaImage};

/// How often each neighbour direction is counted when averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighbourWeights {
    /// Pixels directly above and below.
    pub vertical: u32,
    /// Pixels directly left and right.
    pub horizontal: u32,
    /// The four diagonal pixels.
    pub diagonal: u32,
}

impl NeighbourWeights {
    /// Weights for a crop taller than it is wide.
    pub const TALL: Self = Self {
        vertical: 4,
        horizontal: 2,
        diagonal: 1,
    };

    /// Weights for a crop at least as wide as it is tall.
    pub const WIDE: Self = Self {
        vertical: 4,
        horizontal: 0,
        diagonal: 1,
    };

    /// Weights suited to an image of the given size.
    #[must_use]
    pub const fn for_size(width: u32, height: u32) -> Self {
        if height > width { Self::TALL } else { Self::WIDE }
    }
}

/// Replaces `background` pixels with averages of their neighbours.
///
/// Each iteration first grows square rings outward from the centre until
/// the shorter side is covered, then sweeps the remaining rows (tall
/// images) or columns (wide images) toward both edges, each line filled
/// centre-out. A background pixel with no non-background neighbour keeps
/// its colour. Updates are in place, so filled pixels feed later ones.
pub fn extrapolate_background(image: &mut RgbaImage, background: Rgba<u8>, iterations: usize) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let weights = NeighbourWeights::for_size(width, height);
    let tall = height > width;

    for _ in 0..iterations {
        // Rings grow until they span the short side
        let rings = if tall { width - width / 2 } else { height - height / 2 };
        for s in 1..=rings {
            for (x, y) in square_ring(width, height, s) {
                fill_pixel(image, x, y, background, weights);
            }
        }

        if tall {
            for y in (height / 2 + rings)..height {
                let mirrored = height - 1 - y;
                for x in centre_out(width) {
                    fill_pixel(image, x, y, background, weights);
                    fill_pixel(image, x, mirrored, background, weights);
                }
            }
        } else {
            for x in (width / 2 + rings)..width {
                let mirrored = width - 1 - x;
                for y in centre_out(height) {
                    fill_pixel(image, x, y, background, weights);
                    fill_pixel(image, mirrored, y, background, weights);
                }
            }
        }
    }
}

fn fill_pixel(image: &mut RgbaImage, x: u32, y: u32, background: Rgba<u8>, weights: NeighbourWeights) {
    if *image.get_pixel(x, y) == background {
        let colour = neighbour_average(image, x, y, background, weights);
        image.put_pixel(x, y, colour);
    }
}

/// Weighted mean of the non-background neighbours of `(x, y)`, or the
/// pixel itself if there are none.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn neighbour_average(
    image: &RgbaImage,
    x: u32,
    y: u32,
    background: Rgba<u8>,
    weights: NeighbourWeights,
) -> Rgba<u8> {
    let (width, height) = image.dimensions();
    let (x, y) = (i64::from(x), i64::from(y));
    let directions: [(i64, i64, u32); 8] = [
        (0, -1, weights.vertical),
        (0, 1, weights.vertical),
        (-1, 0, weights.horizontal),
        (1, 0, weights.horizontal),
        (-1, -1, weights.diagonal),
        (-1, 1, weights.diagonal),
        (1, -1, weights.diagonal),
        (1, 1, weights.diagonal),
    ];

    let mut sum = [0u64; 4];
    let mut count = 0u64;
    for (dx, dy, weight) in directions {
        let (nx, ny) = (x + dx, y + dy);
        if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
            continue;
        }
        let pixel = image.get_pixel(nx as u32, ny as u32);
        if *pixel == background {
            continue;
        }
        for (acc, &c) in sum.iter_mut().zip(pixel.0.iter()) {
            *acc += u64::from(c) * u64::from(weight);
        }
        count += u64::from(weight);
    }

    if count == 0 {
        return *image.get_pixel(x as u32, y as u32);
    }
    Rgba(sum.map(|c| ((c + count / 2) / count) as u8))
}

/// In-bounds pixels of the `s`-th square ring around the image centre.
///
/// Ring 1 is the central 2x2 block; ring `s` is the border of the
/// `2s` x `2s` square with corners `(cx - s, cy - s)` and
/// `(cx + s - 1, cy + s - 1)`, where `(cx, cy)` is the centre pixel.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn square_ring(width: u32, height: u32, s: u32) -> Vec<(u32, u32)> {
    let (s, w, h) = (i64::from(s), i64::from(width), i64::from(height));
    let (high_x, high_y) = (w / 2, h / 2);
    let (low_x, low_y) = (high_x - 1, high_y - 1);

    let mut ring = Vec::with_capacity(8 * s.max(1) as usize);
    for i in 0..s - 1 {
        ring.extend([
            (low_x - i, high_y - s),
            (high_x + i, high_y - s),
            (low_x - i, low_y + s),
            (high_x + i, low_y + s),
            (high_x - s, low_y - i),
            (high_x - s, high_y + i),
            (low_x + s, low_y - i),
            (low_x + s, high_y + i),
        ]);
    }
    ring.extend([
        (high_x - s, high_y - s),
        (high_x - s, low_y + s),
        (low_x + s, low_y + s),
        (low_x + s, high_y - s),
    ]);

    ring.into_iter()
        .filter(|&(x, y)| x >= 0 && y >= 0 && x < w && y < h)
        .map(|(x, y)| (x as u32, y as u32))
        .collect()
}

/// `0..len` ordered from the centre: `len / 2` up to the end, then
/// `len / 2 - 1` down to 0.
pub fn centre_out(len: u32) -> impl Iterator<Item = u32> {
    (len / 2..len).chain((0..len / 2).rev())
}
