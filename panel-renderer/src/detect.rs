//! Rough wall-area detection.
//!
//! Finds the bounding box of strong edges in the photo, which on a typical
//! wall shot outlines the wall itself. Meant as a visual hint for the user,
//! not as input to the layout math.

use image::imageops;
use image::{DynamicImage, GrayImage, Rgb, RgbImage};

use crate::error::RenderResult;
use crate::image::decode_photo;

/// Edge strength above which a pixel counts as an edge.
pub const EDGE_THRESHOLD: u8 = 40;

/// Width of the outline drawn around the detected area, in pixels.
pub const OUTLINE_WIDTH: u32 = 3;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Laplacian-style kernel: center minus its eight neighbours.
const EDGE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Detected wall rectangle in photo pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallBounds {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Detection result.
#[derive(Debug, Clone)]
pub struct WallDetection {
    /// Bounding box of the edge pixels.
    pub bounds: WallBounds,
    /// The photo with the bounds outlined in red.
    pub outlined: RgbImage,
}

/// Decode `photo` and detect the wall area.
///
/// Returns `None` when the photo has no edges at all.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedImageFormat`](crate::RenderError::UnsupportedImageFormat)
/// if the photo cannot be decoded.
pub fn detect_wall(photo: &[u8]) -> RenderResult<Option<WallDetection>> {
    let image = DynamicImage::ImageRgba8(decode_photo(photo)?);
    Ok(detect_wall_in(&image))
}

/// Detect the wall area in an already decoded image.
#[must_use]
pub fn detect_wall_in(image: &DynamicImage) -> Option<WallDetection> {
    let edges: GrayImage = imageops::filter3x3(&image.to_luma8(), &EDGE_KERNEL);
    let bounds = edge_bounds(&edges)?;
    tracing::debug!(
        "Detected wall at ({}, {}) {}x{}",
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height
    );

    let mut outlined = image.to_rgb8();
    draw_outline(&mut outlined, bounds);
    Some(WallDetection { bounds, outlined })
}

fn edge_bounds(edges: &GrayImage) -> Option<WallBounds> {
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut found = false;

    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel.0[0] > EDGE_THRESHOLD {
            found = true;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
    }

    found.then(|| WallBounds {
        x: min.0,
        y: min.1,
        width: max.0 - min.0 + 1,
        height: max.1 - min.1 + 1,
    })
}

/// Draw a red frame just inside `bounds`.
fn draw_outline(image: &mut RgbImage, bounds: WallBounds) {
    let right = bounds.x + bounds.width;
    let bottom = bounds.y + bounds.height;
    for y in bounds.y..bottom.min(image.height()) {
        for x in bounds.x..right.min(image.width()) {
            let near_edge = x < bounds.x + OUTLINE_WIDTH
                || y < bounds.y + OUTLINE_WIDTH
                || x + OUTLINE_WIDTH >= right
                || y + OUTLINE_WIDTH >= bottom;
            if near_edge {
                image.put_pixel(x, y, OUTLINE_COLOR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn photo_with_block() -> DynamicImage {
        let mut img = RgbaImage::from_pixel(60, 40, Rgba([30, 30, 30, 255]));
        for y in 10..30 {
            for x in 15..45 {
                img.put_pixel(x, y, Rgba([220, 220, 220, 255]));
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_flat_photo_has_no_wall() {
        let flat = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([90, 90, 90, 255])));
        assert!(detect_wall_in(&flat).is_none());
    }

    #[test]
    fn test_block_edges_are_found() {
        let detection = detect_wall_in(&photo_with_block()).expect("edges");
        let b = detection.bounds;
        // Edge response spreads one pixel either side of the block border.
        assert!(b.x >= 14 && b.x <= 15, "x = {}", b.x);
        assert!(b.y >= 9 && b.y <= 10, "y = {}", b.y);
        assert!(b.x + b.width >= 45 && b.x + b.width <= 46);
        assert!(b.y + b.height >= 30 && b.y + b.height <= 31);
    }

    #[test]
    fn test_outline_is_drawn() {
        let detection = detect_wall_in(&photo_with_block()).expect("edges");
        let b = detection.bounds;
        let out = &detection.outlined;
        assert_eq!(out.dimensions(), (60, 40));
        assert_eq!(*out.get_pixel(b.x, b.y), OUTLINE_COLOR);
        assert_eq!(*out.get_pixel(b.x + 2, b.y + b.height / 2), OUTLINE_COLOR);
        assert_ne!(*out.get_pixel(b.x + b.width / 2, b.y + b.height / 2), OUTLINE_COLOR);
        assert_eq!(out.get_pixel(0, 0).0, [30, 30, 30]);
    }

    #[test]
    fn test_detect_from_bytes_rejects_garbage() {
        assert!(detect_wall(b"nope").is_err());
    }
}
