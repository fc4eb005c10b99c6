//! Raster primitives shared by the export compositor and the raster preview.
//!
//! A panel is rendered in three steps: fill the bounding box with its
//! material, mask it to its shape, rotate it about its center on an expanded
//! canvas. With depth enabled the face is highlighted before masking and
//! framed by its shaded sides before rotating. The result is then
//! alpha-blended so its center lands on the panel's center.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use panel_core::geometry::{rotated_extent, rotation_sin_cos, shape_contains};
use panel_core::{Depth, FillMode, PanelGeometry, Point, Shape, Size};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Fill the panel's bounding box with `texture` according to `fill`.
///
/// The output has the geometry's whole-pixel size. Tiles repeat at their
/// exact fractional period; the texture is resampled once to at most the
/// panel's size and looked up per pixel.
#[must_use]
pub fn fill_panel(
    texture: &RgbaImage,
    geometry: &PanelGeometry,
    fill: FillMode,
    filter: FilterType,
) -> RgbaImage {
    let (width, height) = geometry.size.to_pixels();
    match fill {
        FillMode::Stretch => imageops::resize(texture, width, height, filter),
        FillMode::Tile { .. } => {
            let period = geometry.tile_size(fill, texture.dimensions());
            let (tile_w, tile_h) = period.to_pixels();
            let tile = imageops::resize(texture, tile_w.min(width), tile_h.min(height), filter);
            let (res_w, res_h) = tile.dimensions();
            RgbaImage::from_fn(width, height, |x, y| {
                *tile.get_pixel(
                    tile_texel(x, period.width, res_w),
                    tile_texel(y, period.height, res_h),
                )
            })
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tile_texel(pos: u32, period: f64, resolution: u32) -> u32 {
    let phase = (f64::from(pos) + 0.5).rem_euclid(period) / period;
    ((phase * f64::from(resolution)) as u32).min(resolution - 1)
}

/// Lighten the face towards white from the top-left.
///
/// Rectangles fade along the diagonal, circles radially from the center.
pub fn apply_highlight(image: &mut RgbaImage, shape: Shape, depth: Depth) {
    let (width, height) = image.dimensions();
    let (w, h) = (f64::from(width), f64::from(height));
    let diagonal = w * w + h * h;
    let radius = w.max(h) / 2.0;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let px = f64::from(x) + 0.5;
        let py = f64::from(y) + 0.5;
        let alpha = match shape {
            Shape::Rectangle => depth.linear_highlight_alpha((px * w + py * h) / diagonal),
            Shape::Circle => {
                let (dx, dy) = (px - w / 2.0, py - h / 2.0);
                depth.radial_highlight_alpha((dx * dx + dy * dy).sqrt() / radius)
            }
        };
        lighten(pixel, alpha);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lighten(pixel: &mut Rgba<u8>, alpha: f64) {
    for channel in &mut pixel.0[..3] {
        let value = f64::from(*channel) * (1.0 - alpha) + 255.0 * alpha;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
}

/// Frame `face` with shaded sides `thickness` pixels wide along its right
/// and bottom edges.
///
/// The canvas is padded by `thickness` on every edge so the face stays
/// centred; the top and left padding is transparent.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn add_sides(face: &RgbaImage, thickness: u32, depth: Depth) -> RgbaImage {
    let (width, height) = face.dimensions();
    let mut body = RgbaImage::new(width + 2 * thickness, height + 2 * thickness);
    imageops::replace(&mut body, face, i64::from(thickness), i64::from(thickness));

    for i in 0..thickness {
        let t = (f64::from(i) + 0.5) / f64::from(thickness);
        let shade = Rgba([0, 0, 0, (depth.side_alpha(t) * 255.0).round() as u8]);
        for y in 0..height {
            body.put_pixel(thickness + width + i, thickness + y, shade);
        }
        for x in 0..width {
            body.put_pixel(thickness + x, thickness + height + i, shade);
        }
    }
    body
}

/// Make every pixel outside `shape` fully transparent.
///
/// Pixels are tested at their centers. Rectangles are left untouched.
pub fn apply_shape_mask(image: &mut RgbaImage, shape: Shape) {
    if shape == Shape::Rectangle {
        return;
    }
    let (width, height) = image.dimensions();
    let size = Size::new(f64::from(width), f64::from(height));
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - size.width / 2.0;
        let dy = f64::from(y) + 0.5 - size.height / 2.0;
        if !shape_contains(shape, size, dx, dy) {
            *pixel = TRANSPARENT;
        }
    }
}

/// Rotate clockwise about the center onto a canvas large enough to hold
/// every corner. Padding is transparent.
///
/// Quarter turns are exact pixel permutations; other angles are resampled
/// bilinearly.
#[must_use]
pub fn rotate_expand(image: &RgbaImage, rotation_deg: u16) -> RgbaImage {
    match rotation_deg % 360 {
        0 => image.clone(),
        90 => imageops::rotate90(image),
        180 => imageops::rotate180(image),
        270 => imageops::rotate270(image),
        deg => rotate_arbitrary(image, deg),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rotate_arbitrary(image: &RgbaImage, rotation_deg: u16) -> RgbaImage {
    let (width, height) = image.dimensions();
    let src_size = Size::new(f64::from(width), f64::from(height));
    let extent = rotated_extent(src_size, rotation_deg);
    let out_w = extent.width.ceil().max(1.0) as u32;
    let out_h = extent.height.ceil().max(1.0) as u32;

    let (sin, cos) = rotation_sin_cos(rotation_deg);
    let out_cx = f64::from(out_w) / 2.0;
    let out_cy = f64::from(out_h) / 2.0;
    let src_cx = src_size.width / 2.0;
    let src_cy = src_size.height / 2.0;

    RgbaImage::from_fn(out_w, out_h, |x, y| {
        let dx = f64::from(x) + 0.5 - out_cx;
        let dy = f64::from(y) + 0.5 - out_cy;
        // Inverse of the clockwise rotation.
        let sx = dx * cos + dy * sin + src_cx - 0.5;
        let sy = -dx * sin + dy * cos + src_cy - 0.5;
        sample_bilinear(image, sx, sy)
    })
}

/// Bilinear sample with premultiplied alpha; outside the image is transparent.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (width, height) = image.dimensions();
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let fetch = |px: f64, py: f64| -> [f64; 4] {
        if px < 0.0 || py < 0.0 || px >= f64::from(width) || py >= f64::from(height) {
            return [0.0; 4];
        }
        let p = image.get_pixel(px as u32, py as u32).0;
        let a = f64::from(p[3]) / 255.0;
        [
            f64::from(p[0]) * a,
            f64::from(p[1]) * a,
            f64::from(p[2]) * a,
            a,
        ]
    };

    let taps = [
        (fetch(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (fetch(x0 + 1.0, y0), fx * (1.0 - fy)),
        (fetch(x0, y0 + 1.0), (1.0 - fx) * fy),
        (fetch(x0 + 1.0, y0 + 1.0), fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (sample, weight) in taps {
        for (channel, value) in acc.iter_mut().zip(sample) {
            *channel += value * weight;
        }
    }

    let alpha = acc[3];
    if alpha <= f64::EPSILON {
        return TRANSPARENT;
    }
    let to_u8 = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Rgba([
        to_u8(acc[0] / alpha),
        to_u8(acc[1] / alpha),
        to_u8(acc[2] / alpha),
        to_u8(alpha * 255.0),
    ])
}

/// Fill, mask and rotate one panel, with its depth effects when `depth` is
/// set.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_panel(
    texture: &RgbaImage,
    geometry: &PanelGeometry,
    fill: FillMode,
    filter: FilterType,
    depth: Option<Depth>,
) -> RgbaImage {
    let mut face = fill_panel(texture, geometry, fill, filter);
    if let Some(depth) = depth {
        apply_highlight(&mut face, geometry.shape, depth);
    }
    apply_shape_mask(&mut face, geometry.shape);

    let thickness = geometry.side_thickness(depth).round() as u32;
    let body = match depth {
        Some(depth) if thickness > 0 => add_sides(&face, thickness, depth),
        _ => face,
    };
    rotate_expand(&body, geometry.rotation_deg)
}

/// Where a rendered panel image goes so its center sits on the panel center.
#[must_use]
pub fn placement(geometry: &PanelGeometry, rendered: &RgbaImage) -> Point {
    let (w, h) = rendered.dimensions();
    geometry.placement_for(Size::new(f64::from(w), f64::from(h)))
}

/// Alpha-blend a rendered panel onto `base` at its placement.
#[allow(clippy::cast_possible_truncation)]
pub fn composite_panel(base: &mut RgbaImage, geometry: &PanelGeometry, rendered: &RgbaImage) {
    let top_left = placement(geometry, rendered);
    imageops::overlay(
        base,
        rendered,
        top_left.x.round() as i64,
        top_left.y.round() as i64,
    );
}
