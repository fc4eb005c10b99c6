//! Property tests for the raster primitives.

use panel_core::geometry::rotated_extent;
use panel_core::{Shape, Size};
use panel_renderer::image::create_solid_color;
use panel_renderer::raster::{apply_shape_mask, rotate_expand};
use proptest::prelude::*;

proptest! {
    #[test]
    fn four_quarter_turns_restore_the_image(w in 1u32..24, h in 1u32..24, seed in any::<u8>()) {
        let mut img = create_solid_color(w, h, [seed, 0, 0, 255]);
        img.put_pixel(0, 0, *create_solid_color(1, 1, [0, seed, 255, 255]).get_pixel(0, 0));

        let mut turned = img.clone();
        for _ in 0..4 {
            turned = rotate_expand(&turned, 90);
        }
        prop_assert_eq!(turned, img);
    }

    #[test]
    fn rotated_canvas_covers_the_extent(w in 1u32..40, h in 1u32..40, deg in 0u16..360) {
        let img = create_solid_color(w, h, [9, 9, 9, 255]);
        let (out_w, out_h) = rotate_expand(&img, deg).dimensions();
        let extent = rotated_extent(Size::new(f64::from(w), f64::from(h)), deg);
        prop_assert!(f64::from(out_w) >= extent.width - 1e-6);
        prop_assert!(f64::from(out_h) >= extent.height - 1e-6);
        prop_assert!(f64::from(out_w) < extent.width + 1.0 + 1e-6);
        prop_assert!(f64::from(out_h) < extent.height + 1.0 + 1e-6);
    }

    #[test]
    fn circle_mask_is_the_inscribed_disc(d in 1u32..64) {
        let mut img = create_solid_color(d, d, [200, 100, 50, 255]);
        apply_shape_mask(&mut img, Shape::Circle);
        let r = f64::from(d) / 2.0;
        for (x, y, pixel) in img.enumerate_pixels() {
            let dx = f64::from(x) + 0.5 - r;
            let dy = f64::from(y) + 0.5 - r;
            let inside = dx * dx + dy * dy <= r * r;
            prop_assert_eq!(pixel.0[3] == 255, inside);
            prop_assert!(pixel.0[3] == 0 || pixel.0[3] == 255);
        }
    }

    #[test]
    fn rectangle_mask_keeps_every_pixel(w in 1u32..48, h in 1u32..48) {
        let mut img = create_solid_color(w, h, [1, 2, 3, 255]);
        apply_shape_mask(&mut img, Shape::Rectangle);
        prop_assert!(img.pixels().all(|p| p.0[3] == 255));
    }
}
