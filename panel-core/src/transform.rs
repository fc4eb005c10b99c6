//! Mapping between centimeters, preview space and photo pixels.
//!
//! ```text
//!   centimeters ──preview_scale──▶ preview px ──export_scale──▶ photo px
//!                 (800 / wall_cm)               (photo_w / 800)
//! ```
//!
//! The transform is a pure value: build a fresh one for every layout or
//! export pass instead of keeping one around across wall-width edits.

use crate::geometry::{Point, Size};
use crate::{PanelSizeClass, WallWidth};

/// Width of the interactive preview canvas, in preview units.
pub const PREVIEW_WIDTH: f64 = 800.0;

/// Scale factors for one `(wall width, photo width)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    wall_width: WallWidth,
    photo_width_px: u32,
}

impl CoordinateTransform {
    /// Create a transform for a wall and the pixel width of its photo.
    ///
    /// A zero photo width is treated as one pixel.
    #[must_use]
    pub fn new(wall_width: WallWidth, photo_width_px: u32) -> Self {
        Self {
            wall_width,
            photo_width_px: photo_width_px.max(1),
        }
    }

    /// The wall width this transform was built for.
    #[must_use]
    pub fn wall_width(&self) -> WallWidth {
        self.wall_width
    }

    /// Photo width in pixels.
    #[must_use]
    pub fn photo_width_px(&self) -> u32 {
        self.photo_width_px
    }

    /// Preview units per centimeter.
    #[must_use]
    pub fn preview_scale(&self) -> f64 {
        PREVIEW_WIDTH / self.wall_width.cm()
    }

    /// Photo pixels per preview unit.
    #[must_use]
    pub fn export_scale(&self) -> f64 {
        f64::from(self.photo_width_px) / PREVIEW_WIDTH
    }

    /// Photo pixels per centimeter.
    #[must_use]
    pub fn px_per_cm(&self) -> f64 {
        f64::from(self.photo_width_px) / self.wall_width.cm()
    }

    /// Size of a panel class in preview units.
    #[must_use]
    pub fn preview_size(&self, size_class: PanelSizeClass) -> Size {
        let (w_cm, h_cm) = size_class.dimensions_cm();
        Size::new(w_cm, h_cm).scaled(self.preview_scale())
    }

    /// Size of a panel class in photo pixels.
    #[must_use]
    pub fn export_size(&self, size_class: PanelSizeClass) -> Size {
        self.preview_size(size_class).scaled(self.export_scale())
    }

    /// Height of the preview canvas for a photo of the given pixel height.
    #[must_use]
    pub fn preview_height(&self, photo_height_px: u32) -> f64 {
        f64::from(photo_height_px) / self.export_scale()
    }

    /// Map a preview-space point to photo pixels.
    #[must_use]
    pub fn preview_to_export(&self, point: Point) -> Point {
        point.scaled(self.export_scale())
    }

    /// Map a photo-pixel point to preview space.
    #[must_use]
    pub fn export_to_preview(&self, point: Point) -> Point {
        point.scaled(1.0 / self.export_scale())
    }

    /// Convert a length in centimeters to preview units.
    #[must_use]
    pub fn cm_to_preview(&self, cm: f64) -> f64 {
        cm * self.preview_scale()
    }

    /// Convert a length in preview units to centimeters.
    #[must_use]
    pub fn preview_to_cm(&self, units: f64) -> f64 {
        units / self.preview_scale()
    }
}
