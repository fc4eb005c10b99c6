//! Shared panel geometry.
//!
//! Both renderers (the interactive preview surface and the raster export)
//! consume [`PanelGeometry`]; scale, pivot, shape and fill math live here and
//! nowhere else.

use serde::{Deserialize, Serialize};

use crate::transform::CoordinateTransform;
use crate::{Panel, PanelId, Shape};

/// A point in preview or export space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply both coordinates by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Translate by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `other` to `self`.
    #[must_use]
    pub fn minus(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Multiply both extents by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Whole-pixel dimensions, rounded to nearest and at least one pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_pixels(self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Rectangle of `size` centred on `center`.
    #[must_use]
    pub fn centered(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `point` lies inside (edges included).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Whether the two rectangles share any area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// How a material texture covers a panel.
///
/// Applied identically by the preview and the export so both show the same
/// texture density.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FillMode {
    /// One resample of the texture stretched over the whole bounding box.
    #[default]
    Stretch,
    /// Texture repeated at a fixed physical period, anchored at the panel's
    /// top-left corner.
    Tile {
        /// Width of one texture repeat in centimeters.
        period_cm: f64,
    },
}

impl FillMode {
    /// Size of one texture tile in the target space.
    ///
    /// `units_per_cm` is the scale of the target space and `texture_px` the
    /// native texture dimensions (used to keep the tile aspect ratio).
    #[must_use]
    pub fn tile_size(&self, panel: Size, units_per_cm: f64, texture_px: (u32, u32)) -> Size {
        match *self {
            Self::Stretch => panel,
            Self::Tile { period_cm } => {
                let width = (period_cm * units_per_cm).max(f64::MIN_POSITIVE);
                let (tw, th) = texture_px;
                let aspect = f64::from(th.max(1)) / f64::from(tw.max(1));
                Size::new(width, width * aspect)
            }
        }
    }
}

/// Simulated panel depth.
///
/// Rectangular panels get shaded sides along their right and bottom edges,
/// fading out over the panel thickness. Every panel gets a light highlight
/// from the top-left: a diagonal fade on rectangles, a radial one on circles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    /// Panel thickness in centimeters; the width of the shaded sides.
    pub thickness_cm: f64,
    /// Side shading opacity where the side meets the face.
    pub side_opacity: f64,
    /// Highlight opacity at its brightest.
    pub highlight_opacity: f64,
}

impl Default for Depth {
    fn default() -> Self {
        Self {
            thickness_cm: 5.0,
            side_opacity: 0.25,
            highlight_opacity: 0.15,
        }
    }
}

impl Depth {
    /// Fraction of a circle's radius over which the highlight is at full
    /// strength.
    pub const HIGHLIGHT_CORE: f64 = 0.3;

    /// Side opacity `t` of the way across a side, from the face (0) to the
    /// outer edge (1).
    #[must_use]
    pub fn side_alpha(&self, t: f64) -> f64 {
        self.side_opacity * (1.0 - t.clamp(0.0, 1.0))
    }

    /// Highlight opacity `t` of the way along a rectangle's diagonal, from
    /// the top-left corner (0) to the bottom-right corner (1).
    #[must_use]
    pub fn linear_highlight_alpha(&self, t: f64) -> f64 {
        self.highlight_opacity * (1.0 - t.clamp(0.0, 1.0))
    }

    /// Highlight opacity at `distance / radius` from a circle's center.
    #[must_use]
    pub fn radial_highlight_alpha(&self, r: f64) -> f64 {
        let fade = (r - Self::HIGHLIGHT_CORE) / (1.0 - Self::HIGHLIGHT_CORE);
        self.highlight_opacity * (1.0 - fade.clamp(0.0, 1.0))
    }
}

/// Exact sine and cosine for whole degrees.
///
/// Quarter turns return exact values so rotated sizes do not pick up
/// floating-point noise.
#[must_use]
pub fn rotation_sin_cos(rotation_deg: u16) -> (f64, f64) {
    match rotation_deg % 360 {
        0 => (0.0, 1.0),
        90 => (1.0, 0.0),
        180 => (0.0, -1.0),
        270 => (-1.0, 0.0),
        deg => f64::from(deg).to_radians().sin_cos(),
    }
}

/// Axis-aligned size of a `size` box after rotating it about its center.
#[must_use]
pub fn rotated_extent(size: Size, rotation_deg: u16) -> Size {
    let (sin, cos) = rotation_sin_cos(rotation_deg);
    let (sin, cos) = (sin.abs(), cos.abs());
    Size::new(
        size.width * cos + size.height * sin,
        size.width * sin + size.height * cos,
    )
}

/// Shape test in the panel's own frame.
///
/// `(dx, dy)` is the offset from the panel center before rotation. A circle
/// has radius `max(width, height) / 2` and is clipped to the bounding box.
#[must_use]
pub fn shape_contains(shape: Shape, size: Size, dx: f64, dy: f64) -> bool {
    let half_w = size.width / 2.0;
    let half_h = size.height / 2.0;
    let in_box = dx.abs() <= half_w && dy.abs() <= half_h;
    match shape {
        Shape::Rectangle => in_box,
        Shape::Circle => {
            let radius = half_w.max(half_h);
            in_box && dx * dx + dy * dy <= radius * radius
        }
    }
}

/// A panel resolved into one coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGeometry {
    /// Panel this geometry belongs to.
    pub id: PanelId,
    /// Top-left corner of the un-rotated bounding box.
    pub origin: Point,
    /// Bounding box size.
    pub size: Size,
    /// Clockwise rotation about the center, in degrees.
    pub rotation_deg: u16,
    /// Outline inside the bounding box.
    pub shape: Shape,
    /// Material key.
    pub material: String,
    /// Target-space units per centimeter.
    pub units_per_cm: f64,
}

impl PanelGeometry {
    /// Resolve a panel in preview space.
    #[must_use]
    pub fn preview(panel: &Panel, transform: &CoordinateTransform) -> Self {
        Self {
            id: panel.id.clone(),
            origin: panel.position,
            size: transform.preview_size(panel.size_class),
            rotation_deg: panel.rotation_deg,
            shape: panel.size_class.shape(),
            material: panel.material.clone(),
            units_per_cm: transform.preview_scale(),
        }
    }

    /// Resolve a panel in photo pixel space.
    ///
    /// The preview center is mapped through the export scale and the export
    /// box is centred on it, so both spaces agree on the pivot.
    #[must_use]
    pub fn export(panel: &Panel, transform: &CoordinateTransform) -> Self {
        let preview = Self::preview(panel, transform);
        let center = transform.preview_to_export(preview.center());
        let size = transform.export_size(panel.size_class);
        Self {
            origin: Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
            units_per_cm: transform.px_per_cm(),
            ..preview
        }
    }

    /// Center of the bounding box; the rotation pivot.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Un-rotated bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.origin.x,
            y: self.origin.y,
            width: self.size.width,
            height: self.size.height,
        }
    }

    /// Axis-aligned box covering the rotated panel.
    #[must_use]
    pub fn rotated_bounds(&self) -> Rect {
        Rect::centered(self.center(), rotated_extent(self.size, self.rotation_deg))
    }

    /// Radius used for circular panels.
    #[must_use]
    pub fn circle_radius(&self) -> f64 {
        self.size.width.max(self.size.height) / 2.0
    }

    /// Top-left placement for a rotated image of `extent`, keeping its center
    /// on the panel's center.
    #[must_use]
    pub fn placement_for(&self, extent: Size) -> Point {
        let center = self.center();
        Point::new(center.x - extent.width / 2.0, center.y - extent.height / 2.0)
    }

    /// Hit test honouring rotation and shape.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let center = self.center();
        let d = point.minus(center);
        let (sin, cos) = rotation_sin_cos(self.rotation_deg);
        // Undo the clockwise rotation.
        let local_x = d.x * cos + d.y * sin;
        let local_y = -d.x * sin + d.y * cos;
        shape_contains(self.shape, self.size, local_x, local_y)
    }

    /// Tile size for the given fill mode and texture dimensions.
    #[must_use]
    pub fn tile_size(&self, fill: FillMode, texture_px: (u32, u32)) -> Size {
        fill.tile_size(self.size, self.units_per_cm, texture_px)
    }

    /// Width of the shaded sides in this space. Circles and panels drawn
    /// without depth have none.
    #[must_use]
    pub fn side_thickness(&self, depth: Option<Depth>) -> f64 {
        match (depth, self.shape) {
            (Some(depth), Shape::Rectangle) => depth.thickness_cm * self.units_per_cm,
            _ => 0.0,
        }
    }

    /// Axis-aligned box covering everything drawn for the panel: the rotated
    /// face plus a side margin on every edge.
    #[must_use]
    pub fn drawn_bounds(&self, depth: Option<Depth>) -> Rect {
        let margin = 2.0 * self.side_thickness(depth);
        let padded = Size::new(self.size.width + margin, self.size.height + margin);
        Rect::centered(self.center(), rotated_extent(padded, self.rotation_deg))
    }
}
