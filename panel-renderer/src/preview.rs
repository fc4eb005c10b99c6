//! Interactive preview surface.
//!
//! Holds the live, draggable regions a user manipulates at preview scale.
//! Region state is pulled into the [`LayoutStore`] through
//! [`panel_core::synchronize`]. By-id changes made through
//! [`panel_core::Session`] are pushed back onto the regions, and
//! [`PreviewSurface::refresh`] rebuilds them wholesale after a load.

use std::fmt::Write as _;

use panel_core::panel::normalize_rotation;
use panel_core::{
    CoordinateTransform, Depth, FillMode, InteractiveSurface, LayoutError, LayoutResult, LayoutStore,
    Panel, PanelGeometry, PanelId, Point, PointerEvent, PointerPhase, Shape, SurfacePanelState,
    PREVIEW_WIDTH,
};

use crate::catalog::TextureCatalog;
use crate::image::{image_dimensions, to_data_uri};

/// One panel as shown on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRegion {
    /// Geometry in preview space.
    pub geometry: PanelGeometry,
    /// Stacking value; higher draws above lower.
    pub z: u64,
}

impl PreviewRegion {
    /// Panel id.
    #[must_use]
    pub fn id(&self) -> &PanelId {
        &self.geometry.id
    }
}

#[derive(Debug, Clone)]
struct DragState {
    id: PanelId,
    /// Pointer minus region top-left at press time.
    offset: Point,
}

/// Draggable, rotatable panel regions at preview scale.
#[derive(Debug, Clone)]
pub struct PreviewSurface {
    transform: CoordinateTransform,
    /// Kept sorted by `z`, bottom first.
    regions: Vec<PreviewRegion>,
    next_z: u64,
    drag: Option<DragState>,
}

impl PreviewSurface {
    /// Build regions for every panel in the store, in stacking order.
    #[must_use]
    pub fn build(layout: &LayoutStore, transform: CoordinateTransform) -> Self {
        let mut surface = Self {
            transform,
            regions: Vec::with_capacity(layout.len()),
            next_z: 0,
            drag: None,
        };
        surface.refresh(layout, transform);
        surface
    }

    /// Rebuild regions from the store. Ends any drag in progress.
    pub fn refresh(&mut self, layout: &LayoutStore, transform: CoordinateTransform) {
        self.transform = transform;
        self.drag = None;
        self.regions = layout
            .iter()
            .map(|panel| {
                let z = self.next_z;
                self.next_z += 1;
                PreviewRegion {
                    geometry: PanelGeometry::preview(panel, &transform),
                    z,
                }
            })
            .collect();
        tracing::trace!("Preview surface refreshed with {} regions", self.regions.len());
    }

    /// Transform the regions were built with.
    #[must_use]
    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Regions from bottom to top.
    #[must_use]
    pub fn regions(&self) -> &[PreviewRegion] {
        &self.regions
    }

    /// Region for a panel id.
    #[must_use]
    pub fn region(&self, id: &PanelId) -> Option<&PreviewRegion> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// Topmost region under `point`, honouring rotation and shape.
    #[must_use]
    pub fn region_at(&self, point: Point) -> Option<&PanelId> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.geometry.contains(point))
            .map(PreviewRegion::id)
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Id of the region being dragged, if any.
    #[must_use]
    pub fn dragged(&self) -> Option<&PanelId> {
        self.drag.as_ref().map(|d| &d.id)
    }

    /// Feed a pointer event. Returns `true` if any region changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event.phase {
            PointerPhase::Press => self.press(event.position),
            PointerPhase::Move => self.drag_to(event.position),
            PointerPhase::Release => {
                let moved = self.drag_to(event.position);
                if let Some(drag) = self.drag.take() {
                    tracing::debug!("Drag of panel {} released", drag.id);
                }
                moved
            }
        }
    }

    fn press(&mut self, point: Point) -> bool {
        let Some(index) = self
            .regions
            .iter()
            .rposition(|r| r.geometry.contains(point))
        else {
            return false;
        };

        let mut region = self.regions.remove(index);
        region.z = self.next_z;
        self.next_z += 1;

        let offset = point.minus(region.geometry.origin);
        self.drag = Some(DragState {
            id: region.id().clone(),
            offset,
        });
        tracing::debug!("Drag of panel {} started", region.id());
        self.regions.push(region);
        true
    }

    fn drag_to(&mut self, point: Point) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };
        let origin = point.minus(drag.offset);
        match self.regions.iter_mut().find(|r| r.geometry.id == drag.id) {
            Some(region) => {
                region.geometry.origin = origin;
                true
            }
            None => false,
        }
    }

    /// Rotate a region on the surface by `delta_deg`, returning the new angle.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PanelNotFound`] if no region has this id.
    pub fn rotate(&mut self, id: &PanelId, delta_deg: i32) -> LayoutResult<u16> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| LayoutError::PanelNotFound(id.to_string()))?;
        let rotation = normalize_rotation(
            i64::from(region.geometry.rotation_deg) + i64::from(delta_deg),
        );
        region.geometry.rotation_deg = rotation;
        Ok(rotation)
    }

    /// Render the surface as a standalone SVG document.
    ///
    /// `photo` is the encoded wall photo and `photo_height_px` its pixel
    /// height. Panels whose material is missing from `catalog` are left out.
    /// With `depth` set, each panel gets the same shaded sides and highlight
    /// the raster export draws.
    #[must_use]
    pub fn to_svg(
        &self,
        catalog: &TextureCatalog,
        photo: &[u8],
        photo_height_px: u32,
        fill: FillMode,
        depth: Option<Depth>,
    ) -> String {
        let height = self.transform.preview_height(photo_height_px);
        let mut defs = String::new();
        let mut body = String::new();

        let _ = writeln!(
            body,
            r#"  <image x="0" y="0" width="{PREVIEW_WIDTH}" height="{height}" preserveAspectRatio="none" href="{}"/>"#,
            to_data_uri(photo)
        );

        for (index, region) in self.regions.iter().enumerate() {
            let g = &region.geometry;
            let Some(bytes) = catalog.get(&g.material) else {
                tracing::warn!("No texture for material '{}', panel {} not drawn", g.material, g.id);
                continue;
            };
            let uri = to_data_uri(bytes);
            let center = g.center();

            let mut group_attrs = format!(
                r#"data-panel-id="{}" transform="rotate({} {} {})""#,
                escape_attr(g.id.as_str()),
                g.rotation_deg,
                center.x,
                center.y
            );
            if g.shape == Shape::Circle {
                let _ = writeln!(
                    defs,
                    r#"    <clipPath id="clip-{index}"><circle cx="{}" cy="{}" r="{}"/></clipPath>"#,
                    center.x,
                    center.y,
                    g.circle_radius()
                );
                let _ = write!(group_attrs, r#" clip-path="url(#clip-{index})""#);
            }

            let _ = writeln!(body, "  <g {group_attrs}>");
            match fill {
                FillMode::Stretch => {
                    let _ = writeln!(
                        body,
                        r#"    <image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" href="{uri}"/>"#,
                        g.origin.x, g.origin.y, g.size.width, g.size.height
                    );
                }
                FillMode::Tile { .. } => {
                    let texture_px = image_dimensions(bytes).unwrap_or((1, 1));
                    let tile = g.tile_size(fill, texture_px);
                    let _ = writeln!(
                        defs,
                        r#"    <pattern id="fill-{index}" patternUnits="userSpaceOnUse" x="{}" y="{}" width="{}" height="{}"><image width="{}" height="{}" preserveAspectRatio="none" href="{uri}"/></pattern>"#,
                        g.origin.x, g.origin.y, tile.width, tile.height, tile.width, tile.height
                    );
                    let _ = writeln!(
                        body,
                        r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="url(#fill-{index})"/>"#,
                        g.origin.x, g.origin.y, g.size.width, g.size.height
                    );
                }
            }
            if let Some(depth) = depth {
                write_depth(&mut defs, &mut body, index, g, depth);
            }
            body.push_str("  </g>\n");
        }

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{PREVIEW_WIDTH}" height="{height}" viewBox="0 0 {PREVIEW_WIDTH} {height}">"#
        );
        svg.push('\n');
        if !defs.is_empty() {
            svg.push_str("  <defs>\n");
            svg.push_str(&defs);
            svg.push_str("  </defs>\n");
        }
        svg.push_str(&body);
        svg.push_str("</svg>\n");
        svg
    }
}

impl InteractiveSurface for PreviewSurface {
    fn panel_states(&self) -> Vec<SurfacePanelState> {
        self.regions
            .iter()
            .map(|r| SurfacePanelState {
                id: r.id().clone(),
                position: r.geometry.origin,
                rotation_deg: r.geometry.rotation_deg,
            })
            .collect()
    }

    fn stacking_order(&self) -> Vec<PanelId> {
        self.regions.iter().map(|r| r.id().clone()).collect()
    }

    fn apply(&mut self, panel: &Panel) {
        let geometry = PanelGeometry::preview(panel, &self.transform);
        if let Some(region) = self.regions.iter_mut().find(|r| r.id() == &panel.id) {
            region.geometry = geometry;
            return;
        }
        let z = self.next_z;
        self.next_z += 1;
        self.regions.push(PreviewRegion { geometry, z });
    }

    fn discard(&mut self, id: &PanelId) {
        self.regions.retain(|r| r.id() != id);
        if self.drag.as_ref().is_some_and(|d| &d.id == id) {
            self.drag = None;
        }
    }
}

/// Gradients for the shaded sides and highlight of one panel, drawn inside
/// its rotated group.
fn write_depth(
    defs: &mut String,
    body: &mut String,
    index: usize,
    geometry: &PanelGeometry,
    depth: Depth,
) {
    let stops = |color: &str, opacity: f64, start: f64| {
        format!(
            r#"<stop offset="{start}" stop-color="{color}" stop-opacity="{opacity}"/><stop offset="1" stop-color="{color}" stop-opacity="0"/>"#
        )
    };

    if geometry.shape == Shape::Circle {
        let center = geometry.center();
        let radius = geometry.circle_radius();
        let _ = writeln!(
            defs,
            r#"    <radialGradient id="light-{index}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{radius}">{}</radialGradient>"#,
            center.x,
            center.y,
            stops("white", depth.highlight_opacity, Depth::HIGHLIGHT_CORE)
        );
        let _ = writeln!(
            body,
            r#"    <circle cx="{}" cy="{}" r="{radius}" fill="url(#light-{index})"/>"#,
            center.x, center.y
        );
        return;
    }

    let Point { x: left, y: top } = geometry.origin;
    let (width, height) = (geometry.size.width, geometry.size.height);
    let (right, bottom) = (left + width, top + height);
    let thickness = geometry.side_thickness(Some(depth));
    let side = stops("black", depth.side_opacity, 0.0);
    let _ = writeln!(
        defs,
        r#"    <linearGradient id="side-r-{index}" gradientUnits="userSpaceOnUse" x1="{right}" y1="{top}" x2="{}" y2="{top}">{side}</linearGradient>"#,
        right + thickness
    );
    let _ = writeln!(
        defs,
        r#"    <linearGradient id="side-b-{index}" gradientUnits="userSpaceOnUse" x1="{left}" y1="{bottom}" x2="{left}" y2="{}">{side}</linearGradient>"#,
        bottom + thickness
    );
    let _ = writeln!(
        defs,
        r#"    <linearGradient id="light-{index}" gradientUnits="userSpaceOnUse" x1="{left}" y1="{top}" x2="{right}" y2="{bottom}">{}</linearGradient>"#,
        stops("white", depth.highlight_opacity, 0.0)
    );
    let _ = writeln!(
        body,
        r#"    <rect x="{right}" y="{top}" width="{thickness}" height="{height}" fill="url(#side-r-{index})"/>"#
    );
    let _ = writeln!(
        body,
        r#"    <rect x="{left}" y="{bottom}" width="{width}" height="{thickness}" fill="url(#side-b-{index})"/>"#
    );
    let _ = writeln!(
        body,
        r#"    <rect x="{left}" y="{top}" width="{width}" height="{height}" fill="url(#light-{index})"/>"#
    );
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
