//! Editing session state: wall width plus layout.

use crate::codec::{SessionCodec, SessionRecord};
use crate::geometry::Point;
use crate::sync::{synchronize, InteractiveSurface};
use crate::transform::CoordinateTransform;
use crate::{LayoutResult, LayoutStore, Panel, PanelId, PanelSizeClass, WallWidth};

/// State for one wall being edited.
///
/// Operations that read or address panels authoritatively take the current
/// interactive surface (if any) and synchronize from it first, so drags that
/// only exist on the surface are never lost.
#[derive(Debug, Clone, Default)]
pub struct Session {
    wall_width: WallWidth,
    layout: LayoutStore,
}

impl Session {
    /// Create an empty session for a wall.
    #[must_use]
    pub fn new(wall_width: WallWidth) -> Self {
        Self {
            wall_width,
            layout: LayoutStore::new(),
        }
    }

    /// Current wall width.
    #[must_use]
    pub fn wall_width(&self) -> WallWidth {
        self.wall_width
    }

    /// Change the wall width.
    ///
    /// Panel records are untouched; only derived scales change.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidWallWidth`] and keeps the previous
    /// width if `cm` is not strictly positive.
    pub fn set_wall_width(&mut self, cm: f64) -> LayoutResult<()> {
        match WallWidth::new(cm) {
            Ok(width) => {
                tracing::debug!("Wall width {} -> {}", self.wall_width, width);
                self.wall_width = width;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected wall width {cm}, keeping {}", self.wall_width);
                Err(e)
            }
        }
    }

    /// Read-only view of the layout (not synchronized).
    #[must_use]
    pub fn layout(&self) -> &LayoutStore {
        &self.layout
    }

    /// Fresh transform for a photo of the given pixel width.
    #[must_use]
    pub fn transform(&self, photo_width_px: u32) -> CoordinateTransform {
        CoordinateTransform::new(self.wall_width, photo_width_px)
    }

    /// Pull surface state into the layout. See [`synchronize`].
    pub fn synchronize(&mut self, surface: Option<&dyn InteractiveSurface>) -> usize {
        synchronize(&mut self.layout, surface)
    }

    /// Synchronize and return the authoritative layout.
    pub fn synchronized_layout(&mut self, surface: Option<&dyn InteractiveSurface>) -> &LayoutStore {
        self.synchronize(surface);
        &self.layout
    }

    /// Add a panel. See [`LayoutStore::add`].
    ///
    /// The new panel is also placed on `surface`, on top.
    pub fn add_panel(
        &mut self,
        surface: Option<&mut dyn InteractiveSurface>,
        size_class: PanelSizeClass,
        material: impl Into<String>,
        anchor: Option<Point>,
    ) -> PanelId {
        self.synchronize(surface.as_deref());
        let id = self.layout.add(size_class, material, anchor);
        self.push(surface, &id);
        id
    }

    /// Rotate a panel by one step after synchronizing, and show the new
    /// rotation on `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::PanelNotFound`] for an unknown id.
    pub fn rotate_panel(
        &mut self,
        surface: Option<&mut dyn InteractiveSurface>,
        id: &PanelId,
    ) -> LayoutResult<u16> {
        self.synchronize(surface.as_deref());
        let rotation = self.layout.rotate_step(id)?;
        self.push(surface, id);
        Ok(rotation)
    }

    /// Move a panel after synchronizing, and show the new position on
    /// `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::PanelNotFound`] for an unknown id.
    pub fn move_panel(
        &mut self,
        surface: Option<&mut dyn InteractiveSurface>,
        id: &PanelId,
        position: Point,
    ) -> LayoutResult<()> {
        self.synchronize(surface.as_deref());
        self.layout.move_panel(id, position)?;
        self.push(surface, id);
        Ok(())
    }

    /// Remove a panel after synchronizing, and drop it from `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::PanelNotFound`] for an unknown id.
    pub fn remove_panel(
        &mut self,
        surface: Option<&mut dyn InteractiveSurface>,
        id: &PanelId,
    ) -> LayoutResult<Panel> {
        self.synchronize(surface.as_deref());
        let panel = self.layout.remove(id)?;
        if let Some(surface) = surface {
            surface.discard(id);
        }
        Ok(panel)
    }

    fn push(&self, surface: Option<&mut dyn InteractiveSurface>, id: &PanelId) {
        if let (Some(surface), Some(panel)) = (surface, self.layout.get(id)) {
            surface.apply(panel);
        }
    }

    /// Synchronize and snapshot as a session record.
    pub fn snapshot(&mut self, surface: Option<&dyn InteractiveSurface>) -> SessionRecord {
        self.synchronize(surface);
        SessionCodec::serialize(self.wall_width, &self.layout)
    }

    /// Synchronize and serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json(&mut self, surface: Option<&dyn InteractiveSurface>) -> LayoutResult<String> {
        self.synchronize(surface);
        SessionCodec::to_json_pretty(self.wall_width, &self.layout)
    }

    /// Replace the whole session from JSON.
    ///
    /// Atomic: on error the current wall width and layout stay as they were.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::MalformedSessionRecord`] if the JSON is
    /// not a valid session.
    pub fn load_json(&mut self, json: &str) -> LayoutResult<()> {
        let decoded = SessionCodec::from_json(json);
        self.replace(decoded)
    }

    /// Replace the whole session from a base64 share code. Atomic like
    /// [`load_json`](Self::load_json).
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::MalformedSessionRecord`] for an invalid
    /// code.
    pub fn load_share_code(&mut self, code: &str) -> LayoutResult<()> {
        let decoded = SessionCodec::from_share_code(code);
        self.replace(decoded)
    }

    fn replace(&mut self, decoded: LayoutResult<(WallWidth, LayoutStore)>) -> LayoutResult<()> {
        let (wall_width, layout) = decoded.inspect_err(|e| {
            tracing::warn!("Session load rejected: {e}");
        })?;
        tracing::info!("Loaded session: {} panels on a {wall_width} wall", layout.len());
        self.wall_width = wall_width;
        self.layout = layout;
        Ok(())
    }
}
