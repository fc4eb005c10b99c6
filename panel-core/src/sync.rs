//! Synchronization boundary between an interactive surface and the store.
//!
//! The surface owns live drag/rotate state; the [`LayoutStore`] is the
//! authority that export and persistence read. [`synchronize`] pulls the
//! surface state into the store and must run before every authoritative read.
//! Mutations made on the store by id go the other way through
//! [`InteractiveSurface::apply`] and [`InteractiveSurface::discard`], so the
//! next pull cannot overwrite them with stale surface state.

use crate::geometry::Point;
use crate::{LayoutStore, Panel, PanelId};

/// Live state of one panel as shown on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePanelState {
    /// Panel id.
    pub id: PanelId,
    /// Top-left corner in preview space.
    pub position: Point,
    /// Rotation in degrees, in `[0, 360)`.
    pub rotation_deg: u16,
}

/// Anything that displays panels and lets a user manipulate them.
pub trait InteractiveSurface {
    /// Current state of every panel on the surface.
    fn panel_states(&self) -> Vec<SurfacePanelState>;

    /// Panel ids from bottom to top of the visual stack.
    fn stacking_order(&self) -> Vec<PanelId>;

    /// Show `panel` as the store now holds it. A panel the surface does not
    /// have yet is added on top.
    fn apply(&mut self, panel: &Panel);

    /// Drop a panel the store no longer holds.
    fn discard(&mut self, id: &PanelId);
}

/// Pull surface state into the store.
///
/// Positions, rotations and stacking order are copied for every panel the
/// store knows; surface entries for unknown ids are ignored. Returns the
/// number of panels updated. A missing surface is a no-op, and running twice
/// without interaction in between leaves the store unchanged.
pub fn synchronize(store: &mut LayoutStore, surface: Option<&dyn InteractiveSurface>) -> usize {
    let Some(surface) = surface else {
        return 0;
    };

    let mut updated = 0;
    for state in surface.panel_states() {
        if let Some(panel) = store.panel_mut(&state.id) {
            panel.position = state.position;
            panel.rotation_deg = state.rotation_deg % 360;
            updated += 1;
        } else {
            tracing::debug!("Surface reports unknown panel {}, ignoring", state.id);
        }
    }

    store.restack(&surface.stacking_order());
    tracing::trace!("Synchronized {updated} panels from surface");
    updated
}
