//! The authoritative, ordered collection of panels on a wall.

use std::collections::HashSet;

use crate::geometry::Point;
use crate::{LayoutError, LayoutResult, Panel, PanelId, PanelSizeClass};

/// Rotation applied by a single rotate action, in degrees.
pub const ROTATION_STEP_DEG: i32 = 90;

/// Anchor of the first panel added to a store, in preview space.
pub const DEFAULT_ANCHOR: Point = Point::new(100.0, 100.0);

/// Offset between consecutive default anchors, in preview units.
pub const ANCHOR_STEP: f64 = 20.0;

/// Number of default anchors before the stagger starts over.
pub const ANCHOR_CYCLE: u64 = 10;

/// Ordered panels for the current wall.
///
/// Order is stacking order: later panels draw above earlier ones. Ids are
/// unique for the store's whole lifetime; an id that was ever issued or
/// loaded is never handed out again, even after its panel is removed.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    panels: Vec<Panel>,
    /// Every id this store has issued or accepted.
    issued: HashSet<PanelId>,
    /// Number of `add` calls over the store's lifetime.
    insertions: u64,
}

impl LayoutStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from panels in stacking order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedSessionRecord`] if two panels share an id.
    pub fn from_panels(panels: impl IntoIterator<Item = Panel>) -> LayoutResult<Self> {
        let mut store = Self::new();
        for panel in panels {
            if !store.issued.insert(panel.id.clone()) {
                return Err(LayoutError::MalformedSessionRecord(format!(
                    "duplicate panel id '{}'",
                    panel.id
                )));
            }
            store.panels.push(panel);
        }
        store.insertions = store.panels.len() as u64;
        Ok(store)
    }

    /// Anchor the next `add` without an explicit anchor would use.
    ///
    /// Staggers diagonally from [`DEFAULT_ANCHOR`] so repeated adds do not
    /// land exactly on top of each other.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn next_default_anchor(&self) -> Point {
        let step = (self.insertions % ANCHOR_CYCLE) as f64 * ANCHOR_STEP;
        DEFAULT_ANCHOR.offset(step, step)
    }

    /// Append a new unrotated panel and return its id.
    ///
    /// Uses [`next_default_anchor`](Self::next_default_anchor) when `anchor`
    /// is `None`.
    pub fn add(
        &mut self,
        size_class: PanelSizeClass,
        material: impl Into<String>,
        anchor: Option<Point>,
    ) -> PanelId {
        let position = anchor.unwrap_or_else(|| self.next_default_anchor());
        let mut id = PanelId::new();
        while self.issued.contains(&id) {
            id = PanelId::new();
        }

        let panel = Panel::new(size_class, material, position).with_id(id.clone());
        tracing::debug!(
            "Add panel {id}: {} '{}' at ({}, {})",
            panel.size_class,
            panel.material,
            position.x,
            position.y
        );

        self.issued.insert(id.clone());
        self.panels.push(panel);
        self.insertions += 1;
        id
    }

    /// Rotate a panel by `delta_deg` and return the new rotation.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PanelNotFound`] if the id is unknown; no panel
    /// is modified in that case.
    pub fn rotate(&mut self, id: &PanelId, delta_deg: i32) -> LayoutResult<u16> {
        let panel = self.get_mut(id)?;
        panel.rotate(delta_deg);
        tracing::debug!("Rotate panel {id} to {} deg", panel.rotation_deg);
        Ok(panel.rotation_deg)
    }

    /// Rotate a panel by one [`ROTATION_STEP_DEG`] step.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PanelNotFound`] if the id is unknown.
    pub fn rotate_step(&mut self, id: &PanelId) -> LayoutResult<u16> {
        self.rotate(id, ROTATION_STEP_DEG)
    }

    /// Move a panel's top-left corner. Positions are not clamped to the wall.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PanelNotFound`] if the id is unknown.
    pub fn move_panel(&mut self, id: &PanelId, position: Point) -> LayoutResult<()> {
        let panel = self.get_mut(id)?;
        panel.position = position;
        Ok(())
    }

    /// Remove a panel, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PanelNotFound`] if the id is unknown.
    pub fn remove(&mut self, id: &PanelId) -> LayoutResult<Panel> {
        let index = self
            .panels
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| LayoutError::PanelNotFound(id.to_string()))?;
        tracing::debug!("Remove panel {id}");
        Ok(self.panels.remove(index))
    }

    /// Get a panel by id.
    #[must_use]
    pub fn get(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| &p.id == id)
    }

    fn get_mut(&mut self, id: &PanelId) -> LayoutResult<&mut Panel> {
        self.panels
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| LayoutError::PanelNotFound(id.to_string()))
    }

    /// Whether the store holds a panel with this id.
    #[must_use]
    pub fn contains(&self, id: &PanelId) -> bool {
        self.get(id).is_some()
    }

    /// All panels in stacking order.
    #[must_use]
    pub fn list(&self) -> &[Panel] {
        &self.panels
    }

    /// Iterate panels in stacking order.
    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    /// Number of panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Reorder known panels to follow `stack` (bottom to top).
    ///
    /// Panels missing from `stack` keep their slots; the slots held by the
    /// listed panels are refilled in `stack` order.
    pub(crate) fn restack(&mut self, stack: &[PanelId]) {
        let listed: Vec<usize> = self
            .panels
            .iter()
            .enumerate()
            .filter(|(_, p)| stack.contains(&p.id))
            .map(|(index, _)| index)
            .collect();

        let mut seen = HashSet::new();
        let ordered: Vec<Panel> = stack
            .iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.get(id).cloned())
            .collect();

        for (slot, panel) in listed.into_iter().zip(ordered) {
            self.panels[slot] = panel;
        }
    }

    pub(crate) fn panel_mut(&mut self, id: &PanelId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| &p.id == id)
    }
}
