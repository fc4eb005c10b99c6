//! Portable session records: the only persisted and shared form of a layout.
//!
//! ```json
//! { "wall_width_cm": 400.0,
//!   "panels": [ { "id": "…", "x": 100.0, "y": 100.0, "rotation": 90,
//!                 "size": "MOON", "mat": "Tender" } ] }
//! ```
//!
//! Unknown fields are ignored; missing or mistyped fields reject the whole
//! record. A share code is the same JSON wrapped in standard base64.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::panel::normalize_rotation;
use crate::{LayoutError, LayoutResult, LayoutStore, Panel, PanelId, PanelSizeClass, WallWidth};

/// One panel entry in a session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRecord {
    /// Panel identifier.
    pub id: String,
    /// Left edge in preview space.
    pub x: f64,
    /// Top edge in preview space.
    pub y: f64,
    /// Clockwise rotation in whole degrees.
    pub rotation: i64,
    /// Size class label.
    pub size: PanelSizeClass,
    /// Material key.
    pub mat: String,
}

impl From<&Panel> for PanelRecord {
    fn from(panel: &Panel) -> Self {
        Self {
            id: panel.id.to_string(),
            x: panel.position.x,
            y: panel.position.y,
            rotation: i64::from(panel.rotation_deg),
            size: panel.size_class,
            mat: panel.material.clone(),
        }
    }
}

impl PanelRecord {
    /// Convert the record into a runtime panel.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedSessionRecord`] for an empty id or a
    /// non-finite coordinate.
    pub fn into_panel(self) -> LayoutResult<Panel> {
        if self.id.trim().is_empty() {
            return Err(LayoutError::MalformedSessionRecord(
                "panel id must not be empty".to_string(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(LayoutError::MalformedSessionRecord(format!(
                "panel '{}' has a non-finite position",
                self.id
            )));
        }

        let mut panel = Panel::new(self.size, self.mat, Point::new(self.x, self.y))
            .with_id(PanelId::from_string(self.id));
        panel.rotation_deg = normalize_rotation(self.rotation);
        Ok(panel)
    }
}

/// Wall width plus ordered panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Real wall width in centimeters.
    pub wall_width_cm: f64,
    /// Panels in stacking order.
    pub panels: Vec<PanelRecord>,
}

/// Converts layouts to and from [`SessionRecord`]s.
pub struct SessionCodec;

impl SessionCodec {
    /// Snapshot a wall width and layout.
    #[must_use]
    pub fn serialize(wall_width: WallWidth, layout: &LayoutStore) -> SessionRecord {
        SessionRecord {
            wall_width_cm: wall_width.cm(),
            panels: layout.iter().map(PanelRecord::from).collect(),
        }
    }

    /// Restore a wall width and layout from a record.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedSessionRecord`] if the wall width is
    /// not positive, a panel entry is invalid, or ids repeat.
    pub fn deserialize(record: SessionRecord) -> LayoutResult<(WallWidth, LayoutStore)> {
        let wall_width = WallWidth::new(record.wall_width_cm).map_err(|e| {
            LayoutError::MalformedSessionRecord(format!("wall_width_cm: {e}"))
        })?;
        let panels = record
            .panels
            .into_iter()
            .map(PanelRecord::into_panel)
            .collect::<LayoutResult<Vec<_>>>()?;
        let layout = LayoutStore::from_panels(panels)?;
        Ok((wall_width, layout))
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json(wall_width: WallWidth, layout: &LayoutStore) -> LayoutResult<String> {
        Ok(serde_json::to_string(&Self::serialize(wall_width, layout))?)
    }

    /// Serialize to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json_pretty(wall_width: WallWidth, layout: &LayoutStore) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(&Self::serialize(
            wall_width, layout,
        ))?)
    }

    /// Parse and validate JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedSessionRecord`] if the JSON does not
    /// describe a valid session.
    pub fn from_json(json: &str) -> LayoutResult<(WallWidth, LayoutStore)> {
        let record: SessionRecord = serde_json::from_str(json)?;
        Self::deserialize(record)
    }

    /// Encode a session as a base64 share code.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_share_code(wall_width: WallWidth, layout: &LayoutStore) -> LayoutResult<String> {
        let json = Self::to_json(wall_width, layout)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(json))
    }

    /// Decode a base64 share code.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedSessionRecord`] if the code is not
    /// valid base64, not UTF-8, or not a valid session.
    pub fn from_share_code(code: &str) -> LayoutResult<(WallWidth, LayoutStore)> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(code.trim())
            .map_err(|e| LayoutError::MalformedSessionRecord(format!("share code: {e}")))?;
        let json = String::from_utf8(bytes)
            .map_err(|e| LayoutError::MalformedSessionRecord(format!("share code: {e}")))?;
        Self::from_json(&json)
    }
}
