//! Placed panels - the building blocks of a layout.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;
use crate::PanelSizeClass;

/// Opaque, stable identifier of a placed panel.
///
/// Freshly created ids are UUID strings; ids restored from a session record
/// keep whatever string the record carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    /// Create a new unique panel ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier string.
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduce any whole-degree angle into `[0, 360)`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_rotation(degrees: i64) -> u16 {
    // rem_euclid(360) is always within 0..360
    degrees.rem_euclid(360) as u16
}

/// One placed panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Unique identifier.
    pub id: PanelId,
    /// Top-left corner in preview space.
    pub position: Point,
    /// Clockwise rotation in whole degrees, always in `[0, 360)`.
    pub rotation_deg: u16,
    /// Format; fixed for the panel's lifetime.
    pub size_class: PanelSizeClass,
    /// Material key into the texture catalog; fixed for the panel's lifetime.
    pub material: String,
}

impl Panel {
    /// Create an unrotated panel at `position` with a fresh id.
    #[must_use]
    pub fn new(size_class: PanelSizeClass, material: impl Into<String>, position: Point) -> Self {
        Self {
            id: PanelId::new(),
            position,
            rotation_deg: 0,
            size_class,
            material: material.into(),
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: PanelId) -> Self {
        self.id = id;
        self
    }

    /// Add `delta_deg` to the rotation, reducing modulo 360.
    pub fn rotate(&mut self, delta_deg: i32) {
        self.rotation_deg = normalize_rotation(i64::from(self.rotation_deg) + i64::from(delta_deg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = PanelId::new();
        let b = PanelId::new();
        assert_ne!(a, b);
        assert_eq!(PanelId::from_string("ab12").as_str(), "ab12");
    }

    #[test]
    fn test_rotation_wraps() {
        let mut panel = Panel::new(PanelSizeClass::L, "linen", Point::default());
        panel.rotate(90);
        assert_eq!(panel.rotation_deg, 90);
        panel.rotate(270);
        assert_eq!(panel.rotation_deg, 0);
        panel.rotate(-90);
        assert_eq!(panel.rotation_deg, 270);
        panel.rotate(725);
        assert_eq!(panel.rotation_deg, 275);
    }

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(360), 0);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(-1), 359);
    }
}
