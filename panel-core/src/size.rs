//! Panel size classes and their fixed real-world dimensions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outline of a panel within its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Fills the whole bounding box.
    Rectangle,
    /// A disc centred in the bounding box.
    Circle,
}

/// The fixed set of panel formats.
///
/// Each class maps to a compiled-in `(width_cm, height_cm)` pair and a
/// [`Shape`]. The table never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PanelSizeClass {
    /// Upright half panel, 47.5 × 95 cm.
    M,
    /// Square panel, 95 × 95 cm.
    L,
    /// Wide panel, 190 × 95 cm.
    XL,
    /// Round panel, 95 cm diameter.
    Moon,
}

impl PanelSizeClass {
    /// Every size class, in catalogue order.
    pub const ALL: [Self; 4] = [Self::M, Self::L, Self::XL, Self::Moon];

    /// Width and height in centimeters.
    #[must_use]
    pub const fn dimensions_cm(self) -> (f64, f64) {
        match self {
            Self::M => (47.5, 95.0),
            Self::L | Self::Moon => (95.0, 95.0),
            Self::XL => (190.0, 95.0),
        }
    }

    /// Outline used for fill and hit testing.
    #[must_use]
    pub const fn shape(self) -> Shape {
        match self {
            Self::Moon => Shape::Circle,
            Self::M | Self::L | Self::XL => Shape::Rectangle,
        }
    }

    /// Label used in session records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::Moon => "MOON",
        }
    }
}

impl fmt::Display for PanelSizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PanelSizeClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown panel size '{s}'"))
    }
}
