//! Real-world wall width.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LayoutError, LayoutResult};

/// Default wall width used when nothing else is known.
pub const DEFAULT_WALL_WIDTH_CM: f64 = 400.0;

/// Width of the photographed wall in centimeters.
///
/// Always finite and strictly positive; construction rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct WallWidth(f64);

impl WallWidth {
    /// Validate a width in centimeters.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidWallWidth`] for zero, negative, NaN or
    /// infinite input.
    pub fn new(cm: f64) -> LayoutResult<Self> {
        if cm.is_finite() && cm > 0.0 {
            Ok(Self(cm))
        } else {
            Err(LayoutError::InvalidWallWidth(cm))
        }
    }

    /// The width in centimeters.
    #[must_use]
    pub const fn cm(self) -> f64 {
        self.0
    }
}

impl Default for WallWidth {
    fn default() -> Self {
        Self(DEFAULT_WALL_WIDTH_CM)
    }
}

impl TryFrom<f64> for WallWidth {
    type Error = LayoutError;

    fn try_from(cm: f64) -> Result<Self, Self::Error> {
        Self::new(cm)
    }
}

impl From<WallWidth> for f64 {
    fn from(width: WallWidth) -> Self {
        width.0
    }
}

impl fmt::Display for WallWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cm", self.0)
    }
}
