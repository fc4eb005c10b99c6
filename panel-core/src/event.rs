//! Pointer input for the interactive preview.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a pointer or touch interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed or finger down.
    Press,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted. Always commits a running drag.
    Release,
}

/// A pointer event in preview coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// Pointer location in preview space.
    pub position: Point,
}

impl PointerEvent {
    /// Create a pointer event.
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
        }
    }

    /// Press at `(x, y)`.
    #[must_use]
    pub const fn press(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Press, x, y)
    }

    /// Move to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Release at `(x, y)`.
    #[must_use]
    pub const fn release(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Release, x, y)
    }
}
