//! # Panel Wall Core
//!
//! Layout logic for placing decorative panels over a wall photo at real-world
//! scale. Image-free: rendering lives in `panel-renderer`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 panel-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Model           │  Geometry                │
//! │  - Size classes  │  - Coordinate transform  │
//! │  - Panels        │  - Pivot / shape / fill  │
//! │  - LayoutStore   │                          │
//! ├─────────────────────────────────────────────┤
//! │  Session         │  Sync boundary           │
//! │  - Wall width    │  - Surface → store       │
//! │  - JSON / share  │                          │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod error;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod panel;
pub mod session;
pub mod size;
pub mod sync;
pub mod transform;
pub mod wall;

pub use codec::{PanelRecord, SessionCodec, SessionRecord};
pub use error::{LayoutError, LayoutResult};
pub use event::{PointerEvent, PointerPhase};
pub use geometry::{Depth, FillMode, PanelGeometry, Point, Rect, Size};
pub use layout::{LayoutStore, ROTATION_STEP_DEG};
pub use panel::{Panel, PanelId};
pub use session::Session;
pub use size::{PanelSizeClass, Shape};
pub use sync::{synchronize, InteractiveSurface, SurfacePanelState};
pub use transform::{CoordinateTransform, PREVIEW_WIDTH};
pub use wall::WallWidth;

/// Panel core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
