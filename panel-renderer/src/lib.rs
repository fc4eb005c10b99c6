//! # Panel Wall Renderer
//!
//! Two thin adapters over the shared geometry in `panel-core`: an interactive
//! preview surface and a full-resolution raster compositor.
//!
//! ## Rendering Paths
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         panel_core::PanelGeometry           │
//! ├──────────────────────┬──────────────────────┤
//! │ PreviewSurface       │ ExportCompositor     │
//! │ (drag / SVG, 800 u)  │ (photo pixels, PNG)  │
//! ├──────────────────────┴──────────────────────┤
//! │   raster: fill → mask → rotate → blend      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod detect;
pub mod error;
pub mod export;
pub mod image;
pub mod preview;
pub mod raster;
pub mod texture_cache;

pub use crate::image::{decode_photo, encode_png, ImageFormat};
pub use catalog::TextureCatalog;
pub use detect::{detect_wall, WallBounds, WallDetection};
pub use error::{RenderError, RenderResult};
pub use export::{ExportCompositor, ExportConfig, ExportOutput};
pub use preview::{PreviewRegion, PreviewSurface};
pub use texture_cache::{CacheStats, TextureCache, TextureCacheConfig};

/// Resampling filters accepted by [`ExportConfig`].
pub use ::image::imageops::FilterType;
