//! Flattened export of a wall photo with its panels.
//!
//! Re-derives every panel's photo-space geometry from the layout records and
//! composites it at full resolution with the same fill, mask and pivot rules
//! the preview uses.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use panel_core::{
    CoordinateTransform, Depth, FillMode, InteractiveSurface, LayoutStore, Panel, PanelGeometry,
    PanelId, Rect, Session, WallWidth, PREVIEW_WIDTH,
};

use crate::catalog::TextureCatalog;
use crate::error::RenderResult;
use crate::image::{decode_photo, encode_png};
use crate::raster::{composite_panel, render_panel};
use crate::texture_cache::{TextureCache, TextureCacheConfig};

/// Configuration for export and raster preview passes.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// How textures cover panels.
    pub fill: FillMode,
    /// Resampling filter for textures (and the photo, in raster previews).
    pub filter: FilterType,
    /// Shaded sides and highlight; flat panels when `None`.
    pub depth: Option<Depth>,
    /// Largest pixel area a single panel may be rendered at.
    pub max_panel_pixels: u64,
    /// Decoded-texture cache limits.
    pub cache: TextureCacheConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fill: FillMode::Stretch,
            filter: FilterType::Lanczos3,
            depth: None,
            max_panel_pixels: 64 * 1024 * 1024,
            cache: TextureCacheConfig::default(),
        }
    }
}

/// Result of a compositing pass.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// The flattened, opaque image.
    pub image: RgbImage,
    /// Panels left out because their texture was missing or undecodable,
    /// or because they would render larger than
    /// [`ExportConfig::max_panel_pixels`].
    pub skipped: Vec<PanelId>,
}

impl ExportOutput {
    /// Whether every panel was drawn.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Encode the image as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Composites panels onto wall photos.
#[derive(Debug)]
pub struct ExportCompositor {
    config: ExportConfig,
    cache: TextureCache,
}

impl ExportCompositor {
    /// Create a compositor with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let cache = TextureCache::with_config(config.cache.clone());
        Self { config, cache }
    }

    /// Create a compositor with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Decoded-texture cache shared by all passes.
    #[must_use]
    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    /// Composite every panel onto the full-resolution photo.
    ///
    /// The output has the photo's exact pixel dimensions. Panels are drawn in
    /// layout order, later ones on top.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedImageFormat`](crate::RenderError::UnsupportedImageFormat)
    /// if the photo cannot be decoded. Missing or broken textures and
    /// oversized panels only skip their panel; panels entirely outside the
    /// photo are not rendered at all.
    pub fn compose(
        &mut self,
        photo: &[u8],
        wall_width: WallWidth,
        layout: &LayoutStore,
        catalog: &TextureCatalog,
    ) -> RenderResult<ExportOutput> {
        let mut canvas = decode_photo(photo)?;
        let transform = CoordinateTransform::new(wall_width, canvas.width());
        let skipped = self.draw_panels(&mut canvas, layout, catalog, |panel| {
            PanelGeometry::export(panel, &transform)
        });

        tracing::info!(
            "Exported {}x{} image with {} of {} panels",
            canvas.width(),
            canvas.height(),
            layout.len() - skipped.len(),
            layout.len()
        );
        Ok(Self::finish(canvas, skipped))
    }

    /// Synchronize the session with `surface`, then [`compose`](Self::compose).
    ///
    /// # Errors
    ///
    /// Same as [`compose`](Self::compose).
    pub fn compose_session(
        &mut self,
        photo: &[u8],
        session: &mut Session,
        surface: Option<&dyn InteractiveSurface>,
        catalog: &TextureCatalog,
    ) -> RenderResult<ExportOutput> {
        let wall_width = session.wall_width();
        let layout = session.synchronized_layout(surface);
        self.compose(photo, wall_width, layout, catalog)
    }

    /// Raster preview: the photo resized to the preview width with panels
    /// composited at preview scale.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedImageFormat`](crate::RenderError::UnsupportedImageFormat)
    /// if the photo cannot be decoded.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compose_preview(
        &mut self,
        photo: &[u8],
        wall_width: WallWidth,
        layout: &LayoutStore,
        catalog: &TextureCatalog,
    ) -> RenderResult<ExportOutput> {
        let photo = decode_photo(photo)?;
        let transform = CoordinateTransform::new(wall_width, photo.width());
        let height = transform.preview_height(photo.height()).round().max(1.0) as u32;
        let mut canvas = image::imageops::resize(
            &photo,
            PREVIEW_WIDTH as u32,
            height,
            self.config.filter,
        );

        let skipped = self.draw_panels(&mut canvas, layout, catalog, |panel| {
            PanelGeometry::preview(panel, &transform)
        });
        tracing::debug!(
            "Rendered {}x{} raster preview, {} panels skipped",
            canvas.width(),
            canvas.height(),
            skipped.len()
        );
        Ok(Self::finish(canvas, skipped))
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_panels(
        &mut self,
        canvas: &mut RgbaImage,
        layout: &LayoutStore,
        catalog: &TextureCatalog,
        resolve: impl Fn(&Panel) -> PanelGeometry,
    ) -> Vec<PanelId> {
        let visible = Rect {
            x: 0.0,
            y: 0.0,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        };
        let depth = self.config.depth;
        let mut skipped = Vec::new();
        for panel in layout.iter() {
            let texture = match self.cache.get_or_decode(catalog, &panel.material) {
                Ok(texture) => texture,
                Err(e) => {
                    tracing::warn!("Skipping panel {}: {e}", panel.id);
                    skipped.push(panel.id.clone());
                    continue;
                }
            };
            let geometry = resolve(panel);
            let drawn = geometry.drawn_bounds(depth);
            if !drawn.intersects(&visible) {
                tracing::debug!("Panel {} lies outside the image", panel.id);
                continue;
            }
            let area = drawn.width * drawn.height;
            if area > self.config.max_panel_pixels as f64 {
                tracing::warn!(
                    "Skipping panel {}: {area:.0} pixels exceeds the limit of {}",
                    panel.id,
                    self.config.max_panel_pixels
                );
                skipped.push(panel.id.clone());
                continue;
            }
            let rendered = render_panel(
                &texture,
                &geometry,
                self.config.fill,
                self.config.filter,
                depth,
            );
            composite_panel(canvas, &geometry, &rendered);
        }
        skipped
    }

    fn finish(canvas: RgbaImage, skipped: Vec<PanelId>) -> ExportOutput {
        ExportOutput {
            image: DynamicImage::ImageRgba8(canvas).to_rgb8(),
            skipped,
        }
    }
}

impl Default for ExportCompositor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
