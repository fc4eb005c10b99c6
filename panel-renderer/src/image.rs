//! Image decoding and encoding helpers.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat as CodecFormat, RgbImage, RgbaImage};

use crate::error::{RenderError, RenderResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        Self::Unknown
    }

    /// MIME type for data URIs.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Decode a wall photo.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedImageFormat`] if the bytes are empty or
/// cannot be decoded.
pub fn decode_photo(data: &[u8]) -> RenderResult<RgbaImage> {
    if data.is_empty() {
        return Err(RenderError::UnsupportedImageFormat(
            "photo is empty".to_string(),
        ));
    }
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::UnsupportedImageFormat(format!("Failed to decode photo: {e}")))?;
    Ok(img.to_rgba8())
}

/// Decode a material texture.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the texture cannot be decoded.
pub fn decode_texture(data: &[u8]) -> RenderResult<RgbaImage> {
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode texture: {e}")))?;
    Ok(img.to_rgba8())
}

/// Pixel dimensions of encoded image bytes, read from the header only.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the format is not recognised.
pub fn image_dimensions(data: &[u8]) -> RenderResult<(u32, u32)> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| RenderError::Resource(format!("Failed to read image header: {e}")))?
        .into_dimensions()
        .map_err(|e| RenderError::Resource(format!("Failed to read image header: {e}")))
}

/// Encode an opaque image as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Export`] if encoding fails.
pub fn encode_png(image: &RgbImage) -> RenderResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, CodecFormat::Png)
        .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode an RGBA image as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Export`] if encoding fails.
pub fn encode_png_rgba(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, CodecFormat::Png)
        .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Wrap raw image bytes in a base64 data URI.
#[must_use]
pub fn to_data_uri(data: &[u8]) -> String {
    let mime = ImageFormat::from_magic_bytes(data).mime();
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    format!("data:{mime};base64,{encoded}")
}

/// Create a solid color texture.
#[must_use]
pub fn create_solid_color(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba(rgba))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_from_extension() {
        assert_eq!(ImageFormat::from_extension("png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("PNG"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("jpg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("gif"), ImageFormat::Unknown);
    }

    #[test]
    fn test_format_detection_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), ImageFormat::Unknown);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_photo(b"definitely not an image"),
            Err(RenderError::UnsupportedImageFormat(_))
        ));
        assert!(matches!(
            decode_photo(&[]),
            Err(RenderError::UnsupportedImageFormat(_))
        ));
    }

    #[test]
    fn test_png_round_trip() {
        let img = create_solid_color(3, 2, [10, 20, 30, 255]);
        let png = encode_png_rgba(&img).expect("encode");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
        let back = decode_photo(&png).expect("decode");
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(1, 1).0, [10, 20, 30, 255]);
        assert_eq!(image_dimensions(&png).expect("header"), (3, 2));
    }

    #[test]
    fn test_data_uri() {
        let png = encode_png_rgba(&create_solid_color(1, 1, [0, 0, 0, 255])).expect("encode");
        let uri = to_data_uri(&png);
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
