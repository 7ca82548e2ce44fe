//! PNG encoding of flattened drawings, image decoding, and data URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;
use tiny_skia::{ColorU8, Pixmap};

/// Prefix of a base64 PNG data URL.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Export and import errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("Image decoding failed: {0}")]
    Decode(String),
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
    #[error("Invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// A flattened drawing encoded as PNG.
///
/// Owns its bytes: once produced it is independent of the surface, so edits
/// made while a save is in flight cannot affect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ExportedImage {
    /// Encode as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> String {
        format!("{}{}", PNG_DATA_URL_PREFIX, BASE64.encode(&self.png))
    }

    /// Decode back into a pixmap.
    pub fn decode(&self) -> ExportResult<Pixmap> {
        decode_image(&self.png)
    }
}

/// Encode a premultiplied pixmap as an RGBA8 PNG.
pub fn encode_png(pixmap: &Pixmap) -> ExportResult<ExportedImage> {
    let width = pixmap.width();
    let height = pixmap.height();

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = ::png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(::png::ColorType::Rgba);
        encoder.set_depth(::png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer
            .write_image_data(&rgba)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
    }

    Ok(ExportedImage {
        png: png_data,
        width,
        height,
    })
}

/// Decode any supported raster format (PNG, JPEG) into a premultiplied pixmap.
pub fn decode_image(bytes: &[u8]) -> ExportResult<Pixmap> {
    let decoded = ::image::load_from_memory(bytes).map_err(|e| ExportError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::InvalidSize { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Extract the payload of a base64 data URL.
pub fn decode_data_url(url: &str) -> ExportResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ExportError::InvalidDataUrl("missing 'data:' scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ExportError::InvalidDataUrl("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(ExportError::InvalidDataUrl(format!(
            "unsupported encoding '{}'",
            header
        )));
    }
    BASE64
        .decode(payload)
        .map_err(|e| ExportError::InvalidDataUrl(e.to_string()))
}

/// Decode raw image bytes or a UTF-8 data URL holding an image.
pub fn decode_image_source(bytes: &[u8]) -> ExportResult<Pixmap> {
    if bytes.starts_with(b"data:") {
        let url = std::str::from_utf8(bytes)
            .map_err(|e| ExportError::InvalidDataUrl(e.to_string()))?;
        decode_image(&decode_data_url(url)?)
    } else {
        decode_image(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    fn sample_pixmap() -> Pixmap {
        let mut pixmap = Pixmap::new(4, 3).unwrap();
        pixmap.fill(Color::from_rgba8(200, 100, 50, 255));
        pixmap.pixels_mut()[0] = ColorU8::from_rgba(0, 0, 0, 0).premultiply();
        pixmap
    }

    #[test]
    fn test_encode_produces_png() {
        let image = encode_png(&sample_pixmap()).unwrap();
        assert_eq!(image.width, 4);
        assert_eq!(image.height, 3);
        assert_eq!(&image.png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let pixmap = sample_pixmap();
        assert_eq!(encode_png(&pixmap).unwrap(), encode_png(&pixmap).unwrap());
    }

    #[test]
    fn test_decode_restores_pixels() {
        let pixmap = sample_pixmap();
        let decoded = encode_png(&pixmap).unwrap().decode().unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
        assert_eq!(decoded.data(), pixmap.data());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(decode_image(b"not an image"), Err(ExportError::Decode(_))));
    }

    #[test]
    fn test_data_url() {
        let image = encode_png(&sample_pixmap()).unwrap();
        let url = image.to_data_url();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));
        assert_eq!(decode_data_url(&url).unwrap(), image.png);

        let pixmap = decode_image_source(url.as_bytes()).unwrap();
        assert_eq!(pixmap.width(), 4);
    }

    #[test]
    fn test_invalid_data_urls() {
        assert!(matches!(decode_data_url("image/png;base64,AAAA"), Err(ExportError::InvalidDataUrl(_))));
        assert!(matches!(decode_data_url("data:image/png;base64"), Err(ExportError::InvalidDataUrl(_))));
        assert!(matches!(decode_data_url("data:text/plain,hello"), Err(ExportError::InvalidDataUrl(_))));
        assert!(matches!(decode_data_url("data:image/png;base64,@@@"), Err(ExportError::InvalidDataUrl(_))));
    }
}
