// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Overlay rendering capability.
//!
//! Drawing is optional: the bridge is handed an [`OverlayRenderer`] at
//! startup. [`NoOverlay`] is always available; the drawing implementation,
//! [`ImageOverlay`](crate::annotate::ImageOverlay), needs the `annotate`
//! feature.

use std::io::Cursor;
use std::path::Path;

use base64::{Engine, prelude::BASE64_STANDARD};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// JPEG quality for encoded overlays.
pub const JPEG_QUALITY: u8 = 90;

/// Draws predictions onto the source image.
pub trait OverlayRenderer {
    /// Render `predictions` over the image at `image_path`.
    ///
    /// Returns `Ok(None)` when there is nothing to draw or drawing is
    /// unavailable, otherwise the base64-encoded JPEG.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be loaded or the overlay cannot be
    /// encoded. Callers treat this as "no overlay".
    fn render(&self, image_path: &Path, predictions: &[&Value]) -> Result<Option<String>>;
}

/// Renderer used when drawing is unavailable or disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlay;

impl OverlayRenderer for NoOverlay {
    fn render(&self, _image_path: &Path, _predictions: &[&Value]) -> Result<Option<String>> {
        Ok(None)
    }
}

impl<R: OverlayRenderer + ?Sized> OverlayRenderer for Box<R> {
    fn render(&self, image_path: &Path, predictions: &[&Value]) -> Result<Option<String>> {
        (**self).render(image_path, predictions)
    }
}

/// Encode an RGB canvas as JPEG and return it base64-encoded.
///
/// # Errors
///
/// Returns an error if JPEG encoding fails (e.g. a zero-sized canvas).
pub fn encode_jpeg_base64(canvas: &RgbImage) -> Result<String> {
    let mut bytes = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(canvas)
        .map_err(|e| BridgeError::EncodeError(e.to_string()))?;
    Ok(BASE64_STANDARD.encode(bytes.into_inner()))
}
