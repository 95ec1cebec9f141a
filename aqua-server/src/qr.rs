//! QR code rendering
//!
//! A bottle's QR code encodes its identifier and is stored as a base64 PNG.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Renders a payload into the stored QR representation
///
/// Implementations must be pure functions of the payload.
pub trait QrRenderer: Send + Sync {
    fn render(&self, payload: &str) -> Result<String, QrError>;
}

/// Base64-encoded PNG renderer
#[derive(Debug, Clone, Copy)]
pub struct PngQrRenderer {
    /// Pixel size of one QR module
    pub module_size: u32,
}

impl Default for PngQrRenderer {
    fn default() -> Self {
        Self { module_size: 10 }
    }
}

impl QrRenderer for PngQrRenderer {
    fn render(&self, payload: &str) -> Result<String, QrError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)?;
        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_size, self.module_size)
            .quiet_zone(true)
            .build();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(image).write_to(&mut png, ImageFormat::Png)?;
        Ok(STANDARD.encode(png.into_inner()))
    }
}
