use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Luma};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Smallest width and height of a rendered ticket, in pixels.
pub const TICKET_MIN_DIMENSION: u32 = 300;

const TICKET_EC_LEVEL: EcLevel = EcLevel::M;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("ticket token cannot be encoded as a QR code: {0}")]
    Encoding(#[from] QrError),

    #[error("failed to write ticket image: {0}")]
    Image(#[from] image::ImageError),
}

/// Renders ticket tokens as QR code PNGs.
///
/// Size, quiet zone and error correction are fixed, so the same token always
/// produces the same bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketRenderer;

impl TicketRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, token: &str) -> Result<Vec<u8>, RenderError> {
        let code = QrCode::with_error_correction_level(token.as_bytes(), TICKET_EC_LEVEL)?;
        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .min_dimensions(TICKET_MIN_DIMENSION, TICKET_MIN_DIMENSION)
            .build();

        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }

    /// The PNG as a `data:` URL, ready to inline in an HTML document.
    pub fn render_data_url(&self, token: &str) -> Result<String, RenderError> {
        let png = self.render(token)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}
