//! QR payload encoder.
//!
//! Builds the `WIFI:` configuration string understood by camera apps and
//! renders it into a PNG bitmap, base64-encoded for storage as text.
//!
//! Format: `WIFI:T:<security>;S:<ssid>;P:<password>;H:<hidden>;;`

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::imageops;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::types::credential::SecurityType;
use crate::types::errors::QrCodeError;

/// Side length of the rendered QR image in pixels.
pub const QR_IMAGE_SIZE: u32 = 256;

/// Light modules around the symbol on each side.
const QUIET_ZONE_MODULES: u32 = 4;

/// Characters that must be backslash-escaped inside SSID and password fields.
const SPECIAL_CHARS: [char; 5] = ['\\', ';', ',', ':', '"'];

/// Trait defining QR payload generation.
pub trait QrEncoderTrait {
    /// Builds the WiFi configuration string for the given network.
    fn build_wifi_string(
        &self,
        ssid: &str,
        password: &str,
        security: SecurityType,
        hidden: bool,
    ) -> String;

    /// Renders the WiFi configuration string to a base64-encoded PNG.
    fn generate(
        &self,
        ssid: &str,
        password: &str,
        security: SecurityType,
        hidden: bool,
    ) -> Result<String, QrCodeError>;

    /// Checks that stored QR data is well-formed standard base64.
    fn validate_payload(&self, data: &str) -> Result<(), QrCodeError>;
}

/// QR encoder with medium error correction and a fixed square size.
#[derive(Debug, Clone)]
pub struct QrEncoder {
    size: u32,
}

impl QrEncoder {
    pub fn new() -> Self {
        Self {
            size: QR_IMAGE_SIZE,
        }
    }

    /// Renders arbitrary text to PNG bytes of `size` x `size` pixels.
    fn render_png(&self, content: &str) -> Result<Vec<u8>, QrCodeError> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::M)
            .map_err(|e| QrCodeError::Encoding(format!("failed to generate QR code: {}", e)))?;

        let modules = code.width() as u32 + 2 * QUIET_ZONE_MODULES;
        if modules > self.size {
            return Err(QrCodeError::Encoding(format!(
                "QR symbol of {} modules does not fit in {} pixels",
                modules, self.size
            )));
        }
        let module_px = module_size(code.width() as u32, self.size);

        let rendered = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(module_px, module_px)
            .build();

        // Leftover pixels are split evenly as extra white margin.
        let mut canvas = GrayImage::from_pixel(self.size, self.size, Luma([255u8]));
        let x = (self.size - rendered.width()) / 2;
        let y = (self.size - rendered.height()) / 2;
        imageops::overlay(&mut canvas, &rendered, i64::from(x), i64::from(y));

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| QrCodeError::Encoding(format!("failed to write PNG: {}", e)))?;
        Ok(png)
    }
}

/// Largest whole pixel size per module that fits a symbol of `width`
/// modules plus its quiet zone into `size` pixels.
fn module_size(width: u32, size: u32) -> u32 {
    (size / (width + 2 * QUIET_ZONE_MODULES)).max(1)
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefixes every special character with a backslash, leaving all other
/// characters untouched and in order.
pub fn escape_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl QrEncoderTrait for QrEncoder {
    fn build_wifi_string(
        &self,
        ssid: &str,
        password: &str,
        security: SecurityType,
        hidden: bool,
    ) -> String {
        let password = if security.is_open() {
            String::new()
        } else {
            escape_field(password)
        };
        let hidden = if hidden { "true" } else { "" };

        format!(
            "WIFI:T:{};S:{};P:{};H:{};;",
            security.as_str(),
            escape_field(ssid),
            password,
            hidden
        )
    }

    fn generate(
        &self,
        ssid: &str,
        password: &str,
        security: SecurityType,
        hidden: bool,
    ) -> Result<String, QrCodeError> {
        let wifi_string = self.build_wifi_string(ssid, password, security, hidden);
        let png = self.render_png(&wifi_string)?;
        Ok(BASE64.encode(png))
    }

    fn validate_payload(&self, data: &str) -> Result<(), QrCodeError> {
        BASE64
            .decode(data)
            .map(|_| ())
            .map_err(|e| QrCodeError::Encoding(format!("invalid base64 QR code data: {}", e)))
    }
}
