//! QR code rendering and persistence.

use crate::{CodeError, CodeResult};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Encoding parameters. Changing any of these changes the output bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrSettings {
    /// Error-correction level
    pub ec_level: EcLevel,
    /// Pixels per module edge
    pub scale: u32,
    /// Whether to draw the 4-module quiet zone around the symbol
    pub quiet_zone: bool,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            scale: 10,
            quiet_zone: true,
        }
    }
}

/// Produces PNG scannable codes for patient links.
#[derive(Debug, Clone, Default)]
pub struct QrCodeService {
    settings: QrSettings,
}

impl QrCodeService {
    pub fn new(settings: QrSettings) -> Self {
        Self { settings }
    }

    /// Encodes `link` into PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns `CodeError` if the link is empty, too long for a QR symbol at the configured
    /// error-correction level, or PNG encoding fails.
    pub fn encode(&self, link: &str) -> CodeResult<Vec<u8>> {
        if link.trim().is_empty() {
            return Err(CodeError::EmptyPayload);
        }

        let code = QrCode::with_error_correction_level(link.as_bytes(), self.settings.ec_level)?;
        let rendered = code
            .render::<Luma<u8>>()
            .module_dimensions(self.settings.scale, self.settings.scale)
            .quiet_zone(self.settings.quiet_zone)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(rendered).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Encodes `link`, writes the PNG to `path` and returns the same bytes.
    ///
    /// Missing parent directories are created. An existing file at `path` is replaced.
    ///
    /// # Errors
    ///
    /// Returns `CodeError` if encoding fails or the directory/file cannot be written. Nothing is
    /// written if encoding fails.
    pub fn encode_to_path(&self, link: &str, path: &Path) -> CodeResult<Vec<u8>> {
        let png = self.encode(link)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CodeError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, &png).map_err(|source| CodeError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("QR code saved to {}", path.display());
        Ok(png)
    }
}
