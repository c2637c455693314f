//! Turning payload strings into square code images.

use crate::LabelError;
use image::{GrayImage, Luma};
use log::debug;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};

/// Anything that can turn a payload into a square, black-on-white code image
pub trait CodeSource {
    fn encode(&self, payload: &str) -> Result<GrayImage, LabelError>;
}

/// The largest "normal" QR code version
const MAX_VERSION: i16 = 40;

/// QR codes rendered with the `qrcode` crate.
///
/// The defaults match the sampler printouts: version 9, low error correction, an
/// 8-module quiet zone and 10 pixels per module, growing the version when the
/// payload does not fit.
#[derive(Debug, Clone, Copy)]
pub struct QrCodeSource {
    /// The smallest version to use; with `auto_fit` off, the only version used
    pub version: i16,
    pub ec_level: EcLevel,
    /// Width of the blank border, in modules
    pub quiet_zone: u32,
    /// Pixels per module
    pub module_size: u32,
    /// Grow the version until the payload fits instead of failing
    pub auto_fit: bool,
}

impl Default for QrCodeSource {
    fn default() -> Self {
        QrCodeSource {
            version: 9,
            ec_level: EcLevel::L,
            quiet_zone: 8,
            module_size: 10,
            auto_fit: true,
        }
    }
}

impl QrCodeSource {
    pub fn new() -> QrCodeSource {
        QrCodeSource::default()
    }

    pub fn with_version(mut self, version: i16) -> Self {
        self.version = version;
        self
    }

    pub fn with_ec_level(mut self, ec_level: EcLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    pub fn with_quiet_zone(mut self, modules: u32) -> Self {
        self.quiet_zone = modules;
        self
    }

    pub fn with_module_size(mut self, pixels: u32) -> Self {
        self.module_size = pixels.max(1);
        self
    }

    pub fn with_auto_fit(mut self, auto_fit: bool) -> Self {
        self.auto_fit = auto_fit;
        self
    }

    fn build(&self, payload: &str) -> Result<QrCode, QrError> {
        let mut version = self.version;
        loop {
            match QrCode::with_version(payload, Version::Normal(version), self.ec_level) {
                Err(QrError::DataTooLong) if self.auto_fit && version < MAX_VERSION => {
                    version += 1;
                }
                result => return result,
            }
        }
    }

    fn render(&self, code: &QrCode) -> GrayImage {
        let modules = code.width() as u32;
        let size = (modules + self.quiet_zone * 2) * self.module_size;
        let mut img = GrayImage::from_pixel(size, size, Luma([255]));

        for (i, colour) in code.to_colors().into_iter().enumerate() {
            if colour != Color::Dark {
                continue;
            }
            let mx = i as u32 % modules;
            let my = i as u32 / modules;
            let px = (mx + self.quiet_zone) * self.module_size;
            let py = (my + self.quiet_zone) * self.module_size;
            for dy in 0..self.module_size {
                for dx in 0..self.module_size {
                    img.put_pixel(px + dx, py + dy, Luma([0]));
                }
            }
        }

        img
    }
}

impl CodeSource for QrCodeSource {
    fn encode(&self, payload: &str) -> Result<GrayImage, LabelError> {
        let code = self.build(payload)?;
        debug!(
            "encoded {} byte payload as a {}x{} module code",
            payload.len(),
            code.width(),
            code.width()
        );
        Ok(self.render(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_square_with_quiet_zone() {
        let source = QrCodeSource::default();
        let img = source.encode("json:{}").unwrap();
        // version 9 is 53 modules wide
        let expected = (53 + 16) * 10;
        assert_eq!(img.dimensions(), (expected, expected));
        // the quiet zone is blank and the finder pattern corner is dark
        assert_eq!(img.get_pixel(0, 0), &Luma([255]));
        assert_eq!(img.get_pixel(79, 79), &Luma([255]));
        assert_eq!(img.get_pixel(80, 80), &Luma([0]));
    }

    #[test]
    fn is_deterministic() {
        let source = QrCodeSource::default().with_module_size(2);
        assert_eq!(source.encode("S1").unwrap(), source.encode("S1").unwrap());
        assert_ne!(source.encode("S1").unwrap(), source.encode("S2").unwrap());
    }

    #[test]
    fn grows_to_fit_long_payloads() {
        let payload = "x".repeat(500);
        let img = QrCodeSource::default()
            .with_module_size(1)
            .with_quiet_zone(0)
            .encode(&payload)
            .unwrap();
        assert!(img.width() > 53);
    }

    #[test]
    fn fixed_version_overflows() {
        let payload = "x".repeat(500);
        let err = QrCodeSource::default()
            .with_auto_fit(false)
            .encode(&payload)
            .unwrap_err();
        assert!(matches!(err, LabelError::CapacityExceeded(QrError::DataTooLong)));
    }
}
