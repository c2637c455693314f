use crate::LabelError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::path::Path;

const NO_MASK: &str = "image has no transparency mask";

/// A transparency-masked image stamped onto every label. Pixels outside the mask are
/// never painted, so the logo must come with an alpha channel.
#[derive(Debug, Clone)]
pub struct Logo {
    image: RgbaImage,
}

impl Logo {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Logo, LabelError> {
        let path = path.as_ref();
        let unavailable = |reason: String| LabelError::AssetUnavailable {
            asset: "logo",
            reason: format!("{}: {reason}", path.display()),
        };

        let data = std::fs::read(path).map_err(|e| unavailable(e.to_string()))?;
        let format = image::guess_format(&data).map_err(|e| unavailable(e.to_string()))?;
        let image = image::load_from_memory_with_format(&data, format)
            .map_err(|e| unavailable(e.to_string()))?;
        Logo::from_image(image).map_err(|_| unavailable(NO_MASK.to_string()))
    }

    /// Use an already-decoded image. Fails if the image carries no alpha channel.
    pub fn from_image(image: DynamicImage) -> Result<Logo, LabelError> {
        if !image.color().has_alpha() {
            return Err(LabelError::AssetUnavailable {
                asset: "logo",
                reason: NO_MASK.to_string(),
            });
        }
        Ok(Logo {
            image: image.to_rgba8(),
        })
    }

    pub fn from_rgba(image: RgbaImage) -> Logo {
        Logo { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// A resized copy, ready to composite
    pub fn resized(&self, width: u32, height: u32) -> RgbaImage {
        imageops::resize(&self.image, width.max(1), height.max(1), FilterType::Triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    #[test]
    fn requires_alpha() {
        let opaque = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        assert!(matches!(
            Logo::from_image(opaque),
            Err(LabelError::AssetUnavailable { asset: "logo", .. })
        ));
        let masked = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])));
        assert!(Logo::from_image(masked).is_ok());
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = Logo::load("/no/such/logo.png").unwrap_err();
        assert!(matches!(err, LabelError::AssetUnavailable { asset: "logo", .. }));
        assert!(err.to_string().contains("/no/such/logo.png"));
    }

    #[test]
    fn opaque_file_is_rejected_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opaque.png");
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])).save(&path).unwrap();
        let err = Logo::load(&path).unwrap_err();
        assert!(matches!(err, LabelError::AssetUnavailable { asset: "logo", .. }));
        let message = err.to_string();
        assert!(message.contains("opaque.png"));
        assert_eq!(message.matches(NO_MASK).count(), 1);
    }

    #[test]
    fn loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        RgbaImage::from_pixel(239, 163, Rgba([10, 20, 30, 128]))
            .save(&path)
            .unwrap();
        let logo = Logo::load(&path).unwrap();
        assert_eq!((logo.width(), logo.height()), (239, 163));
        assert_eq!(logo.resized(85, 57).dimensions(), (85, 57));
    }
}
