use crate::LabelError;
use log::{debug, warn};
use rusttype::{point, Scale};
use std::path::{Path, PathBuf};

/// Fonts tried, in order, by [Font::system_default]
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

/// A parsed TrueType / OpenType font used to rasterise captions.
///
/// Sizes are given in pixels: a size of `n` makes the distance from the
/// lowest descender to the highest ascender `n` pixels tall.
pub struct Font {
    face: rusttype::Font<'static>,
}

impl Font {
    /// Load a font from raw bytes, returning an error if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LabelError> {
        let face = rusttype::Font::try_from_vec(bytes).ok_or_else(|| {
            LabelError::AssetUnavailable {
                asset: "font",
                reason: "font data could not be parsed".to_string(),
            }
        })?;
        Ok(Font { face })
    }

    pub fn load_from_disk<P: AsRef<Path>>(path: P) -> Result<Font, LabelError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| LabelError::AssetUnavailable {
            asset: "font",
            reason: format!("{}: {e}", path.display()),
        })?;
        Font::load(bytes)
    }

    /// Load the first usable font from [SYSTEM_FONT_CANDIDATES]. Falling back past
    /// the first candidate is logged but is not an error.
    pub fn system_default() -> Result<Font, LabelError> {
        Font::first_available(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from))
    }

    /// Load the first font in `paths` that exists and parses
    pub fn first_available<I: IntoIterator<Item = PathBuf>>(paths: I) -> Result<Font, LabelError> {
        let mut tried = Vec::new();
        for path in paths {
            match Font::load_from_disk(&path) {
                Ok(font) => {
                    if !tried.is_empty() {
                        warn!("using fallback font {}", path.display());
                    } else {
                        debug!("using font {}", path.display());
                    }
                    return Ok(font);
                }
                Err(_) => tried.push(path.display().to_string()),
            }
        }
        Err(LabelError::AssetUnavailable {
            asset: "font",
            reason: format!("none of [{}] could be loaded", tried.join(", ")),
        })
    }

    pub(crate) fn face(&self) -> &rusttype::Font<'static> {
        &self.face
    }

    pub(crate) fn scale(size: f32) -> Scale {
        Scale::uniform(size)
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: f32) -> f32 {
        self.face.v_metrics(Font::scale(size)).ascent
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: f32) -> f32 {
        self.face.v_metrics(Font::scale(size)).descent
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: f32) -> f32 {
        let v = self.face.v_metrics(Font::scale(size));
        v.ascent - v.descent + v.line_gap
    }

    /// Calculate the width of a single line of text given the font size
    pub fn width_of_text(&self, text: &str, size: f32) -> f32 {
        self.face
            .layout(text, Font::scale(size), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}
