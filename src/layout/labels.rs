use super::text::{CellSize, Caption, FitStrategy, HeuristicFit};
use super::CodedRecord;
use crate::canvas::PageCanvas;
use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::font::Font;
use crate::logo::Logo;
use crate::pagesize::{self, PixelSize};
use crate::units::{PhysicalDimension, DPI};
use crate::LabelError;
use image::imageops::FilterType;
use log::{debug, info};
use std::num::NonZeroU32;

/// Logo width to height, as drawn
pub const LOGO_ASPECT: (u32, u32) = (239, 163);

/// Geometry and styling of the label document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOptions {
    /// Physical label size; [pagesize::DEFAULT_LABEL] when [None]
    pub dimension: Option<PhysicalDimension>,
    /// Consecutive copies of each label
    pub multiples: NonZeroU32,
    pub dpi: u32,
    /// Code size as a share of the label height
    pub code_ratio: f32,
    /// Logo width as a share of the label height
    pub logo_ratio: f32,
    pub ink: Colour,
    pub resample: FilterType,
}

impl Default for LabelOptions {
    fn default() -> Self {
        LabelOptions {
            dimension: None,
            multiples: NonZeroU32::MIN,
            dpi: DPI,
            code_ratio: 0.95,
            logo_ratio: 0.25,
            ink: colours::BLACK,
            resample: FilterType::Lanczos3,
        }
    }
}

impl LabelOptions {
    pub fn with_dimension(mut self, dimension: PhysicalDimension) -> Self {
        self.dimension = Some(dimension);
        self
    }

    pub fn with_multiples(mut self, multiples: NonZeroU32) -> Self {
        self.multiples = multiples;
        self
    }

    /// Pixel size of one label
    pub fn label_size(&self) -> Result<PixelSize, LabelError> {
        let Some(dimension) = self.dimension else {
            return Ok(pagesize::DEFAULT_LABEL);
        };
        if !(dimension.width.0 > 0.0 && dimension.height.0 > 0.0) {
            return Err(LabelError::InvalidDimension(format!(
                "label must be larger than 0mm, got {}x{}mm",
                dimension.width, dimension.height
            )));
        }
        let size = dimension.to_px(self.dpi);
        if size.0 == 0 || size.1 == 0 {
            return Err(LabelError::InvalidDimension(format!(
                "{}x{}mm is less than a pixel at {} dpi",
                dimension.width, dimension.height, self.dpi
            )));
        }
        Ok(size)
    }
}

/// Where things go on a single label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelGeometry {
    pub size: PixelSize,
    pub code_size: u32,
    /// Gap between the code and the label's top and left edges
    pub buffer: u32,
    pub logo_size: (u32, u32),
    pub logo_origin: (u32, u32),
    pub text_origin: (u32, u32),
}

impl LabelGeometry {
    pub fn new(size: PixelSize, code_ratio: f32, logo_ratio: f32) -> LabelGeometry {
        let (width, height) = size;
        let code_size = (height as f32 * code_ratio) as u32;
        let buffer = height.saturating_sub(code_size) / 2;
        let inset = 4 * buffer;

        let logo_width = (height as f32 * logo_ratio) as u32;
        let logo_height = logo_width * LOGO_ASPECT.1 / LOGO_ASPECT.0;

        LabelGeometry {
            size,
            code_size,
            buffer,
            logo_size: (logo_width, logo_height),
            logo_origin: (
                width.saturating_sub(logo_width + inset),
                height.saturating_sub(logo_height + inset),
            ),
            text_origin: (code_size, inset),
        }
    }
}

/// Produces one page per label, each showing a code, a caption and the logo, with
/// every label repeated [LabelOptions::multiples] times back to back
pub struct LabelLayout<'a> {
    options: LabelOptions,
    font: &'a Font,
    logo: &'a Logo,
    fit: Box<dyn FitStrategy + 'a>,
}

impl<'a> LabelLayout<'a> {
    pub fn new(font: &'a Font, logo: &'a Logo) -> LabelLayout<'a> {
        LabelLayout {
            options: LabelOptions::default(),
            font,
            logo,
            fit: Box::new(HeuristicFit::label()),
        }
    }

    pub fn with_options(mut self, options: LabelOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the caption fitting strategy without touching the label geometry
    pub fn with_fit_strategy<F: FitStrategy + 'a>(mut self, fit: F) -> Self {
        self.fit = Box::new(fit);
        self
    }

    pub fn options(&self) -> &LabelOptions {
        &self.options
    }

    pub fn geometry(&self) -> Result<LabelGeometry, LabelError> {
        Ok(LabelGeometry::new(
            self.options.label_size()?,
            self.options.code_ratio,
            self.options.logo_ratio,
        ))
    }

    /// Lay out every record, in order. The document holds `records.len() * multiples`
    /// pages; all copies of one record come before any copy of the next.
    pub fn layout(&self, records: &[CodedRecord]) -> Result<Document, LabelError> {
        info!("compiling printable labels for {} record(s)", records.len());
        for entry in records {
            entry.record.validate()?;
        }

        let geometry = self.geometry()?;
        debug!(
            "labels are {}x{}px at {} dpi, codes {}px",
            geometry.size.0, geometry.size.1, self.options.dpi, geometry.code_size
        );
        let logo = self.logo.resized(geometry.logo_size.0, geometry.logo_size.1);

        let mut document = Document::default();
        let copies = self.options.multiples.get();
        for entry in records {
            let raster = self.compose(&geometry, &logo, entry).finish();
            document.push_copies(raster, copies);
        }

        debug!(
            "generated {} labels ({} for each site)",
            document.page_count(),
            copies
        );
        Ok(document)
    }

    /// The caption for one record: wrapped site name, an underscore rule as wide as the
    /// wrap width, a blank line and the sample identifier
    pub fn caption(&self, geometry: &LabelGeometry, entry: &CodedRecord) -> Caption {
        let cell = CellSize::new(geometry.size.0, geometry.size.1);
        let site = &entry.record.site_name;
        let id_line = format!("Sample ID: {}", entry.record.sample_id);
        let fit = self.fit.fit(cell, &format!("{site}\n{id_line}"));
        let rule = "_".repeat(fit.wrap_width);
        Caption::compose(fit, site, vec![rule, String::new(), id_line])
    }

    fn compose(&self, geometry: &LabelGeometry, logo: &image::RgbaImage, entry: &CodedRecord) -> PageCanvas {
        let (width, height) = geometry.size;
        let mut canvas = PageCanvas::new(width, height, self.options.dpi);

        canvas.paste_code(
            &entry.code,
            geometry.code_size,
            geometry.buffer,
            geometry.buffer,
            self.options.resample,
        );
        canvas.composite(logo, geometry.logo_origin.0, geometry.logo_origin.1);

        let caption = self.caption(geometry, entry);
        canvas.draw_text(
            self.font,
            caption.fit.font_size as f32,
            geometry.text_origin,
            &caption.text(),
            self.options.ink,
        );

        canvas
    }
}
