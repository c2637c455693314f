//! Physical units and the conversions between them.
//!
//! Every raster in this crate is produced at a fixed [DPI]; millimetres only
//! appear at the edges (label sizes requested by the caller) and points only
//! appear when the finished rasters are placed into PDF pages.

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub};

/// Dots per inch used for every pixel / millimetre conversion
pub const DPI: u32 = 300;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// PDF points per inch
pub const PT_PER_INCH: f64 = 72.0;

/// A length in millimetres
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Add, AddAssign, Sub, Deref, Display, From, Into)]
pub struct Mm(pub f32);

/// A length in PDF points (1/72 of an inch)
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Add, AddAssign, Sub, Deref, Display, From, Into)]
pub struct Pt(pub f32);

impl Mm {
    /// Convert to whole pixels at the given resolution, rounding to the nearest pixel.
    /// The conversion is computed from scratch every time, so rounding never accumulates.
    pub fn to_px(self, dpi: u32) -> u32 {
        let px = (self.0 as f64) * (dpi as f64) / MM_PER_INCH;
        px.round().max(0.0) as u32
    }
}

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(((mm.0 as f64) * PT_PER_INCH / MM_PER_INCH) as f32)
    }
}

/// Convert a pixel length at `dpi` into PDF points
pub fn px_to_pt(px: u32, dpi: u32) -> Pt {
    Pt(((px as f64) * PT_PER_INCH / (dpi as f64)) as f32)
}

/// The physical size of a single label, in millimetres
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicalDimension {
    pub width: Mm,
    pub height: Mm,
}

impl PhysicalDimension {
    pub fn new<W: Into<Mm>, H: Into<Mm>>(width: W, height: H) -> PhysicalDimension {
        PhysicalDimension {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Pixel size of the label at the given resolution
    pub fn to_px(&self, dpi: u32) -> (u32, u32) {
        (self.width.to_px(dpi), self.height.to_px(dpi))
    }
}

/// Convert a (width, height) pair in millimetres to pixels at [DPI]
pub fn to_px(width_mm: f32, height_mm: f32) -> (u32, u32) {
    PhysicalDimension::new(Mm(width_mm), Mm(height_mm)).to_px(DPI)
}
