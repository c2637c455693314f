//! Pre-defined raster sizes for the supported print formats.
//!
//! All sizes are (width, height) in pixels at [`DPI`](crate::DPI).

use crate::units::{px_to_pt, Pt};

/// Raster dimensions as (width, height) in pixels
pub type PixelSize = (u32, u32);

/// ISO A4 at 300 DPI
pub const A4: PixelSize = (2480, 3508);

/// The label size used when no physical dimension is requested. This is a
/// prebaked pixel size (roughly 90 x 29 mm), not derived from a millimetre value.
/// Converting 90 x 29 mm gives 1063 x 343 when rounded and 1062 x 342 when truncated;
/// this size matches neither.
pub const DEFAULT_LABEL: PixelSize = (1063, 342);

/// Convert a raster size into a PDF media box size in points
pub fn to_points(size: PixelSize, dpi: u32) -> (Pt, Pt) {
    (px_to_pt(size.0, dpi), px_to_pt(size.1, dpi))
}
