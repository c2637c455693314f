//! Page composition: where codes, captions, borders and logos go.
//!
//! Two layouts are available:
//!
//! - [`SheetLayout`](crate::layout::SheetLayout) - a grid of codes with captions on an A4 sheet
//! - [`LabelLayout`](crate::layout::LabelLayout) - one label per page, each repeated a number of times
//!
//! Both take the records in the order they should be printed and never reorder them.
//! Caption size and wrapping is decided by a [`FitStrategy`](crate::layout::FitStrategy),
//! [`HeuristicFit`](crate::layout::HeuristicFit) by default.
//!
//! # Example
//!
//! ```no_run
//! use sample_labels::layout::{CodedRecord, SheetLayout};
//! use sample_labels::{CodeSource, Font, QrCodeSource, Record};
//!
//! let font = Font::system_default().expect("a system font");
//! let source = QrCodeSource::default();
//! let record = Record::new("Lakes", "Lake A", "S1");
//! let code = source.encode("S1").expect("fits in a QR code");
//!
//! let document = SheetLayout::new(&font)
//!     .layout(&[CodedRecord::new(code, record)])
//!     .expect("one record fits on a sheet");
//! document.save("lakes_a4.pdf").expect("can write the sheet");
//! ```

mod grid;
mod labels;
mod margins;
mod sheet;
mod text;

pub use grid::*;
pub use labels::*;
pub use margins::*;
pub use sheet::*;
pub use text::*;

use crate::record::Record;
use image::GrayImage;

/// A record together with the code image that represents it
#[derive(Debug, Clone)]
pub struct CodedRecord {
    pub code: GrayImage,
    pub record: Record,
}

impl CodedRecord {
    pub fn new(code: GrayImage, record: Record) -> CodedRecord {
        CodedRecord { code, record }
    }
}
