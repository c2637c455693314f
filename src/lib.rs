mod canvas;
pub use canvas::*;

mod colour;
pub use colour::*;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Reading sampling runs from the field application's XML export
pub mod ingest;

mod job;
pub use job::*;

/// Composition of codes, captions and logos onto sheets and labels
pub mod layout;

mod logo;
pub use logo::*;

mod page;
pub use page::*;

/// Fixed pixel sizes of the printable formats
pub mod pagesize;

mod qr;
pub use qr::*;

mod record;
pub use record::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for inspecting finished documents
pub use pdf_writer;
