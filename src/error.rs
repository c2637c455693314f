use qrcode::types::QrError;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LabelError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [image] failed to decode or encode a raster
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// [quick_xml] failed to read the run export
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    /// [serde_json] failed to serialise a payload
    Json(#[from] serde_json::Error),

    #[error("payload does not fit the configured QR code: {0}")]
    /// The payload is too large for the QR version / error correction combination
    CapacityExceeded(#[from] QrError),

    #[error("record is missing required field `{field}`")]
    /// A caption field is absent, so the record cannot be laid out
    MalformedRecord { field: &'static str },

    #[error("{asset} unavailable: {reason}")]
    /// A font or logo could not be loaded
    AssetUnavailable { asset: &'static str, reason: String },

    #[error("{records} records do not fit on a sheet of {capacity} cells")]
    /// More records were handed to a single-sheet layout than it has cells
    GridOverflow { records: usize, capacity: usize },

    #[error("invalid dimension: {0}")]
    /// A physical or pixel dimension is zero, negative, or too small to lay out
    InvalidDimension(String),

    #[error("invalid format `{0}`, expected `a4` or `<width>x<height>` in millimetres")]
    /// A print format string could not be parsed
    InvalidFormat(String),
}
