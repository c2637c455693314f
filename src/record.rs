//! The metadata carried alongside each QR code.

use crate::LabelError;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::collections::HashMap;
use std::io;

/// One sample to print. Records are created at the ingestion boundary and are
/// read-only from then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "RunName")]
    pub run_name: String,
    #[serde(rename = "SampleID")]
    pub sample_id: String,
    #[serde(rename = "SiteName")]
    pub site_name: String,
}

/// How a record is serialised into the string its QR code carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadFormat {
    /// `json:` followed by a JSON object with `RunName`, `SampleID` and `SiteName`
    #[default]
    Json,
    /// An indented `<Sample ID="…">` element
    Xml,
}

impl std::str::FromStr for PayloadFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(PayloadFormat::Json),
            "xml" => Ok(PayloadFormat::Xml),
            _ => Err(LabelError::InvalidFormat(s.to_string())),
        }
    }
}

impl Record {
    pub fn new<R: ToString, S: ToString, I: ToString>(run_name: R, site_name: S, sample_id: I) -> Record {
        Record {
            run_name: run_name.to_string(),
            site_name: site_name.to_string(),
            sample_id: sample_id.to_string(),
        }
    }

    /// Build a record from a loosely-typed field map, such as one handed over by a host
    /// application. `SiteName` and `SampleID` are required; `RunName` defaults to empty.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Record, LabelError> {
        let get = |field: &'static str| {
            fields
                .get(field)
                .cloned()
                .ok_or(LabelError::MalformedRecord { field })
        };
        Ok(Record {
            run_name: fields.get("RunName").cloned().unwrap_or_default(),
            site_name: get("SiteName")?,
            sample_id: get("SampleID")?,
        })
    }

    /// Check that the fields needed for captioning are present
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.site_name.trim().is_empty() {
            return Err(LabelError::MalformedRecord { field: "SiteName" });
        }
        if self.sample_id.trim().is_empty() {
            return Err(LabelError::MalformedRecord { field: "SampleID" });
        }
        Ok(())
    }

    /// `{"RunName": "…", "SampleID": "…", "SiteName": "…"}` with a space after every
    /// separator and non-ASCII characters written as `\uXXXX` escapes
    fn to_spaced_json(&self) -> Result<String, LabelError> {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// The string to encode into this record's QR code
    pub fn payload(&self, format: PayloadFormat) -> Result<String, LabelError> {
        match format {
            PayloadFormat::Json => Ok(format!("json:{}", self.to_spaced_json()?)),
            PayloadFormat::Xml => {
                use quick_xml::escape::escape;
                Ok(format!(
                    "<?xml version=\"1.0\" ?>\n<Sample ID=\"{}\">\n  <RunName>{}</RunName>\n  <SiteName>{}</SiteName>\n</Sample>\n",
                    escape(self.sample_id.as_str()),
                    escape(self.run_name.as_str()),
                    escape(self.site_name.as_str()),
                ))
            }
        }
    }
}

/// Compact JSON with `", "` and `": "` separators and ASCII-only output
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
