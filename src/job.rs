//! Running every requested printout for one set of records.

use crate::font::Font;
use crate::info::Info;
use crate::layout::{CodedRecord, LabelLayout, LabelOptions, SheetLayout, SheetOptions};
use crate::logo::Logo;
use crate::qr::CodeSource;
use crate::record::{PayloadFormat, Record};
use crate::units::{Mm, PhysicalDimension};
use crate::LabelError;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A printout to produce
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    /// A single A4 sheet of codes and captions
    A4,
    /// One label per page at the given physical size
    Label(PhysicalDimension),
}

impl FromStr for Format {
    type Err = LabelError;

    /// Parses `a4` or `<width>x<height>` in millimetres, e.g. `62x29` or `62.5x29`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "a4" {
            return Ok(Format::A4);
        }

        let invalid = || LabelError::InvalidFormat(s.to_string());
        let (width, height) = lower.split_once('x').ok_or_else(invalid)?;
        let width: f32 = width.trim().parse().map_err(|_| invalid())?;
        let height: f32 = height.trim().parse().map_err(|_| invalid())?;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(invalid());
        }
        Ok(Format::Label(PhysicalDimension::new(Mm(width), Mm(height))))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::A4 => write!(f, "a4"),
            Format::Label(dimension) => write!(f, "{}x{}", dimension.width, dimension.height),
        }
    }
}

/// Everything needed to turn a list of records into printable files.
///
/// Output files are named after `prefix`: `<prefix>_a4.pdf` for the sheet and
/// `<prefix>_labels.pdf` for labels (`<prefix>_labels_<W>x<H>.pdf` when more than one
/// label size is requested).
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub prefix: PathBuf,
    pub formats: Vec<Format>,
    /// Copies of each label
    pub multiples: NonZeroU32,
    pub payload: PayloadFormat,
    pub sheet: SheetOptions,
    pub info: Option<Info>,
}

impl PrintJob {
    /// A job writing an A4 sheet next to `prefix`
    pub fn new<P: Into<PathBuf>>(prefix: P) -> PrintJob {
        PrintJob {
            prefix: prefix.into(),
            formats: vec![Format::A4],
            multiples: NonZeroU32::MIN,
            payload: PayloadFormat::default(),
            sheet: SheetOptions::default(),
            info: None,
        }
    }

    /// The printouts made when a sampling run is registered with the lab: an A4 sheet
    /// and two copies of every 62x29mm label, named `<run>_[<technician>]`
    pub fn for_run<P: AsRef<Path>>(output_dir: P, run_name: &str, technician: Option<&str>) -> PrintJob {
        let name = match technician {
            Some(tech) => format!("{run_name}_[{tech}]"),
            None => run_name.to_string(),
        };
        PrintJob::new(output_dir.as_ref().join(name))
            .with_formats(vec![
                Format::A4,
                Format::Label(PhysicalDimension::new(Mm(62.0), Mm(29.0))),
            ])
            .with_multiples(NonZeroU32::new(2).unwrap_or(NonZeroU32::MIN))
            .with_info(Info::for_run(run_name, technician))
    }

    pub fn with_formats(mut self, formats: Vec<Format>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_multiples(mut self, multiples: NonZeroU32) -> Self {
        self.multiples = multiples;
        self
    }

    pub fn with_payload(mut self, payload: PayloadFormat) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_sheet_options(mut self, sheet: SheetOptions) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_info(mut self, info: Info) -> Self {
        self.info = Some(info);
        self
    }

    /// Where `format` is written
    pub fn output_path(&self, format: &Format) -> PathBuf {
        let suffix = match format {
            Format::A4 => "_a4.pdf".to_string(),
            Format::Label(_) if self.label_formats() > 1 => format!("_labels_{format}.pdf"),
            Format::Label(_) => "_labels.pdf".to_string(),
        };
        let mut name = OsString::from(self.prefix.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    fn label_formats(&self) -> usize {
        self.formats
            .iter()
            .filter(|f| matches!(f, Format::Label(_)))
            .count()
    }

    /// Encode every record once, lay out each format, and only then write the files.
    /// Returns the written paths in format order. Nothing is written if any record or
    /// format fails, and files already written are removed again if a later one cannot be.
    pub fn run(
        &self,
        records: &[Record],
        source: &dyn CodeSource,
        font: &Font,
        logo: Option<&Logo>,
    ) -> Result<Vec<PathBuf>, LabelError> {
        let logo = if self.label_formats() > 0 {
            Some(logo.ok_or_else(|| LabelError::AssetUnavailable {
                asset: "logo",
                reason: "label printouts need a logo".to_string(),
            })?)
        } else {
            None
        };

        let coded = records
            .iter()
            .map(|record| {
                record.validate()?;
                let code = source.encode(&record.payload(self.payload)?)?;
                Ok(CodedRecord::new(code, record.clone()))
            })
            .collect::<Result<Vec<_>, LabelError>>()?;

        let mut rendered = Vec::with_capacity(self.formats.len());
        for format in self.formats.iter() {
            let mut document = match (format, logo) {
                (Format::A4, _) => SheetLayout::new(font)
                    .with_options(self.sheet)
                    .layout(&coded)?,
                (Format::Label(dimension), Some(logo)) => LabelLayout::new(font, logo)
                    .with_options(
                        LabelOptions::default()
                            .with_dimension(*dimension)
                            .with_multiples(self.multiples),
                    )
                    .layout(&coded)?,
                (Format::Label(_), None) => continue,
            };
            if let Some(info) = &self.info {
                document.set_info(info.clone());
            }
            rendered.push((self.output_path(format), document));
        }

        let mut written = Vec::with_capacity(rendered.len());
        for (path, document) in rendered {
            if let Err(e) = document.save(&path) {
                if path.is_file() {
                    written.push(path);
                }
                remove_outputs(&written);
                return Err(e);
            }
            info!("saved {} page(s) to {}", document.page_count(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Delete the files of a job that failed part way through writing
fn remove_outputs(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("removed {}", path.display()),
            Err(e) => warn!("could not remove {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrCodeSource;
    use image::{Rgba, RgbaImage};

    fn dejavu() -> Font {
        Font::load(include_bytes!("../assets/DejaVuSans.ttf").to_vec()).expect("can load font")
    }

    fn logo() -> Logo {
        Logo::from_rgba(RgbaImage::from_pixel(239, 163, Rgba([0, 80, 160, 255])))
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new("Lakes", "Lake A", "S1"),
            Record::new("Lakes", "Lake B", "S2"),
        ]
    }

    #[test]
    fn parses_formats() {
        assert_eq!("A4".parse::<Format>().unwrap(), Format::A4);
        assert_eq!(
            "62x29".parse::<Format>().unwrap(),
            Format::Label(PhysicalDimension::new(Mm(62.0), Mm(29.0)))
        );
        assert_eq!(
            "62.5X29".parse::<Format>().unwrap(),
            Format::Label(PhysicalDimension::new(Mm(62.5), Mm(29.0)))
        );
        for bad in ["", "a5", "62", "62x", "x29", "0x29", "-1x29", "62xabc"] {
            assert!(
                matches!(bad.parse::<Format>(), Err(LabelError::InvalidFormat(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn names_outputs_after_prefix() {
        let job = PrintJob::for_run("/out", "Lakes", Some("Nic"));
        assert_eq!(job.multiples.get(), 2);
        assert_eq!(job.output_path(&Format::A4), PathBuf::from("/out/Lakes_[Nic]_a4.pdf"));
        assert_eq!(
            job.output_path(&job.formats[1]),
            PathBuf::from("/out/Lakes_[Nic]_labels.pdf")
        );

        let job = PrintJob::new("/out/run_1_printable").with_formats(vec![
            "62x29".parse().unwrap(),
            "90x38".parse().unwrap(),
        ]);
        assert_eq!(
            job.output_path(&job.formats[1]),
            PathBuf::from("/out/run_1_printable_labels_90x38.pdf")
        );
    }

    #[test]
    fn writes_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let job = PrintJob::for_run(dir.path(), "Lakes", Some("Nic"));
        let source = QrCodeSource::default().with_module_size(2);
        let font = dejavu();
        let logo = logo();

        let written = job.run(&records(), &source, &font, Some(&logo)).unwrap();
        assert_eq!(written.len(), 2);
        for path in written.iter() {
            let bytes = std::fs::read(path).unwrap();
            assert!(bytes.starts_with(b"%PDF-"));
        }
        let labels = String::from_utf8_lossy(&std::fs::read(&written[1]).unwrap()).into_owned();
        assert!(labels.contains("/Count 4"));
    }

    #[test]
    fn labels_without_logo_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = PrintJob::for_run(dir.path(), "Lakes", None);
        let source = QrCodeSource::default().with_module_size(2);
        let font = dejavu();

        let err = job.run(&records(), &source, &font, None).unwrap_err();
        assert!(matches!(err, LabelError::AssetUnavailable { asset: "logo", .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_write_removes_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let job = PrintJob::new(dir.path().join("run")).with_formats(vec![
            Format::A4,
            "62x29".parse().unwrap(),
        ]);
        // a directory where the label file should go makes the second write fail
        std::fs::create_dir(job.output_path(&job.formats[1])).unwrap();
        let source = QrCodeSource::default().with_module_size(2);
        let font = dejavu();
        let logo = logo();

        let err = job.run(&records(), &source, &font, Some(&logo)).unwrap_err();
        assert!(matches!(err, LabelError::Io(_)));
        assert!(!job.output_path(&Format::A4).exists());
        assert!(job.output_path(&job.formats[1]).is_dir());
    }

    #[test]
    fn invalid_record_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = PrintJob::new(dir.path().join("run"));
        let source = QrCodeSource::default().with_module_size(2);
        let font = dejavu();

        let mut list = records();
        list.push(Record::new("Lakes", "", "S3"));
        let err = job.run(&list, &source, &font, None).unwrap_err();
        assert!(matches!(err, LabelError::MalformedRecord { field: "SiteName" }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
