//! Reading sampling runs from the XML export of the field sampling application.
//!
//! The export looks like:
//!
//! ```xml
//! <FieldEntry>
//!   <Run ID="42">
//!     <RunName>Lakes</RunName>
//!     <RunDate>2024-03-01</RunDate>
//!     <Sample ID="S1"><SiteName>Lake A</SiteName></Sample>
//!   </Run>
//! </FieldEntry>
//! ```
//!
//! Samples keep the order they appear in.

use crate::record::Record;
use crate::LabelError;
use log::debug;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::path::Path;

/// One sampling run and its samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: String,
    pub name: String,
    pub date: Option<String>,
    pub samples: Vec<Record>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    RunName,
    RunDate,
    SiteName,
}

#[derive(Default)]
struct PartialRun {
    id: String,
    name: Option<String>,
    date: Option<String>,
    // (sample id, site name)
    samples: Vec<(String, String)>,
}

struct PartialSample {
    id: String,
    site: Option<String>,
}

pub fn load_runs<P: AsRef<Path>>(path: P) -> Result<Vec<Run>, LabelError> {
    let data = std::fs::read(path.as_ref())?;
    parse_runs(&data)
}

pub fn parse_runs(content: &[u8]) -> Result<Vec<Run>, LabelError> {
    let mut reader = Reader::from_reader(content);
    let mut buf = Vec::with_capacity(64);

    let mut runs = Vec::new();
    let mut run: Option<PartialRun> = None;
    let mut sample: Option<PartialSample> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Run" => {
                    run = Some(PartialRun {
                        id: required_attribute(&reader, &e, "ID")?,
                        ..Default::default()
                    });
                }
                b"Sample" if run.is_some() => {
                    sample = Some(PartialSample {
                        id: required_sample_id(&reader, &e)?,
                        site: None,
                    });
                }
                name => {
                    field = field_for(name, run.is_some(), sample.is_some());
                    text.clear();
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"Sample" if run.is_some() => {
                    required_sample_id(&reader, &e)?;
                    return Err(LabelError::MalformedRecord { field: "SiteName" });
                }
                name => {
                    if let Some(f) = field_for(name, run.is_some(), sample.is_some()) {
                        store(f, String::new(), &mut run, &mut sample);
                    }
                }
            },
            Event::Text(e) if field.is_some() => {
                text.push_str(&reader.decoder().decode(&e).unwrap_or_default());
            }
            Event::CData(e) if field.is_some() => {
                text.push_str(&reader.decoder().decode(&e).unwrap_or_default());
            }
            Event::GeneralRef(e) if field.is_some() => {
                if let Some(ch) = e.resolve_char_ref()? {
                    text.push(ch);
                } else {
                    let name = reader.decoder().decode(&e).unwrap_or_default();
                    if let Some(value) = resolve_predefined_entity(&name) {
                        text.push_str(value);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"Sample" => {
                    if let (Some(s), Some(r)) = (sample.take(), run.as_mut()) {
                        let site = s.site.ok_or(LabelError::MalformedRecord { field: "SiteName" })?;
                        r.samples.push((s.id, site));
                    }
                }
                b"Run" => {
                    if let Some(r) = run.take() {
                        runs.push(finish_run(r)?);
                    }
                }
                _ => {
                    if let Some(f) = field.take() {
                        store(f, text.trim().to_string(), &mut run, &mut sample);
                    }
                }
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!("parsed {} run(s)", runs.len());
    Ok(runs)
}

fn field_for(name: &[u8], in_run: bool, in_sample: bool) -> Option<Field> {
    match name {
        b"SiteName" if in_sample => Some(Field::SiteName),
        b"RunName" if in_run && !in_sample => Some(Field::RunName),
        b"RunDate" if in_run && !in_sample => Some(Field::RunDate),
        _ => None,
    }
}

fn store(field: Field, value: String, run: &mut Option<PartialRun>, sample: &mut Option<PartialSample>) {
    match field {
        Field::SiteName => {
            if let Some(s) = sample.as_mut() {
                s.site = Some(value);
            }
        }
        Field::RunName => {
            if let Some(r) = run.as_mut() {
                r.name = Some(value);
            }
        }
        Field::RunDate => {
            if let Some(r) = run.as_mut() {
                r.date = Some(value);
            }
        }
    }
}

fn finish_run(run: PartialRun) -> Result<Run, LabelError> {
    let name = run.name.ok_or(LabelError::MalformedRecord { field: "RunName" })?;
    let samples = run
        .samples
        .into_iter()
        .map(|(id, site)| Record::new(&name, site, id))
        .collect();
    Ok(Run {
        id: run.id,
        name,
        date: run.date,
        samples,
    })
}

fn attribute(reader: &Reader<&[u8]>, e: &BytesStart, key: &str) -> Result<Option<String>, LabelError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key.as_bytes() {
            let raw = reader
                .decoder()
                .decode(attr.value.as_ref())
                .unwrap_or_default();
            let value = unescape(&raw).map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(reader: &Reader<&[u8]>, e: &BytesStart, key: &'static str) -> Result<String, LabelError> {
    attribute(reader, e, key)?.ok_or(LabelError::MalformedRecord { field: key })
}

fn required_sample_id(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<String, LabelError> {
    attribute(reader, e, "ID")?.ok_or(LabelError::MalformedRecord { field: "SampleID" })
}
