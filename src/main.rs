use clap::Parser;
use log::{debug, error, info, warn};
use sample_labels::{ingest, Font, Format, Info, LabelError, Logo, PayloadFormat, PrintJob, QrCodeSource};
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Sampling run export to read
    #[clap(value_parser)]
    xml_file: PathBuf,

    /// Page formats: `a4` or `<W>x<H>` in millimetres. A file is produced for each format
    #[clap(short, long = "format", num_args = 1.., required = true)]
    formats: Vec<Format>,

    /// Copies of each label. Does not apply to a4 sheets
    #[clap(short, long, default_value = "1")]
    multiples: NonZeroU32,

    /// Directory to write the printouts to
    #[clap(short, long = "out", default_value = ".")]
    outdir: PathBuf,

    /// Only log errors
    #[clap(short, long, conflicts_with_all = ["concise", "debug"])]
    quiet: bool,

    /// Log warnings and errors
    #[clap(short, long, conflicts_with = "debug")]
    concise: bool,

    /// Log everything
    #[clap(short, long)]
    debug: bool,

    /// Also write the log to this file
    #[clap(long)]
    logfile: Option<PathBuf>,

    /// Caption font; the first available system font when not given
    #[clap(long)]
    font: Option<PathBuf>,

    /// Logo stamped on every label; needs a transparency mask
    #[clap(long)]
    logo: Option<PathBuf>,

    /// What the QR codes carry: `json` or `xml`
    #[clap(long, default_value = "xml")]
    payload: PayloadFormat,
}

impl Args {
    fn level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.concise {
            LevelFilter::Warn
        } else if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

fn setup_logging(level: LevelFilter, logfile: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = logfile {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn generate(args: &Args) -> Result<(), LabelError> {
    info!("parsing {}", args.xml_file.display());
    let runs = ingest::load_runs(&args.xml_file)?;
    if runs.is_empty() {
        warn!("no runs found in {}", args.xml_file.display());
        return Ok(());
    }

    let font = match &args.font {
        Some(path) => Font::load_from_disk(path)?,
        None => Font::system_default()?,
    };
    let wants_labels = args.formats.iter().any(|f| matches!(f, Format::Label(_)));
    let logo = match &args.logo {
        Some(path) if wants_labels => Some(Logo::load(path)?),
        _ => None,
    };
    let source = QrCodeSource::default();

    for run in runs.iter() {
        debug!(
            "run {} ({}) has {} sample(s)",
            run.id,
            run.name,
            run.samples.len()
        );
        let job = PrintJob::new(args.outdir.join(format!("run_{}_printable", run.id)))
            .with_formats(args.formats.clone())
            .with_multiples(args.multiples)
            .with_payload(args.payload)
            .with_info(Info::for_run(&run.name, None));
        job.run(&run.samples, &source, &font, logo.as_ref())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = setup_logging(args.level(), args.logfile.as_deref()) {
        eprintln!("failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }

    info!("starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    debug!("arguments supplied: {args:?}");

    match generate(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
