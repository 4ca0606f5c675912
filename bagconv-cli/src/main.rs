//! bagconv command-line interface.
//!
//! Runs conversion jobs headless: the worker runs on its own thread and this
//! thread drains its events, the same way the GUI does.
#![allow(clippy::uninlined_format_args)]

mod progress;

use std::path::PathBuf;
use std::sync::mpsc::channel;

use bagconv_core::{
    ConversionEvent, ConversionJob, ConversionOutcome, ExtractionSelection, RunSummary,
};
use bagconv_io::scan_captures;
use bagconv_worker::ConversionWorker;
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use progress::TerminalReporter;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] bagconv_io::Error),

    #[error("worker error: {0}")]
    Worker(#[from] bagconv_worker::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no .bag files found in {}", .0.display())]
    NoCaptures(PathBuf),

    #[error("{failed} of {total} file(s) failed")]
    FilesFailed { failed: usize, total: usize },
}

/// Artifacts to extract.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Point clouds and images
    Both,
    /// Point clouds only
    PointCloud,
    /// Images only
    Image,
}

impl From<Mode> for ExtractionSelection {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Both => ExtractionSelection::Both,
            Mode::PointCloud => ExtractionSelection::PointCloudOnly,
            Mode::Image => ExtractionSelection::ImageOnly,
        }
    }
}

/// Batch converter for depth-camera .bag captures.
#[derive(Parser)]
#[command(name = "bagconv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every step (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert captures into point-cloud and image frames
    Convert {
        /// Path to the rs-convert executable
        #[arg(short, long, env = "BAGCONV_CONVERTER")]
        converter: PathBuf,

        /// Directory the per-capture output trees are written to
        #[arg(short, long)]
        workdir: PathBuf,

        /// Directory holding the captures (defaults to the working directory)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Artifacts to extract
        #[arg(short, long, value_enum, default_value = "both")]
        mode: Mode,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Capture file names to convert (default: every .bag in the source directory)
        files: Vec<String>,
    },

    /// List the .bag captures in a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            converter,
            workdir,
            source,
            mode,
            json,
            files,
        } => {
            let source_dir = source.unwrap_or_else(|| workdir.clone());
            let files = if files.is_empty() {
                scan_captures(&source_dir)?
            } else {
                files
            };
            if files.is_empty() {
                return Err(CliError::NoCaptures(source_dir));
            }

            let job = ConversionJob::new(converter, workdir, files)
                .with_source_dir(source_dir)
                .with_extraction(mode.into());
            let summary = convert(job)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            if summary.failed > 0 {
                return Err(CliError::FilesFailed {
                    failed: summary.failed,
                    total: summary.records.len(),
                });
            }
        }

        Commands::Scan { dir } => {
            let names = scan_captures(&dir)?;
            for name in &names {
                println!("{}", name);
            }
            eprintln!("{} capture(s) in {}", names.len(), dir.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Start the worker and drain its events on this thread until the run ends.
fn convert(job: ConversionJob) -> Result<RunSummary> {
    let total = job.len();
    let (tx, rx) = channel::<ConversionEvent>();
    let mut worker = ConversionWorker::new(job);
    worker.start(tx)?;

    let mut reporter = TerminalReporter::new(total);
    for event in rx {
        let terminal = event.is_terminal();
        event.dispatch(&mut reporter);
        if terminal {
            break;
        }
    }

    Ok(worker.join()?)
}

fn print_summary(summary: &RunSummary) {
    for record in summary.failures() {
        if let ConversionOutcome::Failure(reason) = &record.outcome {
            println!("FAILED {}: {}", record.file_name, reason);
        }
    }
    println!(
        "Processed {} file(s) in {:.2}s",
        summary.attempted,
        summary.elapsed.as_secs_f64()
    );
    println!("Succeeded: {}", summary.succeeded);
    println!("Failed: {}", summary.failed);
    println!("Skipped: {}", summary.skipped);
}
