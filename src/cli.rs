//! Command-line interface components.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::config::ImportConfig;
use crate::constants::DEFAULT_DATE_FORMAT;
use crate::error::FmpError;
use crate::importer::{LoggingImporter, RecordSink};
use crate::models::{ImportStats, Record};
use crate::processor::FmpXmlProcessor;

#[derive(Parser, Debug, Clone)]
#[command(name = "fmp-import")]
#[command(about = "Stream a FileMaker FMPXMLRESULT export into typed records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the FMPXMLRESULT export file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// chrono pattern for DATE fields (e.g. %m/%d/%Y for US exports)
    #[arg(short, long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Print each converted record to stdout as a JSON line
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn import_config(&self) -> ImportConfig {
        ImportConfig::default().with_date_format(self.date_format.clone())
    }
}

/// Set up structured logging on stderr, leaving stdout for records
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fmp_importer={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the import described by the command-line arguments
pub fn run(args: &Args) -> Result<ImportStats> {
    let processor = FmpXmlProcessor::new(args.import_config())?;

    let stats = if args.json {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let mut sink = RecordSink::new(|record: Record| write_json_line(&mut out, &record));

        let stats = processor
            .import_file(&args.file, &mut sink)
            .with_context(|| format!("Failed to import {}", args.file.display()))?;
        out.flush().context("Failed to flush stdout")?;
        stats
    } else {
        processor
            .import_file(&args.file, &mut LoggingImporter)
            .with_context(|| format!("Failed to import {}", args.file.display()))?
    };

    Ok(stats)
}

fn write_json_line(out: &mut impl Write, record: &Record) -> crate::Result<()> {
    serde_json::to_writer(&mut *out, record)
        .map_err(|e| FmpError::import(format!("Failed to serialize record: {}", e)))?;
    writeln!(out).map_err(|e| FmpError::import(format!("Failed to write record: {}", e)))
}

/// Print a short summary of the run to stderr
pub fn report_summary(args: &Args, stats: &ImportStats) {
    eprintln!("\n{}", "Import Summary".bright_green().bold());
    eprintln!(
        "  {} {}",
        "File:".bright_cyan(),
        args.file.display().to_string().bright_white()
    );
    eprintln!(
        "  {} {}",
        "Fields:".bright_cyan(),
        stats.fields_registered.to_string().bright_white()
    );
    eprintln!(
        "  {} {}",
        "Rows imported:".bright_cyan(),
        stats.rows_imported.to_string().bright_white().bold()
    );
    eprintln!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
}
