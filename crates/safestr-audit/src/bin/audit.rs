//! CLI entrypoint for the unsafe-call auditor.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use safestr_audit::{AuditReport, Format, LogEmitter, Mapping, mapping, run_audit};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Report legacy unsafe C string/memory calls and their bounded replacements.
#[derive(Debug, Parser)]
#[command(name = "safestr-audit")]
#[command(about = "Report unsafe C library calls and suggested bounds-checked replacements")]
struct Cli {
    /// Files or directories to scan.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Descend into subdirectories.
    #[arg(short, long)]
    recursive: bool,
    /// Print every call site as `file:line: name`.
    #[arg(short, long)]
    verbose: bool,
    /// Print per-file counts.
    #[arg(long)]
    per_file: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// JSON object of extra or overriding `name -> replacement` entries.
    #[arg(long)]
    mapping: Option<PathBuf>,
    /// Write a structured JSONL log to this path.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Write the artifact index (SHA-256 of every scanned file) to this path.
    #[arg(long)]
    artifact_index: Option<PathBuf>,
    /// Exit with status 1 when any unsafe call is found.
    #[arg(long)]
    fail_on_findings: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let table = match &cli.mapping {
        Some(path) => {
            eprintln!("Loading mapping overrides from {}", path.display());
            Mapping::builtin_with(Mapping::from_file(path)?)
        }
        None => mapping::builtin().clone(),
    };

    let run_id = format!("run-{}", std::process::id());
    let run = match &cli.log {
        Some(path) => {
            let mut emitter = LogEmitter::to_file(path, &run_id)?;
            let run = run_audit(&cli.paths, cli.recursive, &table, &run_id, Some(&mut emitter))?;
            eprintln!("Wrote structured log to {}", path.display());
            run
        }
        None => run_audit::<std::io::Sink>(&cli.paths, cli.recursive, &table, &run_id, None)?,
    };

    if let Some(path) = &cli.artifact_index {
        std::fs::write(path, run.artifacts.to_json()?)?;
        eprintln!("Wrote artifact index to {}", path.display());
    }

    let report = AuditReport::build(
        run.files.len(),
        &run.calls,
        &table,
        cli.per_file,
        cli.verbose,
    );
    print!("{}", report.render(cli.format.into())?);
    if matches!(cli.format, OutputFormat::Json) {
        println!();
    }

    if cli.fail_on_findings && report.total_calls > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
