//! Command-line interface for pystylecheck.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::analysis::LanguageAnalyzer;
use crate::detect::Runner;
use crate::report::{self, Format};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "PYSTYLECHECK_LOG";

/// Static style checker for Python sources.
///
/// Reports long lines, bad indentation, stray semicolons, comment spacing,
/// TODOs, blank-line runs, and naming problems in classes, functions,
/// arguments and variables.
#[derive(Parser)]
#[command(name = "pystylecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to check (a .py file, or a directory whose .py files are checked)
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Install the stderr log subscriber.
///
/// `PYSTYLECHECK_LOG` wins over `--verbose` when set.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Collect the files to check.
///
/// A directory contributes its immediate children with a handled extension,
/// sorted by file name. A single file is checked only if its extension is
/// handled.
pub fn collect_files(root: &Path, analyzer: &dyn LanguageAnalyzer) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root)?;

    if !metadata.is_dir() {
        if analyzer.handles_path(root) {
            return Ok(vec![root.to_path_buf()]);
        }
        tracing::warn!(
            "skipping {}: not a {} source file",
            root.display(),
            analyzer.language_id()
        );
        return Ok(Vec::new());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && analyzer.handles_path(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

/// Run a check and print the report. Returns the process exit code.
pub fn run(args: &Cli) -> anyhow::Result<i32> {
    let runner = Runner::new();

    let files = match collect_files(&args.path, runner.analyzer()) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    if files.is_empty() {
        tracing::warn!("no files to check in {}", args.path.display());
    }

    let report = runner.check_files(&files);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        Format::Text => report::write_text(&mut out, &report)?,
        Format::Json => {
            let path = args.path.to_string_lossy();
            report::write_json(&mut out, &path, &report)?;
        }
    }
    report::write_failures(&report);

    // Style diagnostics alone never fail the run
    if report.has_failures() {
        Ok(EXIT_ERROR)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
