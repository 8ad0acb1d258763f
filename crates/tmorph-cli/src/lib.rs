// tmorph-cli: shared utilities for CLI tools.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::ValueEnum;
use tmorph_analyzer::AnalysisReport;
use tmorph_analyzer::config::DEFAULT_ARCHIVE_FILE;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the archive (or a directory holding it).
pub const FAR_PATH_ENV: &str = "TMORPH_FAR_PATH";

/// Per-user and system directories searched for the archive.
const HOME_SUBDIR: &str = ".tmorph";
const SYSTEM_DIR: &str = "/usr/share/tmorph";

/// Locate the analyzer archive.
///
/// Search order:
/// 1. `far_path` argument (if provided)
/// 2. `TMORPH_FAR_PATH` environment variable
/// 3. `~/.tmorph/turkish.far`
/// 4. `/usr/share/tmorph/turkish.far`
/// 5. `turkish.far` in the current working directory
///
/// Path arguments may name the archive itself or a directory containing
/// `turkish.far`.
pub fn find_archive(far_path: Option<&Path>) -> Result<PathBuf, String> {
    let search_paths = build_search_paths(
        far_path,
        std::env::var_os(FAR_PATH_ENV).map(PathBuf::from),
        home_dir(),
        std::env::current_dir().ok(),
    );

    if let Some(found) = search_paths.iter().find(|p| p.is_file()) {
        tracing::debug!(path = %found.display(), "found archive");
        return Ok(found.clone());
    }

    Err(format!(
        "could not find {} in any of the search paths:\n{}",
        DEFAULT_ARCHIVE_FILE,
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Candidate archive files, in search order.
fn build_search_paths(
    far_path: Option<&Path>,
    env_path: Option<PathBuf>,
    home: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // Explicit path, then the environment; each as a file or a directory
    for p in far_path.map(Path::to_path_buf).into_iter().chain(env_path) {
        let in_dir = p.join(DEFAULT_ARCHIVE_FILE);
        paths.push(p);
        paths.push(in_dir);
    }

    if let Some(home) = home {
        paths.push(home.join(HOME_SUBDIR).join(DEFAULT_ARCHIVE_FILE));
    }

    paths.push(PathBuf::from(SYSTEM_DIR).join(DEFAULT_ARCHIVE_FILE));

    // Current directory (fallback for local development)
    if let Some(cwd) = cwd {
        paths.push(cwd.join(DEFAULT_ARCHIVE_FILE));
    }

    paths
}

/// Get the user's home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Parse a `NAME=FILE` argument.
pub fn parse_named_path(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=FILE, got '{arg}'")),
    }
}

/// How analysis reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A header line followed by one analysis per line
    Text,
    /// One JSON object per word
    Json,
}

/// Write `report` as a header and its analyses, or as a not-accepted notice.
pub fn write_text(out: &mut impl Write, report: &AnalysisReport) -> io::Result<()> {
    if report.accepted {
        writeln!(out, "Morphological analyses for the word '{}':", report.word)?;
        for analysis in &report.analyses {
            writeln!(out, "{analysis}")?;
        }
    } else {
        writeln!(out, "'{}' is not accepted as a Turkish word", report.word)?;
    }
    Ok(())
}

pub fn write_report(
    out: &mut impl Write,
    format: OutputFormat,
    report: &AnalysisReport,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(out, report),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, report)?;
            writeln!(out)
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default
/// `warn` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}
