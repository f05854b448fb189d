//! Input format detection and pre-analysis validation of the two results
//! files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::input::ResultsFile;

/// Header line of an aggregate (`.res`) results file.
pub const AGGREGATE_HEADER: &str = "time(sec), throughput(req/sec), avg_lat(ms), min_lat(ms), 25th_lat(ms), median_lat(ms), 75th_lat(ms), 90th_lat(ms), 95th_lat(ms), 99th_lat(ms), max_lat(ms), tp (req/s) scaled";

/// Header line of a raw per-transaction (`.csv`) results file.
pub const RAW_HEADER: &str = "Transaction Type Index,Transaction Name,Start Time (microseconds),Latency (microseconds),Worker Id (start number),Phase Id (index in config file)";

/// Which results format both input files are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Pre-aggregated per-interval summaries.
    Aggregate,
    /// One row per transaction.
    Raw,
}

impl Mode {
    /// The header line a file in this mode must start with.
    pub fn header(self) -> &'static str {
        match self {
            Mode::Aggregate => AGGREGATE_HEADER,
            Mode::Raw => RAW_HEADER,
        }
    }

    /// Infer the mode from a header line, ignoring trailing whitespace.
    pub fn detect(header_line: &str) -> Option<Mode> {
        match header_line.trim_end() {
            AGGREGATE_HEADER => Some(Mode::Aggregate),
            RAW_HEADER => Some(Mode::Raw),
            _ => None,
        }
    }
}

impl FromStr for Mode {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aggregate" | "res" => Ok(Mode::Aggregate),
            "raw" | "csv" => Ok(Mode::Raw),
            other => Err(UsageError::UnhandledMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Aggregate => "aggregate",
            Mode::Raw => "raw",
        })
    }
}

/// Invocation problems: reported with the help text and exit status 1.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Missing argument {flag}")]
    MissingArgument { flag: &'static str },
    #[error("{flag} \"{}\" is not accessible", path.display())]
    NotAccessible { flag: &'static str, path: PathBuf },
    #[error("{flag} \"{}\" is not readable: {reason}", path.display())]
    NotReadable {
        flag: &'static str,
        path: PathBuf,
        reason: String,
    },
    #[error(
        "Header line format for --resultsFile1 \"{}\" and --resultsFile2 \"{}\" do not match.",
        path1.display(),
        path2.display()
    )]
    HeaderMismatch { path1: PathBuf, path2: PathBuf },
    #[error("Unhandled mode: \"{0}\"")]
    UnhandledMode(String),
    #[error("Cannot detect mode from header line \"{header}\"; pass --mode explicitly")]
    UndetectedMode { header: String },
    #[error(
        "Headerline format for results files does not match mode \"{mode}\" expectation: \"{header}\""
    )]
    HeaderNotForMode { mode: Mode, header: String },
    #[error(
        "Step size for --resultsFile1 \"{}\" ({step1}) and --resultsFile2 \"{}\" ({step2}) do not match.",
        path1.display(),
        path2.display()
    )]
    StepSizeMismatch {
        path1: PathBuf,
        step1: String,
        path2: PathBuf,
        step2: String,
    },
}

/// Open a results file given on the command line.
pub fn open_results_file(
    flag: &'static str,
    path: Option<&Path>,
) -> Result<ResultsFile, UsageError> {
    let path = path.ok_or(UsageError::MissingArgument { flag })?;
    if !path.is_file() {
        return Err(UsageError::NotAccessible {
            flag,
            path: path.to_path_buf(),
        });
    }
    ResultsFile::open(path).map_err(|e| UsageError::NotReadable {
        flag,
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })
}

/// Check that both files are comparable and settle the mode.
///
/// Reads each file's header (and in aggregate mode its first two data rows),
/// then rewinds both files so analysis starts from the top.
pub fn resolve(
    requested: Option<&str>,
    file1: &mut ResultsFile,
    file2: &mut ResultsFile,
) -> Result<Mode, UsageError> {
    let header1 = read_probe_line(file1, "--resultsFile1")?;
    let header2 = read_probe_line(file2, "--resultsFile2")?;
    if header1 != header2 {
        return Err(UsageError::HeaderMismatch {
            path1: file1.path().to_path_buf(),
            path2: file2.path().to_path_buf(),
        });
    }

    let mode = match requested {
        Some(name) => name.parse::<Mode>()?,
        None => Mode::detect(&header1).ok_or_else(|| UsageError::UndetectedMode {
            header: header1.trim_end().to_string(),
        })?,
    };
    if header1.trim_end() != mode.header() {
        return Err(UsageError::HeaderNotForMode {
            mode,
            header: header1.trim_end().to_string(),
        });
    }
    tracing::debug!(%mode, explicit = requested.is_some(), "resolved results mode");

    if mode == Mode::Aggregate {
        let step1 = probe_step_size(file1, "--resultsFile1")?;
        let step2 = probe_step_size(file2, "--resultsFile2")?;
        tracing::debug!(%step1, %step2, "probed step sizes");
        if step1 != step2 {
            return Err(UsageError::StepSizeMismatch {
                path1: file1.path().to_path_buf(),
                step1,
                path2: file2.path().to_path_buf(),
                step2,
            });
        }
    }

    rewind(file1, "--resultsFile1")?;
    rewind(file2, "--resultsFile2")?;
    Ok(mode)
}

/// Timestamp of the second data row, which for rows starting at 0 is the
/// sampling interval. Missing rows give an empty step.
fn probe_step_size(file: &mut ResultsFile, flag: &'static str) -> Result<String, UsageError> {
    let _first = read_probe_line(file, flag)?;
    let second = read_probe_line(file, flag)?;
    let step = second.split(',').next().unwrap_or_default();
    Ok(step.trim_end_matches(['\n', '\r']).to_string())
}

fn read_probe_line(file: &mut ResultsFile, flag: &'static str) -> Result<String, UsageError> {
    file.read_line().map_err(|e| not_readable(file, flag, e))
}

fn rewind(file: &mut ResultsFile, flag: &'static str) -> Result<(), UsageError> {
    file.rewind().map_err(|e| not_readable(file, flag, e))
}

fn not_readable(file: &ResultsFile, flag: &'static str, e: std::io::Error) -> UsageError {
    UsageError::NotReadable {
        flag,
        path: file.path().to_path_buf(),
        reason: e.to_string(),
    }
}
