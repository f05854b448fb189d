//! Analysis of raw per-transaction (`.csv`) results files.
//!
//! ```text
//! Transaction Type Index,Transaction Name,Start Time (microseconds),Latency (microseconds),...
//! 4,Delivery,1563834709.181374,744571,0,0
//! ```
//!
//! Despite its header, the start time column is in (fractional) seconds.
//! Latencies are integer microseconds.

use anyhow::{Context, Result, bail};

use crate::input::ResultsFile;
use crate::stats::{Summary, pct_change};

const MICROS_PER_SEC: f64 = 1_000_000.0;

const START_COLUMN: usize = 2;
const LATENCY_COLUMN: usize = 3;

/// Run-level totals and latency statistics of one raw results file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAnalysis {
    /// Seconds from the earliest start to the latest completion.
    pub total_time: f64,
    pub total_transactions: u64,
    /// Transactions per second over `total_time`.
    pub throughput: f64,
    /// Latency statistics in microseconds.
    pub latency: Summary,
}

/// Field-wise `file2 - file1` of two raw analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDiff {
    pub total_time: f64,
    pub total_transactions: i64,
    pub throughput: f64,
    pub latency: Summary,
}

/// Field-wise percentage change of two raw analyses, relative to file 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPctDiff {
    pub total_time: f64,
    pub total_transactions: f64,
    pub throughput: f64,
    pub latency: Summary,
}

impl RawAnalysis {
    pub fn diff(&self, other: &Self) -> RawDiff {
        RawDiff {
            total_time: other.total_time - self.total_time,
            total_transactions: other.total_transactions as i64 - self.total_transactions as i64,
            throughput: other.throughput - self.throughput,
            latency: self.latency.diff(&other.latency),
        }
    }

    pub fn pct_diff(&self, other: &Self) -> RawPctDiff {
        RawPctDiff {
            total_time: pct_change(self.total_time, other.total_time),
            total_transactions: pct_change(
                self.total_transactions as f64,
                other.total_transactions as f64,
            ),
            throughput: pct_change(self.throughput, other.throughput),
            latency: self.latency.pct_diff(&other.latency),
        }
    }
}

/// Latencies plus the observed time span.
#[derive(Debug)]
struct LatencySeries {
    latencies: Vec<f64>,
    first_start: f64,
    last_end: f64,
}

impl Default for LatencySeries {
    fn default() -> Self {
        Self {
            latencies: Vec::new(),
            first_start: f64::MAX,
            last_end: 0.0,
        }
    }
}

impl LatencySeries {
    fn push_row(&mut self, row: &str) -> Result<()> {
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() <= LATENCY_COLUMN {
            bail!(
                "expected at least {} columns, found {}",
                LATENCY_COLUMN + 1,
                fields.len()
            );
        }
        let latency = fields[LATENCY_COLUMN]
            .trim()
            .parse::<i64>()
            .with_context(|| format!("invalid latency {:?}", fields[LATENCY_COLUMN].trim()))?;
        let start = fields[START_COLUMN]
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid start time {:?}", fields[START_COLUMN].trim()))?;
        let end = start + latency as f64 / MICROS_PER_SEC;

        self.latencies.push(latency as f64);
        self.first_start = self.first_start.min(start);
        self.last_end = self.last_end.max(end);
        Ok(())
    }
}

/// Summarize a raw results file, reading from the file's current position.
pub fn analyze(file: &mut ResultsFile) -> Result<RawAnalysis> {
    let mut series = LatencySeries::default();
    let name = file.name().to_string();
    file.for_each_data_row(|line_no, row| {
        series
            .push_row(row)
            .with_context(|| format!("{name}:{line_no}: malformed transaction row"))
    })?;

    let latency =
        Summary::of(&series.latencies).with_context(|| format!("{name}: no data rows found"))?;
    let total_time = series.last_end - series.first_start;
    let total_transactions = series.latencies.len() as u64;
    tracing::trace!(
        file = %name,
        first_start = series.first_start,
        last_end = series.last_end,
        "transaction span"
    );

    Ok(RawAnalysis {
        total_time,
        total_transactions,
        throughput: total_transactions as f64 / total_time,
        latency,
    })
}
