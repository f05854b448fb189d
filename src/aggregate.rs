//! Analysis of aggregate (`.res`) results files.
//!
//! Each data row is one sampling interval:
//!
//! ```text
//! time(sec), throughput(req/sec), avg_lat(ms), min_lat(ms), 25th_lat(ms), median_lat(ms),
//! 75th_lat(ms), 90th_lat(ms), 95th_lat(ms), 99th_lat(ms), max_lat(ms), tp (req/s) scaled
//! 0,38.000,1023.614,435.037,1015.377,1027.236,1048.301,1062.389,1092.329,2943.103,2946.521,0.001
//! ```

use anyhow::{Context, Result, bail};

use crate::input::ResultsFile;
use crate::stats::Summary;

/// The per-interval columns that get summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Throughput,
    AvgLatency,
    MedianLatency,
    P90Latency,
    P99Latency,
    MaxLatency,
}

impl Metric {
    /// Report order.
    pub const ALL: [Metric; 6] = [
        Metric::Throughput,
        Metric::AvgLatency,
        Metric::MedianLatency,
        Metric::P90Latency,
        Metric::P99Latency,
        Metric::MaxLatency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Throughput => "throughput",
            Metric::AvgLatency => "avg_lat",
            Metric::MedianLatency => "median_lat",
            Metric::P90Latency => "p90_lat",
            Metric::P99Latency => "p99_lat",
            Metric::MaxLatency => "max_lat",
        }
    }

    /// Zero-based column index in a data row.
    pub fn column(self) -> usize {
        match self {
            Metric::Throughput => 1,
            Metric::AvgLatency => 2,
            Metric::MedianLatency => 5,
            Metric::P90Latency => 7,
            Metric::P99Latency => 9,
            Metric::MaxLatency => 10,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Summaries of every [`Metric`] over all intervals of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateAnalysis {
    /// Indexed by metric, in [`Metric::ALL`] order.
    summaries: Vec<Summary>,
}

impl AggregateAnalysis {
    pub fn get(&self, metric: Metric) -> &Summary {
        &self.summaries[metric.index()]
    }
}

/// Per-metric sample series, one sample per interval row.
#[derive(Debug, Default)]
struct MetricSeries {
    series: [Vec<f64>; 6],
}

impl MetricSeries {
    fn push_row(&mut self, row: &str) -> Result<()> {
        let fields: Vec<&str> = row.split(',').collect();
        for metric in Metric::ALL {
            let col = metric.column();
            let Some(field) = fields.get(col) else {
                bail!(
                    "expected at least {} columns, found {} (missing {})",
                    col + 1,
                    fields.len(),
                    metric.name()
                );
            };
            let value = field
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid {} value {:?}", metric.name(), field.trim()))?;
            self.series[metric.index()].push(value);
        }
        Ok(())
    }
}

/// Summarize every metric of an aggregate results file, reading from the
/// file's current position.
pub fn analyze(file: &mut ResultsFile) -> Result<AggregateAnalysis> {
    let mut series = MetricSeries::default();
    let name = file.name().to_string();
    file.for_each_data_row(|line_no, row| {
        series
            .push_row(row)
            .with_context(|| format!("{name}:{line_no}: malformed aggregate row"))
    })?;

    let mut summaries = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let summary = Summary::of(&series.series[metric.index()])
            .with_context(|| format!("{name}: no data rows found"))?;
        summaries.push(summary);
    }

    Ok(AggregateAnalysis { summaries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::AGGREGATE_HEADER;
    use std::io::Cursor;

    fn file(rows: &str) -> ResultsFile {
        let text = format!("{AGGREGATE_HEADER}\n{rows}");
        ResultsFile::from_reader("output.res", Cursor::new(text.into_bytes()))
    }

    /// A row whose every metric column holds `v`, at time `t`.
    fn row(t: u32, v: f64) -> String {
        let mut fields = vec![t.to_string()];
        fields.extend((1..12).map(|_| format!("{v:.3}")));
        fields.join(",") + "\n"
    }

    #[test]
    fn columns_match_header() {
        let header: Vec<&str> = AGGREGATE_HEADER.split(", ").collect();
        assert_eq!(header[Metric::Throughput.column()], "throughput(req/sec)");
        assert_eq!(header[Metric::AvgLatency.column()], "avg_lat(ms)");
        assert_eq!(header[Metric::MedianLatency.column()], "median_lat(ms)");
        assert_eq!(header[Metric::P90Latency.column()], "90th_lat(ms)");
        assert_eq!(header[Metric::P99Latency.column()], "99th_lat(ms)");
        assert_eq!(header[Metric::MaxLatency.column()], "max_lat(ms)");
    }

    #[test]
    fn throughput_mean() {
        let rows = [row(0, 10.0), row(5, 20.0), row(10, 30.0)].concat();
        let a = analyze(&mut file(&rows)).unwrap();
        assert_eq!(a.get(Metric::Throughput).avg, 20.0);
        assert_eq!(a.get(Metric::MaxLatency).max, 30.0);
    }

    #[test]
    fn picks_the_right_columns() {
        let rows = "0,38.000,1023.614,435.037,1015.377,1027.236,1048.301,1062.389,1092.329,2943.103,2946.521,0.001\n";
        let a = analyze(&mut file(rows)).unwrap();
        assert_eq!(a.get(Metric::Throughput).avg, 38.0);
        assert_eq!(a.get(Metric::AvgLatency).avg, 1023.614);
        assert_eq!(a.get(Metric::MedianLatency).avg, 1027.236);
        assert_eq!(a.get(Metric::P90Latency).avg, 1062.389);
        assert_eq!(a.get(Metric::P99Latency).avg, 2943.103);
        assert_eq!(a.get(Metric::MaxLatency).avg, 2946.521);
    }

    #[test]
    fn noise_rows_do_not_change_results() {
        let clean = [row(0, 10.0), row(5, 20.0)].concat();
        let noisy = format!("\n{}# comment\n{}\ntotal: done\n", row(0, 10.0), row(5, 20.0));
        let a = analyze(&mut file(&clean)).unwrap();
        let b = analyze(&mut file(&noisy)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn whitespace_around_fields_is_accepted() {
        let rows = "0, 1.5, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11\r\n";
        let a = analyze(&mut file(rows)).unwrap();
        assert_eq!(a.get(Metric::Throughput).avg, 1.5);
        assert_eq!(a.get(Metric::MaxLatency).avg, 10.0);
    }

    #[test]
    fn malformed_number_is_fatal() {
        let rows = format!("{}5,abc,2,3,4,5,6,7,8,9,10,11\n", row(0, 1.0));
        let err = analyze(&mut file(&rows)).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("output.res:3"), "{msg}");
        assert!(msg.contains("throughput"), "{msg}");
    }

    #[test]
    fn short_row_is_fatal() {
        let err = analyze(&mut file("0,1,2,3\n")).unwrap_err();
        assert!(format!("{err:#}").contains("columns"));
    }

    #[test]
    fn no_rows_is_fatal() {
        let err = analyze(&mut file("")).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }
}
