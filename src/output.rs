/// Fixed-width text report of two analyses and their differences.
///
/// Writes directly to a `Write` sink. Every line starts with a 55-column
/// label (file name, or a padded "ResultsFile1 vs ResultsFile2" marker) so
/// the statistic columns of the file, diff and percentage lines line up.
use std::io::{self, Write};

use crate::aggregate::{AggregateAnalysis, Metric};
use crate::raw::RawAnalysis;
use crate::stats::Summary;

const DIFF_LABEL: &str = "ResultsFile1 vs ResultsFile2";
const PCT_LABEL: &str = "ResultsFile1 vs ResultsFile2 (%)";

/// Print the per-metric comparison of two aggregate analyses.
///
/// For each metric: one line per file, then the absolute and percentage
/// difference lines, then a blank line.
pub fn write_aggregate_comparison(
    out: &mut impl Write,
    (name1, a1): (&str, &AggregateAnalysis),
    (name2, a2): (&str, &AggregateAnalysis),
) -> io::Result<()> {
    for metric in Metric::ALL {
        let s1 = a1.get(metric);
        let s2 = a2.get(metric);
        write_aggregate_line(out, name1, metric, s1)?;
        write_aggregate_line(out, name2, metric, s2)?;

        let d = s1.diff(s2);
        writeln!(
            out,
            "{DIFF_LABEL} {:38}:  {:12}: Avg: {:+12.3}, StdDev: {:+12.3}, Median: {:+12.3}, P90: {:+12.3}, P99: {:+12.3}, Max: {:+12.3}",
            "",
            metric.name(),
            d.avg,
            d.stddev,
            d.median,
            d.p90,
            d.p99,
            d.max
        )?;

        let p = s1.pct_diff(s2);
        writeln!(
            out,
            "{PCT_LABEL} {:34}:  {:12}: Avg: {:+11.3}%, StdDev: {:+11.3}%, Median: {:+11.3}%, P90: {:+11.3}%, P99: {:+11.3}%, Max: {:+11.3}%",
            "",
            metric.name(),
            p.avg,
            p.stddev,
            p.median,
            p.p90,
            p.p99,
            p.max
        )?;

        writeln!(out)?;
    }
    Ok(())
}

fn write_aggregate_line(
    out: &mut impl Write,
    name: &str,
    metric: Metric,
    s: &Summary,
) -> io::Result<()> {
    writeln!(
        out,
        "ResultsFile {:55}:  {:12}: Avg: {:12.3}, StdDev: {:12.3}, Median: {:12.3}, P90: {:12.3}, P99: {:12.3}, Max: {:12.3}",
        name,
        metric.name(),
        s.avg,
        s.stddev,
        s.median,
        s.p90,
        s.p99,
        s.max
    )
}

/// Print the comparison of two raw analyses: one line per file, then the
/// absolute and percentage difference lines.
pub fn write_raw_comparison(
    out: &mut impl Write,
    (name1, a1): (&str, &RawAnalysis),
    (name2, a2): (&str, &RawAnalysis),
) -> io::Result<()> {
    write_raw_line(out, name1, a1)?;
    write_raw_line(out, name2, a2)?;

    let d = a1.diff(a2);
    writeln!(
        out,
        "{DIFF_LABEL} {:38}: Transactions: {:+12}, Time (s): {:+12.3}, Throughput (txns/sec): {:+12.3},  Latencies (us):  Average: {:+12.3}, StdDev: {:+12.3}, Median: {:+12.3}, P90: {:+12.3}, P99: {:+12.3}, Max: {:+12.3}",
        "",
        d.total_transactions,
        d.total_time,
        d.throughput,
        d.latency.avg,
        d.latency.stddev,
        d.latency.median,
        d.latency.p90,
        d.latency.p99,
        d.latency.max
    )?;

    let p = a1.pct_diff(a2);
    writeln!(
        out,
        "{PCT_LABEL} {:34}: Transactions: {:+11.3}%, Time (s): {:+11.3}%, Throughput (txns/sec): {:+11.3}%,  Latencies (us):  Average: {:+11.3}%, StdDev: {:+11.3}%, Median: {:+11.3}%, P90: {:+11.3}%, P99: {:+11.3}%, Max: {:+11.3}%",
        "",
        p.total_transactions,
        p.total_time,
        p.throughput,
        p.latency.avg,
        p.latency.stddev,
        p.latency.median,
        p.latency.p90,
        p.latency.p99,
        p.latency.max
    )
}

fn write_raw_line(out: &mut impl Write, name: &str, a: &RawAnalysis) -> io::Result<()> {
    writeln!(
        out,
        "ResultsFile {:55}: Transactions: {:12}, Time (s): {}, Throughput (txns/sec): {:12.3},  Latencies (us):  Average: {:12.3}, StdDev: {:12.3}, Median: {:12.3}, P90: {:12.3}, P99: {:12.3}, Max: {:12.3}",
        name,
        a.total_transactions,
        space_signed(a.total_time, 12, 3),
        a.throughput,
        a.latency.avg,
        a.latency.stddev,
        a.latency.median,
        a.latency.p90,
        a.latency.p99,
        a.latency.max
    )
}

/// Right-aligned fixed-point with a leading space in place of a `+` sign.
fn space_signed(v: f64, width: usize, precision: usize) -> String {
    let body = if v.is_sign_negative() {
        format!("{v:.precision$}")
    } else {
        format!(" {v:.precision$}")
    };
    format!("{body:>width$}")
}
