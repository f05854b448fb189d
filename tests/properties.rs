/// Property tests over the analyzers and summary statistics.
use std::io::Cursor;

use oltp_compare::aggregate::{self, Metric};
use oltp_compare::input::ResultsFile;
use oltp_compare::mode::{AGGREGATE_HEADER, RAW_HEADER};
use oltp_compare::raw;
use oltp_compare::stats::Summary;
use proptest::prelude::*;

fn mem(name: &str, text: String) -> ResultsFile {
    ResultsFile::from_reader(name, Cursor::new(text.into_bytes()))
}

fn aggregate_text(rows: &[[f64; 6]]) -> String {
    let mut text = format!("{AGGREGATE_HEADER}\n");
    for (i, r) in rows.iter().enumerate() {
        // time, tput, avg, min, p25, median, p75, p90, p95, p99, max, scaled
        text.push_str(&format!(
            "{},{},{},0,0,{},0,{},0,{},{},0\n",
            i * 5,
            r[0],
            r[1],
            r[2],
            r[3],
            r[4],
            r[5]
        ));
    }
    text
}

fn raw_text(rows: &[(f64, u32)]) -> String {
    let mut text = format!("{RAW_HEADER}\n");
    for (start, latency) in rows {
        text.push_str(&format!("3,Payment,{start},{latency},0,0\n"));
    }
    text
}

fn arb_rows() -> impl Strategy<Value = Vec<[f64; 6]>> {
    prop::collection::vec(prop::array::uniform6(0.0f64..1.0e6), 1..40)
}

fn arb_transactions() -> impl Strategy<Value = Vec<(f64, u32)>> {
    prop::collection::vec((0.0f64..1.0e4, 1u32..5_000_000), 1..60)
}

proptest! {
    #[test]
    fn identical_aggregate_files_diff_to_zero(rows in arb_rows()) {
        let a = aggregate::analyze(&mut mem("a.res", aggregate_text(&rows))).unwrap();
        let b = aggregate::analyze(&mut mem("b.res", aggregate_text(&rows))).unwrap();
        for metric in Metric::ALL {
            let d = a.get(metric).diff(b.get(metric));
            prop_assert_eq!(d, Summary { avg: 0.0, stddev: 0.0, median: 0.0, p90: 0.0, p99: 0.0, max: 0.0 });
        }
    }

    #[test]
    fn identical_raw_files_diff_to_zero(txns in arb_transactions()) {
        let a = raw::analyze(&mut mem("a.csv", raw_text(&txns))).unwrap();
        let b = raw::analyze(&mut mem("b.csv", raw_text(&txns))).unwrap();
        let d = a.diff(&b);
        prop_assert_eq!(d.total_transactions, 0);
        prop_assert_eq!(d.total_time, 0.0);
        prop_assert_eq!(d.throughput, 0.0);
        prop_assert_eq!(d.latency.avg, 0.0);
        let p = a.pct_diff(&b);
        prop_assert_eq!(p.total_transactions, 0.0);
        prop_assert_eq!(p.latency.max, 0.0);
    }

    #[test]
    fn summary_is_ordered_and_bounded(values in prop::collection::vec(-1.0e9f64..1.0e9, 1..200)) {
        let s = Summary::of(&values).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Interpolation may round by an ulp or so past its bracketing samples.
        let slack = 1e-9 * (max.abs() + min.abs() + 1.0);
        prop_assert_eq!(s.max, max);
        prop_assert!(min - slack <= s.median && s.median <= s.p90 + slack);
        prop_assert!(s.p90 <= s.p99 + slack && s.p99 <= s.max + slack);
        prop_assert!(s.stddev >= 0.0);
        prop_assert!(s.avg >= min - slack && s.avg <= max + slack);
    }

    #[test]
    fn noise_rows_never_change_raw_results(
        txns in arb_transactions(),
        noise in prop::collection::vec("[A-Za-z# ][A-Za-z0-9 ,.]{0,20}", 0..5),
    ) {
        let clean = raw_text(&txns);
        let mut noisy = clean.clone();
        for n in &noise {
            noisy.push_str(n);
            noisy.push('\n');
        }
        noisy.push('\n');
        let a = raw::analyze(&mut mem("a.csv", clean)).unwrap();
        let b = raw::analyze(&mut mem("a.csv", noisy)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn raw_transaction_count_matches_rows(txns in arb_transactions()) {
        let a = raw::analyze(&mut mem("a.csv", raw_text(&txns))).unwrap();
        prop_assert_eq!(a.total_transactions, txns.len() as u64);
        prop_assert!(a.total_time > 0.0);
    }
}
