use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use oltp_compare::input::ResultsFile;
use oltp_compare::mode::{self, Mode, UsageError};

#[derive(Parser)]
#[command(
    name = "oltp-compare",
    about = "Compare two OLTP-Bench results files",
    version
)]
struct Cli {
    /// Results format: aggregate (res) or raw (csv). Detected from the header line if omitted
    #[arg(long, value_name = "MODE")]
    mode: Option<String>,

    /// Baseline results file
    #[arg(long = "resultsFile1", value_name = "PATH")]
    results_file1: Option<PathBuf>,

    /// Results file compared against the baseline
    #[arg(long = "resultsFile2", value_name = "PATH")]
    results_file2: Option<PathBuf>,

    /// Log diagnostics to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help / --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    oltp_compare::logging::init(cli.verbose);

    let (mode, mut file1, mut file2) = match open_and_resolve(&cli) {
        Ok(resolved) => resolved,
        Err(e) => usage(&e),
    };

    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    oltp_compare::compare(mode, &mut file1, &mut file2, &mut out)?;
    out.flush()?;

    Ok(())
}

fn open_and_resolve(cli: &Cli) -> Result<(Mode, ResultsFile, ResultsFile), UsageError> {
    let mut file1 = mode::open_results_file("--resultsFile1", cli.results_file1.as_deref())?;
    let mut file2 = mode::open_results_file("--resultsFile2", cli.results_file2.as_deref())?;
    let mode = mode::resolve(cli.mode.as_deref(), &mut file1, &mut file2)?;
    Ok((mode, file1, file2))
}

fn usage(err: &UsageError) -> ! {
    eprintln!("ERROR: {err}\n");
    eprintln!("{}", Cli::command().render_help());
    std::process::exit(1);
}
