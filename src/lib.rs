pub mod aggregate;
pub mod decompress;
pub mod input;
pub mod logging;
pub mod mode;
pub mod output;
pub mod raw;
pub mod stats;

use std::io::Write;

use anyhow::Result;

use crate::input::ResultsFile;
use crate::mode::Mode;

/// Analyze both files in the given mode and write the comparison report.
///
/// Both files must be positioned at their start (as left by
/// [`mode::resolve`]).
pub fn compare(
    mode: Mode,
    file1: &mut ResultsFile,
    file2: &mut ResultsFile,
    out: &mut impl Write,
) -> Result<()> {
    match mode {
        Mode::Aggregate => {
            let a1 = aggregate::analyze(file1)?;
            let a2 = aggregate::analyze(file2)?;
            output::write_aggregate_comparison(out, (file1.name(), &a1), (file2.name(), &a2))?;
        }
        Mode::Raw => {
            let a1 = raw::analyze(file1)?;
            let a2 = raw::analyze(file2)?;
            output::write_raw_comparison(out, (file1.name(), &a1), (file2.name(), &a2))?;
        }
    }
    Ok(())
}
