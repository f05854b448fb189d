//! Results file input: rewindable line readers over plain or compressed files.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Seek};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::decompress;

/// Anything a results file can be read from: buffered and rewindable.
pub trait Source: BufRead + Seek {}

impl<T: BufRead + Seek> Source for T {}

/// An opened results file.
///
/// It is read twice: once while probing the header and step size, then in
/// full by an analyzer after [`ResultsFile::rewind`].
pub struct ResultsFile {
    path: PathBuf,
    name: String,
    reader: Box<dyn Source>,
}

impl fmt::Debug for ResultsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultsFile")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Row counts from one pass over a file's data rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub accepted: usize,
    pub skipped: usize,
}

impl ResultsFile {
    /// Open a results file, decompressing `.gz`/`.zst` files into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let reader: Box<dyn Source> = match decompress::detect(path) {
            Some(compression) => {
                let bytes = decompress::decompress(file, compression, path)?;
                tracing::debug!(
                    path = %path.display(),
                    ?compression,
                    bytes = bytes.len(),
                    "decompressed results file"
                );
                Box::new(Cursor::new(bytes))
            }
            None => Box::new(BufReader::new(file)),
        };
        Ok(Self {
            path: path.to_path_buf(),
            name: basename(path),
            reader,
        })
    }

    /// Wrap an in-memory or otherwise prepared reader.
    pub fn from_reader(path: impl Into<PathBuf>, reader: impl Source + 'static) -> Self {
        let path = path.into();
        Self {
            name: basename(&path),
            path,
            reader: Box::new(reader),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories, as printed in the report.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the next line including its terminator. Returns an empty string
    /// at end of file.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.rewind()
    }

    /// Call `f` with the 1-based line number and text of every data row from
    /// the current position. Rows not starting with an ASCII digit (headers,
    /// blank lines, footers) are skipped.
    pub fn for_each_data_row(
        &mut self,
        mut f: impl FnMut(usize, &str) -> Result<()>,
    ) -> Result<RowCounts> {
        let mut counts = RowCounts::default();
        let mut line = String::new();
        let mut line_no = 0usize;
        loop {
            line.clear();
            let n = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("failed to read {}", self.path.display()))?;
            if n == 0 {
                break;
            }
            line_no += 1;
            let row = line.trim_end_matches(['\n', '\r']);
            if !is_data_row(row) {
                counts.skipped += 1;
                continue;
            }
            f(line_no, row)?;
            counts.accepted += 1;
        }
        tracing::debug!(
            file = %self.name,
            accepted = counts.accepted,
            skipped = counts.skipped,
            "scanned data rows"
        );
        Ok(counts)
    }
}

/// A data row starts with a digit; anything else is header or footer noise.
pub fn is_data_row(line: &str) -> bool {
    line.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
