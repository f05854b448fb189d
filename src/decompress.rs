//! Transparent decompression for gzip and zstd compressed results files.
//!
//! Detects compression by file extension (.gz → gzip, .zst/.zstd → zstd).
//! The whole file is decompressed into memory so it can be rewound like a
//! plain file.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Compression formats recognized from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zstd,
}

/// Returns the compression implied by the path's extension, if any.
pub fn detect(path: &Path) -> Option<Compression> {
    match path.extension()?.to_str()? {
        "gz" | "gzip" => Some(Compression::Gzip),
        "zst" | "zstd" => Some(Compression::Zstd),
        _ => None,
    }
}

/// Decompress an already-opened reader to bytes.
pub fn decompress(reader: impl Read, compression: Compression, path: &Path) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match compression {
        Compression::Gzip => {
            flate2::read::GzDecoder::new(reader)
                .read_to_end(&mut buf)
                .with_context(|| format!("failed to decompress gzip file: {}", path.display()))?;
        }
        Compression::Zstd => {
            zstd::Decoder::new(reader)
                .with_context(|| {
                    format!("failed to initialize zstd decoder for: {}", path.display())
                })?
                .read_to_end(&mut buf)
                .with_context(|| format!("failed to decompress zstd file: {}", path.display()))?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detect_gz() {
        assert_eq!(detect(Path::new("output.res.gz")), Some(Compression::Gzip));
        assert_eq!(detect(Path::new("/runs/a/output.csv.gzip")), Some(Compression::Gzip));
    }

    #[test]
    fn detect_zst() {
        assert_eq!(detect(Path::new("output.csv.zst")), Some(Compression::Zstd));
        assert_eq!(detect(Path::new("output.res.zstd")), Some(Compression::Zstd));
    }

    #[test]
    fn detect_uncompressed() {
        assert_eq!(detect(Path::new("output.res")), None);
        assert_eq!(detect(Path::new("output.csv")), None);
        assert_eq!(detect(Path::new("results")), None);
    }

    #[test]
    fn gzip_roundtrip() {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(b"0,1,2\n").unwrap();
        let bytes = enc.finish().unwrap();
        let out = decompress(&bytes[..], Compression::Gzip, Path::new("x.gz")).unwrap();
        assert_eq!(out, b"0,1,2\n");
    }

    #[test]
    fn zstd_roundtrip() {
        let bytes = zstd::encode_all(&b"0,1,2\n"[..], 0).unwrap();
        let out = decompress(&bytes[..], Compression::Zstd, Path::new("x.zst")).unwrap();
        assert_eq!(out, b"0,1,2\n");
    }

    #[test]
    fn corrupt_gzip_is_an_error() {
        let err = decompress(&b"not gzip"[..], Compression::Gzip, Path::new("bad.gz")).unwrap_err();
        assert!(err.to_string().contains("bad.gz"));
    }
}
