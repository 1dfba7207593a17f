//! Reading and writing the persisted column format.
//!
//! Layout, newline-delimited text: a row-count line, then one code line and
//! one value line per row, in original row order. Values cannot contain
//! newlines; the raw input is line-delimited to begin with.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{CodecError, Result};

/// The records of an encoded file, column-major.
#[derive(Debug)]
pub(crate) struct EncodedFile {
    pub codes: Vec<u32>,
    pub values: Vec<String>,
}

/// Read a raw column: one value per line, order preserved.
pub(crate) fn read_raw_column(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut rows = Vec::new();
    for line in BufReader::new(file).lines() {
        rows.push(line?);
    }
    debug!("read {} raw rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read and validate an encoded file.
///
/// Rejects a missing or unparsable header, code lines that are not
/// non-negative integers, fewer record pairs than the header declares, and
/// trailing data past the declared count.
pub(crate) fn read_encoded(path: &Path) -> Result<EncodedFile> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(CodecError::InvalidHeader),
    };
    let expected: usize = header
        .trim()
        .parse()
        .map_err(|_| CodecError::InvalidHeader)?;

    let mut codes = Vec::with_capacity(expected);
    let mut values = Vec::with_capacity(expected);
    for row in 0..expected {
        let code_line = match lines.next() {
            Some(line) => line?,
            None => return Err(CodecError::Truncated { expected, found: row }),
        };
        let code: u32 = code_line.trim().parse().map_err(|_| CodecError::InvalidCode {
            line: 2 + row * 2,
            value: code_line.clone(),
        })?;
        let value = match lines.next() {
            Some(line) => line?,
            None => return Err(CodecError::Truncated { expected, found: row }),
        };
        codes.push(code);
        values.push(value);
    }
    match lines.next() {
        None => {}
        Some(Ok(_)) => return Err(CodecError::TrailingData { expected }),
        Some(Err(e)) => return Err(e.into()),
    }

    debug!("read {expected} encoded rows from {}", path.display());
    Ok(EncodedFile { codes, values })
}

/// Write an encoded file. The output appears atomically: records go to a
/// sibling temp file that is renamed into place on success and removed on
/// failure, so a failed write never leaves a partial file behind.
pub(crate) fn write_encoded(path: &Path, codes: &[u32], values: &[String]) -> Result<()> {
    debug_assert_eq!(codes.len(), values.len());
    let tmp = tmp_path(path);
    let written = write_records(&tmp, codes, values)
        .and_then(|_| fs::rename(&tmp, path).map_err(CodecError::from));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    } else {
        debug!("wrote {} encoded rows to {}", codes.len(), path.display());
    }
    written
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_records(path: &Path, codes: &[u32], values: &[String]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", codes.len())?;
    for (code, value) in codes.iter().zip(values) {
        writeln!(out, "{code}\n{value}")?;
    }
    out.flush()?;
    Ok(())
}
