//! Record file reading and writing
//!
//! Loading is lenient: a malformed line is skipped with a warning and a
//! [`SkipDiagnostic`], and the load carries on. What counts as a duplicate or
//! a full store is decided by the caller's sink, so the same reader feeds the
//! record stores and the application ledger.
//!
//! Saving writes the whole file to a temporary sibling and moves it over the
//! target, so a failed save leaves the previous file in place.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::lines::{decode_line, encode_line, header_lines, LineRecord};
use crate::errors::{CodecError, CodecResult};

/// What a sink did with a decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Record stored
    Accepted,
    /// Record refused; loading continues
    Skipped(String),
    /// Sink is full; loading stops
    Full(String),
}

/// Counters for one load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Physical lines read, headers included
    pub lines_read: usize,
    /// Header lines skipped
    pub header_lines: usize,
    /// Blank lines skipped
    pub empty_lines: usize,
    /// Records accepted by the sink
    pub loaded: usize,
    /// Lines that failed to decode
    pub malformed: usize,
    /// Decoded records the sink refused
    pub rejected: usize,
}

/// A line that did not become a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipDiagnostic {
    /// 1-based physical line number
    pub line: usize,
    /// Why the line was skipped
    pub reason: String,
}

/// Outcome of loading one record file
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Source file, when loaded from disk
    pub path: Option<PathBuf>,
    /// Line counters
    pub stats: LoadStats,
    /// One entry per skipped line
    pub diagnostics: Vec<SkipDiagnostic>,
    /// Loading stopped early because the sink was full
    pub stopped_at_capacity: bool,
}

impl LoadReport {
    /// Records accepted
    pub fn loaded(&self) -> usize {
        self.stats.loaded
    }

    /// Lines that did not become records
    pub fn skipped(&self) -> usize {
        self.stats.malformed + self.stats.rejected
    }

    /// Check if every data line became a record
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && !self.stopped_at_capacity
    }

    fn skip(&mut self, line: usize, reason: String) {
        warn!("Skipping line {}: {}", line, reason);
        self.diagnostics.push(SkipDiagnostic { line, reason });
    }
}

/// Line-oriented record reader
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordReader {
    header_lines: usize,
}

impl RecordReader {
    /// Reader that skips `header_lines` leading lines before decoding
    pub fn new(header_lines: usize) -> Self {
        Self { header_lines }
    }

    /// Decode every record from `reader`, handing each to `sink`
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Io` if reading fails, or whatever error `sink`
    /// returns. Malformed lines, including lines that are not valid UTF-8,
    /// are never errors.
    pub fn read<T, R, F>(&self, mut reader: R, mut sink: F) -> CodecResult<LoadReport>
    where
        T: LineRecord,
        R: BufRead,
        F: FnMut(T) -> CodecResult<SinkOutcome>,
    {
        let mut report = LoadReport::default();
        let mut buffer = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;
            report.stats.lines_read += 1;

            if buffer.ends_with(b"\n") {
                buffer.pop();
                if buffer.ends_with(b"\r") {
                    buffer.pop();
                }
            }

            if line_number <= self.header_lines {
                report.stats.header_lines += 1;
                continue;
            }

            let line = match std::str::from_utf8(&buffer) {
                Ok(line) => line,
                Err(e) => {
                    report.stats.malformed += 1;
                    report.skip(
                        line_number,
                        format!("invalid UTF-8 at byte {}", e.valid_up_to()),
                    );
                    continue;
                }
            };

            if line.trim().is_empty() {
                report.stats.empty_lines += 1;
                continue;
            }

            let record = match decode_line::<T>(line, line_number) {
                Ok(record) => record,
                Err(CodecError::Malformed { reason, .. }) => {
                    report.stats.malformed += 1;
                    report.skip(line_number, reason);
                    continue;
                }
                Err(e) => return Err(e),
            };

            match sink(record)? {
                SinkOutcome::Accepted => report.stats.loaded += 1,
                SinkOutcome::Skipped(reason) => {
                    report.stats.rejected += 1;
                    report.skip(line_number, reason);
                }
                SinkOutcome::Full(reason) => {
                    report.stats.rejected += 1;
                    report.skip(line_number, reason);
                    report.stopped_at_capacity = true;
                    break;
                }
            }
        }

        debug!(
            "Read {} {} records from {} lines ({} skipped)",
            report.stats.loaded,
            T::KIND,
            report.stats.lines_read,
            report.skipped()
        );
        Ok(report)
    }

    /// Decode records from an in-memory string
    pub fn read_str<T, F>(&self, text: &str, sink: F) -> CodecResult<LoadReport>
    where
        T: LineRecord,
        F: FnMut(T) -> CodecResult<SinkOutcome>,
    {
        self.read(text.as_bytes(), sink)
    }

    /// Decode every record in the file at `path`
    ///
    /// # Errors
    ///
    /// Returns `CodecError::NotFound` if the file cannot be opened.
    pub fn load_file<T, F>(&self, path: &Path, sink: F) -> CodecResult<LoadReport>
    where
        T: LineRecord,
        F: FnMut(T) -> CodecResult<SinkOutcome>,
    {
        let file = File::open(path).map_err(|e| {
            debug!("Cannot open {}: {}", path.display(), e);
            CodecError::NotFound {
                path: path.to_path_buf(),
            }
        })?;

        let mut report = self.read(BufReader::new(file), sink)?;
        report.path = Some(path.to_path_buf());

        info!(
            "Loaded {} {} records from {}",
            report.loaded(),
            T::KIND,
            path.display()
        );
        if !report.is_clean() {
            warn!(
                "{} lines skipped while loading {}",
                report.diagnostics.len(),
                path.display()
            );
        }
        Ok(report)
    }
}

/// Write a header block then one line per record
///
/// Returns the number of records written.
pub fn write_records<'a, T, W, I>(writer: &mut W, header_count: usize, records: I) -> CodecResult<usize>
where
    T: LineRecord + 'a,
    W: Write,
    I: IntoIterator<Item = &'a T>,
{
    for header in header_lines::<T>(header_count) {
        writeln!(writer, "{}", header)?;
    }

    let mut written = 0;
    for record in records {
        writeln!(writer, "{}", encode_line(record))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Replace the file at `path` with `records`
///
/// # Errors
///
/// Returns `CodecError::Io` if the temporary file cannot be written, or
/// `CodecError::PersistFailed` if it cannot replace the target.
pub fn save_file<'a, T, I>(path: &Path, header_count: usize, records: I) -> CodecResult<usize>
where
    T: LineRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    let written = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_records(&mut writer, header_count, records)?
    };

    temp.persist(path).map_err(|e| {
        warn!("Failed to replace {}: {}", path.display(), e.error);
        CodecError::PersistFailed {
            path: path.to_path_buf(),
        }
    })?;

    info!("Saved {} {} records to {}", written, T::KIND, path.display());
    Ok(written)
}
