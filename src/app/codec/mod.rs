//! Delimited text format for record files
//!
//! Each record kind has its own file: optional header lines, then one record
//! per line with `|`-separated fields.
//!
//! # Module Organization
//!
//! - [`lines`] - Single-line encoding and decoding per record kind
//! - [`loader`] - Whole-file loading with skip diagnostics, and atomic saving

pub mod lines;
pub mod loader;

pub use lines::{
    decode_entity, decode_line, encode_entity, encode_line, header_lines, parse_gpa, LineRecord,
};
pub use loader::{
    save_file, write_records, LoadReport, LoadStats, RecordReader, SinkOutcome, SkipDiagnostic,
};
