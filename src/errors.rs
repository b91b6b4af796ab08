//! Error types for the internship tracker
//!
//! This module defines the error types for every component of the record store.
//! All of them are local, recoverable conditions meant to be reported back to the
//! calling layer; the single exception is an identifier index whose bucket array
//! cannot be allocated.

use std::path::PathBuf;
use thiserror::Error;

/// Record store errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Store already holds `capacity` live records
    #[error("Maximum capacity reached ({capacity} records)")]
    CapacityExceeded { capacity: usize },

    /// A live record already uses this identifier
    #[error("Identifier already exists: {id}")]
    DuplicateIdentifier { id: String },

    /// Position past the end of the slot array
    #[error("Slot {index} is out of range (store has {len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    /// No live record has this identifier
    #[error("Identifier not found: {id}")]
    UnknownIdentifier { id: String },

    /// Position refers to a hole left by a removal
    #[error("Slot {index} is empty")]
    EmptySlot { index: usize },

    /// Replacement would change an immutable identifier
    #[error("Identifier is immutable: expected {expected}, found {found}")]
    IdentifierMismatch { expected: String, found: String },

    /// Reordering was not a permutation of the live slots
    #[error("Invalid reordering: {reason}")]
    InvalidOrder { reason: String },

    /// Identifier index was built against an older store layout
    #[error("Identifier index is stale (built for version {built_for}, store is at {current})")]
    StaleIndex { built_for: u64, current: u64 },

    /// Identifier index failure
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Identifier index errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Probing visited every bucket without finding a free one
    #[error("Hash table is full ({size} buckets)")]
    TableFull { size: usize },

    /// Bucket count of zero
    #[error("Hash table size must be greater than 0")]
    InvalidSize,

    /// Bucket array could not be allocated
    #[error("Failed to allocate hash table with {size} buckets")]
    Allocation { size: usize },

    /// Key is already present in the table
    #[error("Key already indexed: {id}")]
    DuplicateKey { id: String },
}

/// Record file codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    /// Record file missing or unreadable
    #[error("Record file not found: {path}")]
    NotFound { path: PathBuf },

    /// Line with the wrong field count or an unusable required field
    #[error("Malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// I/O error while reading or writing a record file
    #[error("Record file I/O error")]
    Io(#[from] std::io::Error),

    /// Temporary file could not be moved over the target
    #[error("Failed to replace record file: {path}")]
    PersistFailed { path: PathBuf },

    /// Rewriting the file would lose lines that were skipped on load
    #[error(
        "Saving {} would drop {skipped} line(s) that failed to load; fix the file or pass --force",
        .path.display()
    )]
    WouldDropLines { path: PathBuf, skipped: usize },

    /// Store refused a decoded record for a reason other than capacity or duplication
    #[error("Record rejected by store")]
    Rejected(#[from] StoreError),
}

/// Application ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Student already applied for this job
    #[error("Student {student_id} has already applied for job {job_id}")]
    DuplicateApplication { student_id: String, job_id: String },

    /// No application for this pair
    #[error("No application found for student {student_id} and job {job_id}")]
    NotFound { student_id: String, job_id: String },

    /// Ledger is full
    #[error("Maximum number of applications reached ({capacity})")]
    CapacityExceeded { capacity: usize },

    /// Job listing no longer accepts applications
    #[error("Job {job_id} is closed to applications")]
    JobClosed { job_id: String },
}

/// Input validation errors for user-initiated registration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field left empty
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// Student identifier format
    #[error("Student ID must be exactly {expected} digits: {id}")]
    InvalidStudentId { id: String, expected: usize },

    /// Email format
    #[error("Invalid email format: {email} ({reason})")]
    InvalidEmail { email: String, reason: &'static str },

    /// Email already in use
    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    /// GPA outside the permitted range
    #[error("GPA must be between {min:.1} and {max:.1}, got {value}")]
    GpaOutOfRange { value: f32, min: f32, max: f32 },

    /// Deadline not a calendar date
    #[error("Deadline must be a date in YYYY-MM-DD form: {deadline}")]
    InvalidDeadline { deadline: String },

    /// Field contains the record delimiter
    #[error("{field} must not contain '|'")]
    ContainsDelimiter { field: &'static str },

    /// Field spans more than one line
    #[error("{field} must not contain line breaks")]
    ContainsLineBreak { field: &'static str },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered
    #[error("Failed to render configuration")]
    Render(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// No user configuration directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// I/O error while reading or writing configuration
    #[error("Configuration I/O error")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Record store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Identifier index error
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Record codec error
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Application ledger error
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable
    ///
    /// Only a failed index allocation is fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            AppError::Index(IndexError::Allocation { .. })
                | AppError::Store(StoreError::Index(IndexError::Allocation { .. }))
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Store(_) => "store",
            AppError::Index(_) => "index",
            AppError::Codec(_) => "codec",
            AppError::Ledger(_) => "ledger",
            AppError::Validation(_) => "validation",
            AppError::Config(_) => "config",
            AppError::Json(_) => "json",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Store result type alias
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Index result type alias
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Codec result type alias
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Ledger result type alias
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
