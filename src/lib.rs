//! Internship Tracker Library
//!
//! An in-process record store for internship placement data: students, job
//! listings and the applications linking them, persisted as `|`-delimited
//! text files.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(MAX_STUDENTS, 100);
        assert_eq!(DEFAULT_TABLE_SIZE, 10);
        assert_eq!(FIELD_DELIMITER, '|');
    }

    #[test]
    fn test_error_types() {
        let store_error = errors::StoreError::CapacityExceeded { capacity: 50 };
        let app_error = AppError::Store(store_error);

        assert_eq!(app_error.category(), "store");
        assert!(app_error.is_recoverable());
    }
}
