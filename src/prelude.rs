//! Prelude module for the Internship Tracker Library
//!
//! Re-exports the most commonly used items so typical usage needs a single
//! `use internship_tracker::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust
//! use internship_tracker::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = AppConfig::default();
//!     let mut jobs: Catalog<Job> = Catalog::new(config.store.max_jobs, config.index.policy())?;
//!     jobs.insert(Job::new("J01", "Data Intern", "Acme", "2025-06-30", "SQL"))?;
//!
//!     let by_deadline = jobs.sorted::<ByDeadline>()?;
//!     assert_eq!(by_deadline.len(), 1);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Records and collections
pub use crate::app::{
    Application, ApplicationLedger, ApplicationStatus, ApplicationSummary, Catalog, Entity,
    EntityKind, IdentifierIndex, IndexPolicy, Job, LoadReport, Record, RecordStore, Student,
};

// Ordering
pub use crate::app::{
    ByCompany, ByDeadline, ByGpaAscending, ByGpaDescending, ById, ByName, ByTitle, Ordered, SortAlgorithm,
};

// Configuration
pub use crate::config::AppConfig;

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let config = AppConfig::default();
        let students: Catalog<Student> =
            Catalog::new(config.store.max_students, config.index.policy()).unwrap();
        assert!(students.is_empty());

        let ledger = ApplicationLedger::default();
        assert_eq!(ledger.capacity(), config.store.max_applications);
    }
}
