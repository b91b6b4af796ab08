//! Core record store for the internship tracker
//!
//! Students and jobs live in bounded [`RecordStore`]s, each paired with an
//! [`IdentifierIndex`] inside a [`Catalog`]. Applications live in an
//! insertion-ordered [`ApplicationLedger`]. Ordering, searching and the file
//! codec work on top of these.
//!
//! # Module Organization
//!
//! - [`models`] - Record types and the [`Record`] trait
//! - [`store`] - Fixed-capacity slot storage
//! - [`index`] - Open-addressing identifier index
//! - [`catalog`] - Store and index kept in sync
//! - [`ordering`] - Sort algorithms, sort keys and ordered views
//! - [`search`] - Search algorithms and filters
//! - [`ledger`] - Linked-list application ledger
//! - [`codec`] - Delimited record files
//! - [`validation`] - Checks for user-entered records
//! - [`report`] - Summaries and statistics
//!
//! # Examples
//!
//! ```rust
//! use internship_tracker::app::{ById, Catalog, Student};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut students: Catalog<Student> = Catalog::with_capacity(100)?;
//! students.load_str(
//!     "A|1001|a@x.com|3.5|IT|skills\nB|1002|b@x.com|2.9|Biz|skills\n",
//!     0,
//! )?;
//!
//! assert_eq!(students.get("1002").map(|s| s.gpa), Some(2.9));
//!
//! let by_id = students.sorted::<ById>()?;
//! assert_eq!(by_id.find("1001").map(|s| s.name.as_str()), Some("A"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod catalog;
pub mod codec;
pub mod index;
pub mod ledger;
pub mod models;
pub mod ordering;
pub mod report;
pub mod search;
pub mod store;
pub mod validation;

// Re-export main public API
pub use catalog::{Catalog, CatalogStats, IndexPolicy};
pub use codec::{LineRecord, LoadReport, LoadStats, RecordReader, SkipDiagnostic};
pub use index::{IdentifierIndex, IndexStats};
pub use ledger::ApplicationLedger;
pub use models::{
    Application, ApplicationStatus, Entity, EntityKind, Job, Record, Student,
};
pub use ordering::{
    ByCompany, ByDeadline, ByGpaAscending, ByGpaDescending, ById, ByName, ByTitle, Ordered, SortAlgorithm,
    SortKey,
};
pub use report::{ApplicationSummary, GpaSummary, Grade, StatsReport};
pub use store::{RecordStore, StoreStats};
