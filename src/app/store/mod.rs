//! Bounded record storage
//!
//! A [`RecordStore`] owns every record of one kind in insertion order, up to a
//! fixed capacity. It does not sort, search or index; those engines work on
//! top of it and are told about position changes through the store's
//! structural version.
//!
//! # Module Organization
//!
//! - [`core`] - The slot-array store itself
//! - [`types`] - Bookkeeping snapshots ([`StoreStats`])

pub mod core;
pub mod types;

pub use self::core::RecordStore;
pub use self::types::StoreStats;
