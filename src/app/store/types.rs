//! Core data structures describing a record store's state

use serde::{Deserialize, Serialize};

use crate::app::models::EntityKind;

/// Snapshot of a store's bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Kind of record held
    pub kind: EntityKind,
    /// Live records
    pub count: usize,
    /// Maximum live records
    pub capacity: usize,
    /// Physical slots in use, live or vacated
    pub slots: usize,
    /// Vacated slots awaiting compaction
    pub holes: usize,
    /// Structural version, bumped whenever positions change
    pub version: u64,
}

impl StoreStats {
    /// Fraction of capacity in use, as a percentage
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            (self.count as f64 / self.capacity as f64) * 100.0
        }
    }

    /// Check if no further record can be appended
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }
}
