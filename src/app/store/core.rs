//! Bounded, insertion-ordered record store
//!
//! Records live in a slot array. Removing a record leaves a hole so that the
//! positions of the remaining records do not move; [`RecordStore::compact`]
//! closes the holes later. Every operation that moves existing records bumps
//! the store's structural version, which is how position-based structures
//! such as the identifier index detect that they have gone stale.

use tracing::{debug, warn};

use super::types::StoreStats;
use crate::app::models::Record;
use crate::errors::{StoreError, StoreResult};

/// Fixed-capacity store of one record kind
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    /// Slot array; `None` marks a hole left by a removal
    slots: Vec<Option<T>>,
    /// Maximum number of live records
    capacity: usize,
    /// Live records
    count: usize,
    /// Structural version
    version: u64,
}

impl<T: Record> RecordStore<T> {
    /// Create an empty store that holds at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            count: 0,
            version: 0,
        }
    }

    /// Maximum number of live records
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the store holds no live records
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if the next append would be refused
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    /// Physical slots in use, including holes
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Holes awaiting compaction
    pub fn holes(&self) -> usize {
        self.slots.len() - self.count
    }

    /// Structural version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Append a record at the next free slot
    ///
    /// # Errors
    ///
    /// * `StoreError::CapacityExceeded` when `capacity` live records are stored
    /// * `StoreError::DuplicateIdentifier` when a live record has the same id
    ///
    /// Neither error mutates the store. If every physical slot is taken but
    /// holes exist, the store is compacted first, which bumps the version.
    pub fn append(&mut self, record: T) -> StoreResult<usize> {
        if self.count >= self.capacity {
            warn!(
                "Refusing {} {}: capacity of {} reached",
                T::KIND,
                record.id(),
                self.capacity
            );
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        if self.position_of(record.id()).is_some() {
            return Err(StoreError::DuplicateIdentifier {
                id: record.id().to_string(),
            });
        }

        if self.slots.len() >= self.capacity {
            self.compact();
        }

        let position = self.slots.len();
        debug!("Appending {} {} at slot {}", T::KIND, record.id(), position);
        self.slots.push(Some(record));
        self.count += 1;
        Ok(position)
    }

    /// Replace the record at `index`, returning the previous one
    ///
    /// The identifier is immutable: the replacement must carry the same id.
    pub fn replace_at(&mut self, index: usize, record: T) -> StoreResult<T> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(StoreError::SlotOutOfRange { index, len })?;

        let current = slot.as_ref().ok_or(StoreError::EmptySlot { index })?;
        if current.id() != record.id() {
            return Err(StoreError::IdentifierMismatch {
                expected: current.id().to_string(),
                found: record.id().to_string(),
            });
        }

        debug!("Replacing {} {} at slot {}", T::KIND, record.id(), index);
        slot.replace(record).ok_or(StoreError::EmptySlot { index })
    }

    /// Remove the record at `index`, leaving a hole
    pub fn remove_at(&mut self, index: usize) -> StoreResult<T> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(StoreError::SlotOutOfRange { index, len })?;

        let record = slot.take().ok_or(StoreError::EmptySlot { index })?;
        self.count -= 1;
        debug!("Removed {} {} from slot {}", T::KIND, record.id(), index);
        Ok(record)
    }

    /// Shift records left to close every hole
    ///
    /// Returns the number of holes closed. Positions held outside the store
    /// are invalid afterwards whenever this returns a non-zero value.
    pub fn compact(&mut self) -> usize {
        let holes = self.holes();
        if holes == 0 {
            return 0;
        }

        self.slots.retain(Option::is_some);
        self.version += 1;
        debug!(
            "Compacted {} store: closed {} holes (version {})",
            T::KIND,
            holes,
            self.version
        );
        holes
    }

    /// Record at `index`, if that slot is live
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Position of the live record with this identifier (linear scan)
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.iter()
            .find(|(_, record)| record.id() == id)
            .map(|(position, _)| position)
    }

    /// Check if a live record has this identifier
    pub fn contains_id(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    /// Iterate live records with their positions, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| slot.as_ref().map(|record| (position, record)))
    }

    /// Iterate live records in slot order
    pub fn records(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Visit every live record in slot order
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &T),
    {
        for (position, record) in self.iter() {
            visit(position, record);
        }
    }

    /// Owned copies of every live record, in slot order
    pub fn snapshot(&self) -> Vec<T> {
        self.records().cloned().collect()
    }

    /// Positions of every live record
    pub fn live_positions(&self) -> Vec<usize> {
        self.iter().map(|(position, _)| position).collect()
    }

    /// Rearrange records so that `order[i]` moves to slot `i`
    ///
    /// `order` must list every live position exactly once. Holes are dropped,
    /// so the store is compact afterwards. Bumps the version.
    pub fn reorder(&mut self, order: &[usize]) -> StoreResult<()> {
        if order.len() != self.count {
            return Err(StoreError::InvalidOrder {
                reason: format!(
                    "expected {} positions, got {}",
                    self.count,
                    order.len()
                ),
            });
        }

        let mut seen = vec![false; self.slots.len()];
        for &position in order {
            match self.slots.get(position) {
                Some(Some(_)) if !seen[position] => seen[position] = true,
                Some(Some(_)) => {
                    return Err(StoreError::InvalidOrder {
                        reason: format!("position {} listed twice", position),
                    })
                }
                _ => {
                    return Err(StoreError::InvalidOrder {
                        reason: format!("position {} is not a live slot", position),
                    })
                }
            }
        }

        let mut previous = std::mem::take(&mut self.slots);
        self.slots = order
            .iter()
            .map(|&position| previous[position].take())
            .collect();
        self.version += 1;
        Ok(())
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.slots.clear();
        self.count = 0;
        self.version += 1;
    }

    /// Current bookkeeping snapshot
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            kind: T::KIND,
            count: self.count,
            capacity: self.capacity,
            slots: self.slots.len(),
            holes: self.holes(),
            version: self.version,
        }
    }
}
