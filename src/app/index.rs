//! Open-addressing identifier index
//!
//! Maps record identifiers to slot positions in a [`RecordStore`] using a
//! fixed bucket array, a polynomial rolling hash and linear probing.
//!
//! Removal leaves a tombstone instead of emptying the bucket: an emptied
//! bucket would cut the probe chain of every key inserted after it that
//! collided on the way, making those keys unreachable. Lookups walk past
//! tombstones; inserts reuse the first tombstone they meet.
//!
//! The index holds positions, never records. Any store operation that moves
//! records (compaction, in-place sort) bumps the store version, and an index
//! built for an older version refuses to answer lookups until rebuilt.

use tracing::{debug, info};

use crate::app::models::Record;
use crate::app::store::RecordStore;
use crate::constants::index::{GROWTH_FACTOR, HASH_MULTIPLIER};
use crate::errors::{IndexError, IndexResult, StoreError, StoreResult};

/// State of a single bucket
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bucket {
    /// Never used; terminates probe sequences
    Empty,
    /// Holds a key and the slot of its record
    Occupied { key: String, slot: usize },
    /// Previously occupied; probe sequences continue past it
    Tombstone,
}

/// Statistics about the index's bucket array
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct IndexStats {
    /// Bucket count
    pub size: usize,
    /// Occupied buckets
    pub count: usize,
    /// Tombstoned buckets
    pub tombstones: usize,
    /// Occupied / size
    pub load_factor: f64,
}

/// Hash index from identifier to store slot
#[derive(Debug, Clone)]
pub struct IdentifierIndex {
    buckets: Vec<Bucket>,
    count: usize,
    tombstones: usize,
    /// Store version the slot positions refer to
    built_for: u64,
}

impl IdentifierIndex {
    /// Create an empty index with `size` buckets
    ///
    /// # Errors
    ///
    /// * `IndexError::InvalidSize` for a zero size
    /// * `IndexError::Allocation` if the bucket array cannot be allocated
    pub fn new(size: usize) -> IndexResult<Self> {
        if size == 0 {
            return Err(IndexError::InvalidSize);
        }

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(size)
            .map_err(|_| IndexError::Allocation { size })?;
        buckets.resize(size, Bucket::Empty);

        Ok(Self {
            buckets,
            count: 0,
            tombstones: 0,
            built_for: 0,
        })
    }

    /// Build an index over every live record of `store`
    ///
    /// # Errors
    ///
    /// Returns `IndexError::TableFull` if `size` is smaller than the number of
    /// live records.
    pub fn build<T: Record>(store: &RecordStore<T>, size: usize) -> IndexResult<Self> {
        let mut index = Self::new(size)?;
        for (position, record) in store.iter() {
            index.insert(record.id(), position)?;
        }
        index.built_for = store.version();

        debug!(
            "Built {} index: {} keys in {} buckets (load factor {:.2})",
            T::KIND,
            index.count,
            index.size(),
            index.load_factor()
        );
        Ok(index)
    }

    /// Bucket count recommended for `count` records
    pub fn recommended_size(count: usize, minimum: usize) -> usize {
        (count * GROWTH_FACTOR).max(minimum).max(1)
    }

    /// Bucket count
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if no key is indexed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of tombstoned buckets
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Ratio of occupied buckets to total buckets
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.buckets.len() as f64
    }

    /// Check if the load factor has crossed `threshold`
    pub fn needs_growth(&self, threshold: f64) -> bool {
        self.load_factor() > threshold
    }

    /// Store version this index was built for
    pub fn built_for(&self) -> u64 {
        self.built_for
    }

    /// Check if slot positions still match `store`
    pub fn is_current<T: Record>(&self, store: &RecordStore<T>) -> bool {
        self.built_for == store.version()
    }

    /// Home bucket of `id`
    ///
    /// Polynomial rolling hash over the identifier's bytes with multiplier 31,
    /// reduced modulo the bucket count at every step.
    pub fn hash(&self, id: &str) -> usize {
        let size = self.buckets.len() as u64;
        let hash = id
            .bytes()
            .fold(0u64, |hash, byte| (hash * HASH_MULTIPLIER + byte as u64) % size);
        (hash % size) as usize
    }

    /// Index `id` at store position `slot`
    ///
    /// # Errors
    ///
    /// * `IndexError::DuplicateKey` if `id` is already indexed
    /// * `IndexError::TableFull` if probing returns to the home bucket without
    ///   finding an empty bucket or a tombstone
    pub fn insert(&mut self, id: &str, slot: usize) -> IndexResult<()> {
        let size = self.buckets.len();
        let origin = self.hash(id);
        let mut index = origin;
        let mut reusable = None;

        let target = loop {
            match &self.buckets[index] {
                Bucket::Empty => break reusable.unwrap_or(index),
                Bucket::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(index);
                    }
                }
                Bucket::Occupied { key, .. } if key == id => {
                    return Err(IndexError::DuplicateKey { id: id.to_string() });
                }
                Bucket::Occupied { .. } => {}
            }

            index = (index + 1) % size;
            if index == origin {
                match reusable {
                    Some(tombstone) => break tombstone,
                    None => return Err(IndexError::TableFull { size }),
                }
            }
        };

        if self.buckets[target] == Bucket::Tombstone {
            self.tombstones -= 1;
        }
        self.buckets[target] = Bucket::Occupied {
            key: id.to_string(),
            slot,
        };
        self.count += 1;
        debug!("Indexed {} at bucket {} (home {})", id, target, origin);
        Ok(())
    }

    /// Bucket holding `id`, following the probe sequence
    fn find_bucket(&self, id: &str) -> Option<usize> {
        let size = self.buckets.len();
        let origin = self.hash(id);
        let mut index = origin;

        loop {
            match &self.buckets[index] {
                Bucket::Empty => return None,
                Bucket::Occupied { key, .. } if key == id => return Some(index),
                _ => {}
            }

            index = (index + 1) % size;
            if index == origin {
                return None;
            }
        }
    }

    /// Store position of `id`, if indexed
    pub fn search(&self, id: &str) -> Option<usize> {
        self.find_bucket(id).and_then(|bucket| match &self.buckets[bucket] {
            Bucket::Occupied { slot, .. } => Some(*slot),
            _ => None,
        })
    }

    /// Remove `id`, returning the position it pointed to
    pub fn remove(&mut self, id: &str) -> Option<usize> {
        let bucket = self.find_bucket(id)?;
        match std::mem::replace(&mut self.buckets[bucket], Bucket::Tombstone) {
            Bucket::Occupied { slot, .. } => {
                self.count -= 1;
                self.tombstones += 1;
                debug!("Removed {} from bucket {}", id, bucket);
                Some(slot)
            }
            other => {
                self.buckets[bucket] = other;
                None
            }
        }
    }

    /// Look `id` up and dereference it into `store`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::StaleIndex` if the store has moved records since
    /// this index was built.
    pub fn lookup<'s, T: Record>(
        &self,
        store: &'s RecordStore<T>,
        id: &str,
    ) -> StoreResult<Option<&'s T>> {
        if !self.is_current(store) {
            return Err(StoreError::StaleIndex {
                built_for: self.built_for,
                current: store.version(),
            });
        }

        Ok(self
            .search(id)
            .and_then(|slot| store.get(slot))
            .filter(|record| record.id() == id))
    }

    /// Rebuild over `store` with `size` buckets, replacing this index
    pub fn rebuild<T: Record>(&mut self, store: &RecordStore<T>, size: usize) -> IndexResult<()> {
        *self = Self::build(store, size)?;
        info!(
            "Rebuilt {} index with {} buckets (load factor {:.2})",
            T::KIND,
            self.size(),
            self.load_factor()
        );
        Ok(())
    }

    /// Indexed keys with their bucket and slot, in bucket order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str, usize)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter_map(|(bucket, state)| match state {
                Bucket::Occupied { key, slot } => Some((bucket, key.as_str(), *slot)),
                _ => None,
            })
    }

    /// Current bucket statistics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            size: self.size(),
            count: self.count,
            tombstones: self.tombstones,
            load_factor: self.load_factor(),
        }
    }
}
