//! Indexed record collections
//!
//! A [`Catalog`] pairs a [`RecordStore`] with an [`IdentifierIndex`] over it
//! and keeps the two consistent: every mutation that goes through the catalog
//! updates the index in step, and any operation that moves records rebuilds
//! it before returning. Identifier lookups are hashed, not scanned.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::codec::{save_file, LineRecord, LoadReport, RecordReader, SinkOutcome};
use crate::app::index::{IdentifierIndex, IndexStats};
use crate::app::models::{EntityKind, Record};
use crate::app::ordering::{sort_store, Ordered, SortAlgorithm, SortKey};
use crate::app::store::{RecordStore, StoreStats};
use crate::constants::index::{DEFAULT_TABLE_SIZE, MAX_LOAD_FACTOR};
use crate::errors::{CodecResult, IndexError, StoreError, StoreResult};

/// How a catalog sizes its index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexPolicy {
    /// Bucket count of a fresh index, and the floor for rebuilds
    pub initial_size: usize,
    /// Load factor above which the index grows
    pub max_load_factor: f64,
    /// Grow the index automatically; when false, a full table is an error
    pub auto_grow: bool,
}

impl Default for IndexPolicy {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_TABLE_SIZE,
            max_load_factor: MAX_LOAD_FACTOR,
            auto_grow: true,
        }
    }
}

/// Combined store and index statistics
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub store: StoreStats,
    pub index: IndexStats,
}

/// A record store with an identifier index kept in sync
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    store: RecordStore<T>,
    index: IdentifierIndex,
    policy: IndexPolicy,
}

impl<T: Record> Catalog<T> {
    /// Create an empty catalog holding at most `capacity` records
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidSize` or `IndexError::Allocation` if the
    /// initial index cannot be created.
    pub fn new(capacity: usize, policy: IndexPolicy) -> StoreResult<Self> {
        let store = RecordStore::new(capacity);
        let index = IdentifierIndex::build(&store, policy.initial_size)?;
        Ok(Self {
            store,
            index,
            policy,
        })
    }

    /// Create an empty catalog with the default index policy
    pub fn with_capacity(capacity: usize) -> StoreResult<Self> {
        Self::new(capacity, IndexPolicy::default())
    }

    /// Underlying store
    pub fn store(&self) -> &RecordStore<T> {
        &self.store
    }

    /// Underlying index
    pub fn index(&self) -> &IdentifierIndex {
        &self.index
    }

    /// Index sizing policy
    pub fn policy(&self) -> IndexPolicy {
        self.policy
    }

    pub fn kind(&self) -> EntityKind {
        T::KIND
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Live records in store order
    pub fn records(&self) -> impl Iterator<Item = &T> + '_ {
        self.store.records()
    }

    /// Rebuild the index from scratch, sized for the current record count
    pub fn rebuild_index(&mut self) -> StoreResult<()> {
        let size = if self.policy.auto_grow {
            IdentifierIndex::recommended_size(self.store.len(), self.policy.initial_size)
        } else {
            self.index.size()
        };
        self.index.rebuild(&self.store, size)?;
        Ok(())
    }

    fn sync_index(&mut self) -> StoreResult<()> {
        if !self.index.is_current(&self.store) {
            debug!(
                "{} index built for version {}, store at {}; rebuilding",
                T::KIND,
                self.index.built_for(),
                self.store.version()
            );
            self.rebuild_index()?;
        }
        Ok(())
    }

    fn reserve_bucket(&mut self) -> StoreResult<()> {
        if !self.policy.auto_grow {
            return Ok(());
        }

        let projected = (self.index.len() + 1) as f64 / self.index.size() as f64;
        if projected > self.policy.max_load_factor || self.index.tombstones() > self.index.len() {
            let size =
                IdentifierIndex::recommended_size(self.store.len() + 1, self.policy.initial_size);
            info!(
                "Growing {} index from {} to {} buckets",
                T::KIND,
                self.index.size(),
                size.max(self.index.size())
            );
            self.index
                .rebuild(&self.store, size.max(self.index.size()))?;
        }
        Ok(())
    }

    /// Insert a new record
    ///
    /// # Errors
    ///
    /// * `StoreError::CapacityExceeded` if the catalog is full
    /// * `StoreError::DuplicateIdentifier` if the id is already present
    /// * `StoreError::Index` if the index cannot take the key; the store and
    ///   index are left as they were
    pub fn insert(&mut self, record: T) -> StoreResult<usize> {
        if self.store.is_full() {
            return Err(StoreError::CapacityExceeded {
                capacity: self.store.capacity(),
            });
        }
        if self.index.search(record.id()).is_some() {
            return Err(StoreError::DuplicateIdentifier {
                id: record.id().to_string(),
            });
        }
        self.reserve_bucket()?;
        if self.index.len() >= self.index.size() {
            return Err(IndexError::TableFull {
                size: self.index.size(),
            }
            .into());
        }

        let id = record.id().to_string();
        let version = self.store.version();
        let position = self.store.append(record)?;

        if self.store.version() != version {
            // append compacted the store first; the new record is already in
            // the slot array so a rebuild picks it up
            if let Err(e) = self.rebuild_index() {
                warn!("Index rebuild refused {} {}: {}", T::KIND, id, e);
                self.store.remove_at(position)?;
                self.store.compact();
                self.rebuild_index()?;
                return Err(e);
            }
            return Ok(position);
        }

        if let Err(e) = self.index.insert(&id, position) {
            warn!("Index refused {} {}: {}", T::KIND, id, e);
            self.store.remove_at(position)?;
            return Err(e.into());
        }
        Ok(position)
    }

    /// Record with identifier `id`
    pub fn get(&self, id: &str) -> Option<&T> {
        match self.index.lookup(&self.store, id) {
            Ok(record) => record,
            Err(e) => {
                warn!("{}; falling back to a linear scan", e);
                self.store
                    .position_of(id)
                    .and_then(|position| self.store.get(position))
            }
        }
    }

    /// Check if a record with identifier `id` exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Current store position of `id`
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.get(id).and(self.index.search(id))
    }

    /// Replace the record with the same identifier, returning the old one
    pub fn replace(&mut self, record: T) -> StoreResult<T> {
        let position = self
            .index
            .search(record.id())
            .ok_or_else(|| StoreError::UnknownIdentifier {
                id: record.id().to_string(),
            })?;
        self.store.replace_at(position, record)
    }

    /// Remove the record with identifier `id`
    ///
    /// Leaves a hole in the store and a tombstone in the index; positions of
    /// the other records do not change.
    pub fn remove(&mut self, id: &str) -> StoreResult<T> {
        let position = self
            .index
            .remove(id)
            .ok_or_else(|| StoreError::UnknownIdentifier { id: id.to_string() })?;
        self.store.remove_at(position)
    }

    /// Close holes left by removals, then rebuild the index
    pub fn compact(&mut self) -> StoreResult<usize> {
        let closed = self.store.compact();
        self.sync_index()?;
        Ok(closed)
    }

    /// Remove every record
    pub fn clear(&mut self) -> StoreResult<()> {
        self.store.clear();
        self.sync_index()
    }

    /// Sort by `K` with its default algorithm and view the result
    pub fn sorted<K: SortKey<T>>(&mut self) -> StoreResult<Ordered<'_, T, K>> {
        self.sorted_with::<K>(K::ALGORITHM)
    }

    /// Sort by `K` with `algorithm` and view the result
    ///
    /// The store is reordered in place and the index rebuilt, so the
    /// ordering persists after the view is dropped.
    pub fn sorted_with<K: SortKey<T>>(
        &mut self,
        algorithm: SortAlgorithm,
    ) -> StoreResult<Ordered<'_, T, K>> {
        sort_store::<T, K>(&mut self.store, algorithm)?;
        self.sync_index()?;
        Ok(Ordered::from_sorted(&self.store))
    }

    /// Statistics for the store and its index
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            store: self.store.stats(),
            index: self.index.stats(),
        }
    }

    /// Cross-check the index against the store
    ///
    /// Returns a description of every inconsistency; empty means consistent.
    pub fn verify(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.index.is_current(&self.store) {
            problems.push(format!(
                "index built for version {}, store at {}",
                self.index.built_for(),
                self.store.version()
            ));
        }
        if self.index.len() != self.store.len() {
            problems.push(format!(
                "index holds {} keys, store holds {} records",
                self.index.len(),
                self.store.len()
            ));
        }
        for (position, record) in self.store.iter() {
            match self.index.search(record.id()) {
                Some(slot) if slot == position => {}
                Some(slot) => problems.push(format!(
                    "{} indexed at slot {}, stored at {}",
                    record.id(),
                    slot,
                    position
                )),
                None => problems.push(format!("{} is not indexed", record.id())),
            }
        }
        problems
    }

    fn accept(&mut self, record: T) -> CodecResult<SinkOutcome> {
        match self.insert(record) {
            Ok(_) => Ok(SinkOutcome::Accepted),
            Err(e @ StoreError::CapacityExceeded { .. }) => Ok(SinkOutcome::Full(e.to_string())),
            Err(e @ StoreError::DuplicateIdentifier { .. }) => {
                Ok(SinkOutcome::Skipped(e.to_string()))
            }
            Err(StoreError::Index(IndexError::TableFull { size })) => Ok(SinkOutcome::Full(
                format!("identifier index is full ({} buckets)", size),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

impl<T: Record + LineRecord> Catalog<T> {
    /// Load records from `text`, adding them to this catalog
    pub fn load_str(&mut self, text: &str, header_lines: usize) -> CodecResult<LoadReport> {
        RecordReader::new(header_lines).read_str(text, |record| self.accept(record))
    }

    /// Load records from the file at `path`, adding them to this catalog
    ///
    /// # Errors
    ///
    /// Returns `CodecError::NotFound` if the file cannot be opened. Bad lines
    /// are reported in the returned [`LoadReport`], not as errors.
    pub fn load_file(&mut self, path: &Path, header_lines: usize) -> CodecResult<LoadReport> {
        RecordReader::new(header_lines).load_file(path, |record| self.accept(record))
    }

    /// Write every live record to `path` in store order
    pub fn save_file(&self, path: &Path, header_lines: usize) -> CodecResult<usize> {
        save_file(path, header_lines, self.store.records())
    }
}
