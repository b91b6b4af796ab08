//! In-place ordering of record stores
//!
//! Four comparison sorts are provided as generic slice algorithms:
//!
//! - **Selection sort**: O(n²) comparisons, O(n) swaps, unstable. On ties the
//!   first extremal element encountered wins.
//! - **Bubble sort**: O(n²) worst case, stable, stops early once a pass makes
//!   no swap. Meant for the small job collection.
//! - **Insertion sort**: O(n²) worst case, stable, linear on input that is
//!   already in order. Used for name listings.
//! - **Merge sort**: O(n log n) with O(n) scratch per merge. Ties take the left
//!   half first, so equal keys keep their relative order.
//!
//! Stores are sorted through typed keys ([`SortKey`]). Sorting sorts a list of
//! `(position, &record)` handles and then rearranges the store to match, so
//! the store's own positions change and its version is bumped. A sorted store
//! is viewed through [`Ordered`], which carries the key in its type; the
//! position-based searches are only offered on views whose key matches the
//! probed field.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::models::{Job, Record, Student};
use crate::app::search;
use crate::app::store::RecordStore;
use crate::errors::StoreResult;

/// Available sort algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    Selection,
    Bubble,
    Insertion,
    Merge,
}

impl SortAlgorithm {
    /// Sort `items` in place with this algorithm
    pub fn sort_by<T, F>(self, items: &mut [T], compare: F)
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        match self {
            SortAlgorithm::Selection => selection_sort_by(items, compare),
            SortAlgorithm::Bubble => bubble_sort_by(items, compare),
            SortAlgorithm::Insertion => insertion_sort_by(items, compare),
            SortAlgorithm::Merge => merge_sort_by(items, compare),
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortAlgorithm::Selection => "selection",
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Merge => "merge",
        };
        f.write_str(name)
    }
}

impl FromStr for SortAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selection" => Ok(SortAlgorithm::Selection),
            "bubble" => Ok(SortAlgorithm::Bubble),
            "insertion" => Ok(SortAlgorithm::Insertion),
            "merge" => Ok(SortAlgorithm::Merge),
            other => Err(format!("Unknown sort algorithm: {}", other)),
        }
    }
}

/// Selection sort
pub fn selection_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    for i in 0..len.saturating_sub(1) {
        let mut best = i;
        for j in (i + 1)..len {
            if compare(&items[j], &items[best]) == Ordering::Less {
                best = j;
            }
        }
        if best != i {
            items.swap(i, best);
        }
    }
}

/// Bubble sort
pub fn bubble_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    for pass in 0..len.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..(len - pass - 1) {
            if compare(&items[j], &items[j + 1]) == Ordering::Greater {
                items.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}

/// Insertion sort
///
/// Each element is shifted left past every strictly greater predecessor, so
/// equal keys never cross.
pub fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Merge sort
pub fn merge_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    merge_sort_range(items, &mut compare);
}

fn merge_sort_range<T, F>(items: &mut [T], compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }

    // Left half takes the middle element, as in low + (high - low) / 2
    let mid = (items.len() + 1) / 2;
    merge_sort_range(&mut items[..mid], compare);
    merge_sort_range(&mut items[mid..], compare);

    let left = items[..mid].to_vec();
    let right = items[mid..].to_vec();
    let (mut i, mut j, mut k) = (0, 0, 0);

    while i < left.len() && j < right.len() {
        if compare(&left[i], &right[j]) != Ordering::Greater {
            items[k] = left[i].clone();
            i += 1;
        } else {
            items[k] = right[j].clone();
            j += 1;
        }
        k += 1;
    }
    for item in left[i..].iter().chain(right[j..].iter()) {
        items[k] = item.clone();
        k += 1;
    }
}

/// Total order over records of type `T`
pub trait SortKey<T> {
    /// Name used in logs and reports
    const NAME: &'static str;

    /// Algorithm used when the caller does not choose one
    const ALGORITHM: SortAlgorithm;

    /// Compare two records
    fn compare(a: &T, b: &T) -> Ordering;
}

/// Identifier ascending (selection sort)
#[derive(Debug, Clone, Copy)]
pub struct ById;

/// GPA descending (selection sort)
#[derive(Debug, Clone, Copy)]
pub struct ByGpaDescending;

/// GPA ascending (selection sort); the order interpolation search needs
#[derive(Debug, Clone, Copy)]
pub struct ByGpaAscending;

/// Name ascending (insertion sort)
#[derive(Debug, Clone, Copy)]
pub struct ByName;

/// Deadline ascending (bubble sort)
#[derive(Debug, Clone, Copy)]
pub struct ByDeadline;

/// Title ascending (bubble sort)
#[derive(Debug, Clone, Copy)]
pub struct ByTitle;

/// Company ascending (merge sort)
#[derive(Debug, Clone, Copy)]
pub struct ByCompany;

impl<T: Record> SortKey<T> for ById {
    const NAME: &'static str = "id";
    const ALGORITHM: SortAlgorithm = SortAlgorithm::Selection;

    fn compare(a: &T, b: &T) -> Ordering {
        a.id().cmp(b.id())
    }
}

impl SortKey<Student> for ByGpaDescending {
    const NAME: &'static str = "gpa-desc";
    const ALGORITHM: SortAlgorithm = SortAlgorithm::Selection;

    fn compare(a: &Student, b: &Student) -> Ordering {
        b.gpa.total_cmp(&a.gpa)
    }
}

impl SortKey<Student> for ByGpaAscending {
    const NAME: &'static str = "gpa-asc";
    const ALGORITHM: SortAlgorithm = SortAlgorithm::Selection;

    fn compare(a: &Student, b: &Student) -> Ordering {
        a.gpa.total_cmp(&b.gpa)
    }
}

impl SortKey<Student> for ByName {
    const NAME: &'static str = "name";
    const ALGORITHM: SortAlgorithm = SortAlgorithm::Insertion;

    fn compare(a: &Student, b: &Student) -> Ordering {
        a.name.cmp(&b.name)
    }
}

impl SortKey<Job> for ByDeadline {
    const NAME: &'static str = "deadline";
    const ALGORITHM: SortAlgorithm = SortAlgorithm::Bubble;

    fn compare(a: &Job, b: &Job) -> Ordering {
        a.deadline.cmp(&b.deadline)
    }
}

impl SortKey<Job> for ByTitle {
    const NAME: &'static str = "title";
    const ALGORITHM: SortAlgorithm = SortAlgorithm::Bubble;

    fn compare(a: &Job, b: &Job) -> Ordering {
        a.title.cmp(&b.title)
    }
}

impl SortKey<Job> for ByCompany {
    const NAME: &'static str = "company";
    const ALGORITHM: SortAlgorithm = SortAlgorithm::Merge;

    fn compare(a: &Job, b: &Job) -> Ordering {
        a.company.cmp(&b.company)
    }
}

/// Reorder `store` in place by key `K` using `algorithm`
///
/// Holes are dropped and the store version is bumped, so any identifier
/// index or positional data built before the call is stale afterwards.
pub fn sort_store<T, K>(store: &mut RecordStore<T>, algorithm: SortAlgorithm) -> StoreResult<()>
where
    T: Record,
    K: SortKey<T>,
{
    let mut handles: Vec<(usize, &T)> = store.iter().collect();
    algorithm.sort_by(&mut handles, |a, b| K::compare(a.1, b.1));
    let order: Vec<usize> = handles.iter().map(|(position, _)| *position).collect();

    store.reorder(&order)?;
    info!(
        "Sorted {} {} by {} using {} sort",
        order.len(),
        T::KIND.plural(),
        K::NAME,
        algorithm
    );
    Ok(())
}

/// Read-only view of a store that is ordered by key `K`
///
/// The view borrows the store, so the store cannot change while the view
/// exists and the ordering cannot go stale under it.
#[derive(Debug)]
pub struct Ordered<'a, T, K> {
    records: Vec<&'a T>,
    _key: PhantomData<K>,
}

impl<'a, T, K> Ordered<'a, T, K>
where
    T: Record,
    K: SortKey<T>,
{
    /// Sort `store` by `K` with the key's default algorithm and view it
    pub fn sort(store: &'a mut RecordStore<T>) -> StoreResult<Self> {
        Self::sort_with(store, K::ALGORITHM)
    }

    /// Sort `store` by `K` with an explicit algorithm and view it
    pub fn sort_with(store: &'a mut RecordStore<T>, algorithm: SortAlgorithm) -> StoreResult<Self> {
        sort_store::<T, K>(store, algorithm)?;
        let store: &'a RecordStore<T> = store;
        Ok(Self::from_sorted(store))
    }

    /// View a store the caller has just sorted by `K`
    pub(crate) fn from_sorted(store: &'a RecordStore<T>) -> Self {
        Self {
            records: store.records().collect(),
            _key: PhantomData,
        }
    }

    /// Name of the ordering key
    pub fn key_name(&self) -> &'static str {
        K::NAME
    }

    /// Number of records in the view
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the view is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `position`
    pub fn get(&self, position: usize) -> Option<&'a T> {
        self.records.get(position).copied()
    }

    /// Records in order
    pub fn records(&self) -> &[&'a T] {
        &self.records
    }

    /// Iterate records in order
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.records.iter().copied()
    }
}

impl<'a, T: Record> Ordered<'a, T, ById> {
    /// Binary search for `id`, returning its position
    pub fn binary_search(&self, id: &str) -> Option<usize> {
        search::binary_search_by(&self.records, |record| record.id().cmp(id))
    }

    /// Fibonacci search for `id`, returning its position
    pub fn fibonacci_search(&self, id: &str) -> Option<usize> {
        search::fibonacci_search_by(&self.records, |record| record.id().cmp(id))
    }

    /// Binary search for `id`, returning the record
    pub fn find(&self, id: &str) -> Option<&'a T> {
        self.binary_search(id).and_then(|position| self.get(position))
    }
}

impl<'a> Ordered<'a, Student, ByGpaAscending> {
    /// Interpolation search for a student with exactly `gpa`
    pub fn interpolation_search(&self, gpa: f32) -> Option<usize> {
        search::interpolation_search_by(&self.records, f64::from(gpa), |student| {
            f64::from(student.gpa)
        })
    }
}
