//! Insertion-ordered application ledger
//!
//! Applications are kept in a singly linked list in the order they were
//! made. The ledger owns every node; iteration hands out shared references
//! only, and the one permitted mutation, a status change, is done on the
//! matching node in place.

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::app::codec::{encode_line, header_lines, save_file, LoadReport, RecordReader, SinkOutcome};
use crate::app::models::{Application, ApplicationStatus, Job};
use crate::constants::store::MAX_APPLICATIONS;
use crate::errors::{CodecResult, LedgerError, LedgerResult};

struct Node {
    application: Application,
    next: Option<Box<Node>>,
}

/// Singly linked list of applications
pub struct ApplicationLedger {
    head: Option<Box<Node>>,
    len: usize,
    capacity: usize,
}

impl ApplicationLedger {
    /// Create an empty ledger holding at most `capacity` applications
    pub fn new(capacity: usize) -> Self {
        Self {
            head: None,
            len: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Append `application` at the tail without checking for duplicates
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CapacityExceeded` when the ledger is full.
    pub fn append(&mut self, application: Application) -> LedgerResult<()> {
        if self.is_full() {
            return Err(LedgerError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        *cursor = Some(Box::new(Node {
            application,
            next: None,
        }));
        self.len += 1;
        Ok(())
    }

    /// Record a new application, refusing a second one for the same pair
    ///
    /// # Errors
    ///
    /// * `LedgerError::DuplicateApplication` if the student already applied
    ///   for this job
    /// * `LedgerError::CapacityExceeded` when the ledger is full
    pub fn apply(&mut self, application: Application) -> LedgerResult<()> {
        if self.find(&application.student_id, &application.job_id) {
            return Err(LedgerError::DuplicateApplication {
                student_id: application.student_id,
                job_id: application.job_id,
            });
        }

        debug!(
            "Student {} applies for job {}",
            application.student_id, application.job_id
        );
        self.append(application)
    }

    /// Apply `student_id` to an open `job`, copying its title and company
    ///
    /// # Errors
    ///
    /// * `LedgerError::JobClosed` if the listing is no longer active
    /// * anything [`apply`](Self::apply) returns
    pub fn apply_to(&mut self, student_id: impl Into<String>, job: &Job) -> LedgerResult<()> {
        if !job.active {
            return Err(LedgerError::JobClosed {
                job_id: job.id.clone(),
            });
        }
        self.apply(Application::for_job(student_id, job))
    }

    /// Check if `student_id` has applied for `job_id`
    pub fn find(&self, student_id: &str, job_id: &str) -> bool {
        self.get(student_id, job_id).is_some()
    }

    /// Application for the pair, if any
    pub fn get(&self, student_id: &str, job_id: &str) -> Option<&Application> {
        self.iter().find(|app| app.matches(student_id, job_id))
    }

    /// Change the status of one application, returning the previous status
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if there is no application for the pair.
    pub fn set_status(
        &mut self,
        student_id: &str,
        job_id: &str,
        status: ApplicationStatus,
    ) -> LedgerResult<ApplicationStatus> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.application.matches(student_id, job_id) {
                let previous = node.application.status;
                node.application.status = status;
                info!(
                    "Application {}/{}: {} -> {}",
                    student_id, job_id, previous, status
                );
                return Ok(previous);
            }
            cursor = node.next.as_deref_mut();
        }

        Err(LedgerError::NotFound {
            student_id: student_id.to_string(),
            job_id: job_id.to_string(),
        })
    }

    /// Borrowing iterator in insertion order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Visit every application in insertion order
    pub fn for_each<F>(&self, visit: F)
    where
        F: FnMut(&Application),
    {
        self.iter().for_each(visit);
    }

    /// Applications made by `student_id`
    pub fn for_student<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a Application> {
        self.iter().filter(move |app| app.student_id == student_id)
    }

    /// Applications for `job_id`
    pub fn for_job<'a>(&'a self, job_id: &'a str) -> impl Iterator<Item = &'a Application> {
        self.iter().filter(move |app| app.job_id == job_id)
    }

    /// Drop every application
    pub fn clear(&mut self) {
        let mut next = self.head.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
        self.len = 0;
    }

    /// Encode every application as lines, preceded by `header_count` header lines
    pub fn serialize(&self, header_count: usize) -> String {
        let mut text = String::new();
        for line in header_lines::<Application>(header_count) {
            text.push_str(&line);
            text.push('\n');
        }
        for application in self.iter() {
            text.push_str(&encode_line(application));
            text.push('\n');
        }
        text
    }

    /// Build a ledger from serialized text
    ///
    /// Malformed lines and repeated (student, job) pairs are skipped and
    /// reported in the returned [`LoadReport`].
    pub fn deserialize(
        text: &str,
        header_count: usize,
        capacity: usize,
    ) -> CodecResult<(Self, LoadReport)> {
        let mut ledger = Self::new(capacity);
        let report = RecordReader::new(header_count).read_str(text, |app| Ok(ledger.accept(app)))?;
        Ok((ledger, report))
    }

    /// Replace the contents of this ledger with the file at `path`
    ///
    /// The ledger is only cleared once the file has been opened.
    pub fn load_file(&mut self, path: &Path, header_count: usize) -> CodecResult<LoadReport> {
        let mut loaded = Self::new(self.capacity);
        let report =
            RecordReader::new(header_count).load_file(path, |app| Ok(loaded.accept(app)))?;
        *self = loaded;
        Ok(report)
    }

    /// Write every application to `path` in insertion order
    pub fn save_file(&self, path: &Path, header_count: usize) -> CodecResult<usize> {
        save_file(path, header_count, self.iter())
    }

    fn accept(&mut self, application: Application) -> SinkOutcome {
        match self.apply(application) {
            Ok(()) => SinkOutcome::Accepted,
            Err(e @ LedgerError::CapacityExceeded { .. }) => SinkOutcome::Full(e.to_string()),
            Err(e) => SinkOutcome::Skipped(e.to_string()),
        }
    }
}

impl Default for ApplicationLedger {
    fn default() -> Self {
        Self::new(MAX_APPLICATIONS)
    }
}

impl Drop for ApplicationLedger {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for ApplicationLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over an [`ApplicationLedger`]
pub struct Iter<'a> {
    next: Option<&'a Node>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Application;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            self.remaining -= 1;
            &node.application
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a ApplicationLedger {
    type Item = &'a Application;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
