//! Data models for the internship tracker
//!
//! This module contains the record types held by the store: students, job
//! listings and applications, plus the small amount of shared behaviour the
//! store, index and codec need from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind tag for the three record files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Student,
    Job,
    Application,
}

impl EntityKind {
    /// Human readable plural name used in log output
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Student => "students",
            EntityKind::Job => "jobs",
            EntityKind::Application => "applications",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Student => "student",
            EntityKind::Job => "job",
            EntityKind::Application => "application",
        };
        f.write_str(name)
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "students" => Ok(EntityKind::Student),
            "job" | "jobs" => Ok(EntityKind::Job),
            "application" | "applications" => Ok(EntityKind::Application),
            other => Err(format!("Unknown record kind: {}", other)),
        }
    }
}

/// A record with a unique, immutable identifier
///
/// Implemented by the kinds that live in a [`RecordStore`](crate::app::store::RecordStore)
/// and are reachable through an [`IdentifierIndex`](crate::app::index::IdentifierIndex).
pub trait Record: Clone + fmt::Debug {
    /// Kind tag of this record type
    const KIND: EntityKind;

    /// Unique identifier of this record
    fn id(&self) -> &str;
}

/// Registered student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Numeric identifier in its fixed-width textual form
    pub id: String,
    pub name: String,
    pub email: String,
    /// Grade point average, 0.0 to 4.0 inclusive
    pub gpa: f32,
    /// Programme or diploma label
    pub diploma: String,
    /// Free-text skills
    pub skills: String,
}

impl Student {
    /// Create a new student record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        gpa: f32,
        diploma: impl Into<String>,
        skills: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            gpa,
            diploma: diploma.into(),
            skills: skills.into(),
        }
    }
}

impl Record for Student {
    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) | {} | GPA {:.2} | {} | {}",
            self.name, self.id, self.email, self.gpa, self.diploma, self.skills
        )
    }
}

/// Internship job listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    /// Application deadline as written in the record file (YYYY-MM-DD)
    pub deadline: String,
    pub requirements: String,
    /// Whether the listing still accepts applications
    ///
    /// Not written to the record file; every loaded listing starts active.
    pub active: bool,
}

impl Job {
    /// Create a new, active job listing
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        company: impl Into<String>,
        deadline: impl Into<String>,
        requirements: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: company.into(),
            deadline: deadline.into(),
            requirements: requirements.into(),
            active: true,
        }
    }
}

impl Record for Job {
    const KIND: EntityKind = EntityKind::Job;

    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} at {} | deadline {}{}",
            self.id,
            self.title,
            self.company,
            self.deadline,
            if self.active { "" } else { " (closed)" }
        )
    }
}

/// Review status of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Text form used in record files
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Check if the application has been decided
    pub fn is_final(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("Unknown application status: {}", other)),
        }
    }
}

/// Application of one student to one job
///
/// `student_id` and `job_id` are weak references: nothing guarantees the
/// student or job still exists. Title and company are copied from the job
/// at application time so the record stays displayable either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub student_id: String,
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub status: ApplicationStatus,
}

impl Application {
    /// Create an application record from its parts
    pub fn new(
        student_id: impl Into<String>,
        job_id: impl Into<String>,
        job_title: impl Into<String>,
        company: impl Into<String>,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            job_id: job_id.into(),
            job_title: job_title.into(),
            company: company.into(),
            status,
        }
    }

    /// Create a pending application for a job, copying its display fields
    pub fn for_job(student_id: impl Into<String>, job: &Job) -> Self {
        Self::new(
            student_id,
            job.id.clone(),
            job.title.clone(),
            job.company.clone(),
            ApplicationStatus::Pending,
        )
    }

    /// Check if this application is for the given student/job pair
    pub fn matches(&self, student_id: &str, job_id: &str) -> bool {
        self.student_id == student_id && self.job_id == job_id
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} | {} at {} | {}",
            self.student_id, self.job_id, self.job_title, self.company, self.status
        )
    }
}

/// Any record read from a record file, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Student(Student),
    Job(Job),
    Application(Application),
}

impl Entity {
    /// Kind tag of the wrapped record
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Student(_) => EntityKind::Student,
            Entity::Job(_) => EntityKind::Job,
            Entity::Application(_) => EntityKind::Application,
        }
    }

    /// Key identifying the record; applications are keyed by their pair
    pub fn key(&self) -> String {
        match self {
            Entity::Student(student) => student.id.clone(),
            Entity::Job(job) => job.id.clone(),
            Entity::Application(app) => format!("{}/{}", app.student_id, app.job_id),
        }
    }
}

impl From<Student> for Entity {
    fn from(student: Student) -> Self {
        Entity::Student(student)
    }
}

impl From<Job> for Entity {
    fn from(job: Job) -> Self {
        Entity::Job(job)
    }
}

impl From<Application> for Entity {
    fn from(application: Application) -> Self {
        Entity::Application(application)
    }
}
