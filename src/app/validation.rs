//! Validation of user-entered records
//!
//! These checks apply when a record is registered interactively. Records
//! loaded from files only go through the codec's field checks, so existing
//! data with legacy identifiers (short numeric student IDs, for example)
//! still loads.

use chrono::NaiveDate;

use crate::app::models::{Job, Student};
use crate::app::store::RecordStore;
use crate::constants::codec::FIELD_DELIMITER;
use crate::constants::validation::{
    DEADLINE_FORMAT, MAX_GPA, MIN_EMAIL_LENGTH, MIN_GPA, STUDENT_ID_LENGTH,
};
use crate::errors::{ValidationError, ValidationResult};

/// Student ID must be exactly ten ASCII digits
pub fn validate_student_id(id: &str) -> ValidationResult<()> {
    if id.len() != STUDENT_ID_LENGTH || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidStudentId {
            id: id.to_string(),
            expected: STUDENT_ID_LENGTH,
        });
    }
    Ok(())
}

/// Email must have an `@`, a `.` and a minimum length
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = |reason| {
        Err(ValidationError::InvalidEmail {
            email: email.to_string(),
            reason,
        })
    };

    if email.len() < MIN_EMAIL_LENGTH {
        return invalid("too short");
    }
    if !email.contains('@') {
        return invalid("missing '@'");
    }
    if !email.contains('.') {
        return invalid("missing '.'");
    }
    Ok(())
}

/// Email must not already belong to a registered student (case-insensitive)
pub fn validate_unique_email(email: &str, students: &RecordStore<Student>) -> ValidationResult<()> {
    if students
        .records()
        .any(|student| student.email.eq_ignore_ascii_case(email))
    {
        return Err(ValidationError::DuplicateEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

pub fn validate_gpa(gpa: f32) -> ValidationResult<()> {
    if !(MIN_GPA..=MAX_GPA).contains(&gpa) {
        return Err(ValidationError::GpaOutOfRange {
            value: gpa,
            min: MIN_GPA,
            max: MAX_GPA,
        });
    }
    Ok(())
}

/// Deadline must be a real calendar date in `YYYY-MM-DD` form
pub fn validate_deadline(deadline: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(deadline, DEADLINE_FORMAT).map_err(|_| {
        ValidationError::InvalidDeadline {
            deadline: deadline.to_string(),
        }
    })
}

/// Required text field: non-empty after trimming and free of the record delimiter
pub fn validate_field(value: &str, field: &'static str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    validate_free_text(value, field)
}

/// Optional text field: may be empty but must stay on one line and not
/// contain the record delimiter
pub fn validate_free_text(value: &str, field: &'static str) -> ValidationResult<()> {
    if value.contains(FIELD_DELIMITER) {
        return Err(ValidationError::ContainsDelimiter { field });
    }
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::ContainsLineBreak { field });
    }
    Ok(())
}

/// Every check a new student must pass before it is stored
///
/// Identifier uniqueness is left to the store, which refuses duplicates.
pub fn validate_new_student(
    student: &Student,
    students: &RecordStore<Student>,
) -> ValidationResult<()> {
    validate_field(&student.name, "Name")?;
    validate_student_id(&student.id)?;
    validate_field(&student.email, "Email")?;
    validate_email(&student.email)?;
    validate_unique_email(&student.email, students)?;
    validate_gpa(student.gpa)?;
    validate_field(&student.diploma, "Diploma")?;
    validate_free_text(&student.skills, "Skills")
}

/// Every check a new job must pass before it is stored
pub fn validate_new_job(job: &Job) -> ValidationResult<()> {
    validate_field(&job.id, "Job ID")?;
    validate_field(&job.title, "Title")?;
    validate_field(&job.company, "Company")?;
    validate_deadline(&job.deadline)?;
    validate_free_text(&job.requirements, "Requirements")
}
