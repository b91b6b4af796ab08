//! Conversion between record lines and records
//!
//! One record per line, fields joined by `|`. Fields are trimmed on read.
//! There is no escaping: a field that itself contains `|` cannot be
//! represented. Older files end every line with a trailing `|`; that one
//! empty trailing field is tolerated.

use tracing::debug;

use crate::app::models::{Application, ApplicationStatus, Entity, EntityKind, Job, Student};
use crate::constants::codec::{
    APPLICATION_FIELDS, FIELD_DELIMITER, GPA_PRECISION, HEADER_RULE, JOB_FIELDS, STUDENT_FIELDS,
};
use crate::constants::validation::{MAX_GPA, MIN_GPA};
use crate::errors::{CodecError, CodecResult};

/// A record with a fixed line layout
pub trait LineRecord: Sized {
    /// Kind tag of this record type
    const KIND: EntityKind;

    /// Number of fields in a line
    const FIELD_COUNT: usize;

    /// Column titles written as the first header line
    const HEADER: &'static [&'static str];

    /// Build a record from exactly `FIELD_COUNT` trimmed fields
    ///
    /// Returns the reason the line is unusable on failure.
    fn from_fields(fields: &[&str]) -> Result<Self, String>;

    /// Fields in line order
    fn to_fields(&self) -> Vec<String>;
}

/// Split a line on the field delimiter, trimming every field
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).map(str::trim).collect()
}

/// Parse a GPA leniently: unparsable or non-finite text reads as 0.0
pub fn parse_gpa(text: &str) -> f32 {
    match text.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!("Unparsable GPA {:?}, using 0.0", text);
            0.0
        }
    }
}

/// Decode one line into a record
///
/// # Arguments
///
/// * `line` - Raw line without its terminator
/// * `line_number` - 1-based physical line number, used in diagnostics
///
/// # Errors
///
/// Returns `CodecError::Malformed` for a wrong field count or an unusable
/// required field.
pub fn decode_line<T: LineRecord>(line: &str, line_number: usize) -> CodecResult<T> {
    let mut fields = split_fields(line);

    if fields.len() == T::FIELD_COUNT + 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }

    if fields.len() != T::FIELD_COUNT {
        return Err(CodecError::Malformed {
            line: line_number,
            reason: format!(
                "expected {} fields for a {} record, found {}",
                T::FIELD_COUNT,
                T::KIND,
                fields.len()
            ),
        });
    }

    T::from_fields(&fields).map_err(|reason| CodecError::Malformed {
        line: line_number,
        reason,
    })
}

/// Encode a record as one line, without terminator
pub fn encode_line<T: LineRecord>(record: &T) -> String {
    record.to_fields().join(&FIELD_DELIMITER.to_string())
}

/// Header block of `count` lines: column titles, then separator rules
pub fn header_lines<T: LineRecord>(count: usize) -> Vec<String> {
    let titles = T::HEADER.join(&FIELD_DELIMITER.to_string());
    let rule: String = std::iter::repeat(HEADER_RULE).take(titles.len()).collect();

    (0..count)
        .map(|i| if i == 0 { titles.clone() } else { rule.clone() })
        .collect()
}

/// Decode a line of the given kind into a tagged entity
pub fn decode_entity(kind: EntityKind, line: &str, line_number: usize) -> CodecResult<Entity> {
    Ok(match kind {
        EntityKind::Student => Entity::Student(decode_line(line, line_number)?),
        EntityKind::Job => Entity::Job(decode_line(line, line_number)?),
        EntityKind::Application => Entity::Application(decode_line(line, line_number)?),
    })
}

/// Encode a tagged entity as one line
pub fn encode_entity(entity: &Entity) -> String {
    match entity {
        Entity::Student(student) => encode_line(student),
        Entity::Job(job) => encode_line(job),
        Entity::Application(application) => encode_line(application),
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("empty {}", field))
    } else {
        Ok(value)
    }
}

impl LineRecord for Student {
    const KIND: EntityKind = EntityKind::Student;
    const FIELD_COUNT: usize = STUDENT_FIELDS;
    const HEADER: &'static [&'static str] =
        &["Name", "Student ID", "Email", "CGPA", "Diploma", "Skills"];

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let name = required(fields[0], "name")?;
        let id = required(fields[1], "student ID")?;
        if !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("student ID must be numeric: {}", id));
        }
        let email = required(fields[2], "email")?;

        let gpa = parse_gpa(fields[3]);
        if !(MIN_GPA..=MAX_GPA).contains(&gpa) {
            return Err(format!("CGPA out of range: {}", fields[3]));
        }

        let diploma = required(fields[4], "diploma")?;

        Ok(Student::new(id, name, email, gpa, diploma, fields[5]))
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.id.clone(),
            self.email.clone(),
            format!("{:.*}", GPA_PRECISION, self.gpa),
            self.diploma.clone(),
            self.skills.clone(),
        ]
    }
}

impl LineRecord for Job {
    const KIND: EntityKind = EntityKind::Job;
    const FIELD_COUNT: usize = JOB_FIELDS;
    const HEADER: &'static [&'static str] =
        &["Job ID", "Title", "Company", "Deadline", "Requirements"];

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let id = required(fields[0], "job ID")?;
        let title = required(fields[1], "title")?;
        let company = required(fields[2], "company")?;
        let deadline = required(fields[3], "deadline")?;

        Ok(Job::new(id, title, company, deadline, fields[4]))
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.company.clone(),
            self.deadline.clone(),
            self.requirements.clone(),
        ]
    }
}

impl LineRecord for Application {
    const KIND: EntityKind = EntityKind::Application;
    const FIELD_COUNT: usize = APPLICATION_FIELDS;
    const HEADER: &'static [&'static str] =
        &["Student ID", "Job ID", "Job Title", "Company", "Status"];

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let student_id = required(fields[0], "student ID")?;
        let job_id = required(fields[1], "job ID")?;
        let status: ApplicationStatus = fields[4].parse()?;

        Ok(Application::new(
            student_id, job_id, fields[2], fields[3], status,
        ))
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.student_id.clone(),
            self.job_id.clone(),
            self.job_title.clone(),
            self.company.clone(),
            self.status.to_string(),
        ]
    }
}
