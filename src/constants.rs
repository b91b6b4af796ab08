//! Application constants for the internship tracker
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

/// Record store capacities
pub mod store {
    /// Default maximum number of students
    pub const MAX_STUDENTS: usize = 100;

    /// Default maximum number of job listings
    pub const MAX_JOBS: usize = 50;

    /// Default maximum number of applications
    pub const MAX_APPLICATIONS: usize = 200;
}

/// Identifier index tuning
pub mod index {
    /// Default bucket count for a fresh table
    pub const DEFAULT_TABLE_SIZE: usize = 10;

    /// Multiplier of the polynomial rolling hash
    pub const HASH_MULTIPLIER: u64 = 31;

    /// Load factor above which the table is rebuilt at a larger size
    pub const MAX_LOAD_FACTOR: f64 = 0.8;

    /// Growth factor applied to the live record count on rebuild
    pub const GROWTH_FACTOR: usize = 2;
}

/// Record file format
pub mod codec {
    /// Field delimiter within a record line
    pub const FIELD_DELIMITER: char = '|';

    /// Fields in a student line: name|identifier|email|cgpa|diploma|skills
    pub const STUDENT_FIELDS: usize = 6;

    /// Fields in a job line: jobId|title|company|deadline|requirements
    pub const JOB_FIELDS: usize = 5;

    /// Fields in an application line: studentId|jobId|jobTitle|company|status
    pub const APPLICATION_FIELDS: usize = 5;

    /// Decimal places written for GPA values
    pub const GPA_PRECISION: usize = 2;

    /// Character used for header separator lines
    pub const HEADER_RULE: char = '-';
}

/// Default record file names
pub mod files {
    /// Student records
    pub const STUDENTS: &str = "students.txt";

    /// Job listings
    pub const JOBS: &str = "job_listings.txt";

    /// Applications
    pub const APPLICATIONS: &str = "applications.txt";

    /// Project-local configuration file
    pub const LOCAL_CONFIG: &str = "internship-tracker.toml";

    /// Directory name under the user config directory
    pub const CONFIG_DIR_NAME: &str = "internship-tracker";
}

/// Registration validation limits
pub mod validation {
    /// Exact length of a registered student identifier
    pub const STUDENT_ID_LENGTH: usize = 10;

    /// Shortest acceptable email address
    pub const MIN_EMAIL_LENGTH: usize = 5;

    /// Lowest permitted GPA
    pub const MIN_GPA: f32 = 0.0;

    /// Highest permitted GPA
    pub const MAX_GPA: f32 = 4.0;

    /// Deadline date format
    pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";
}

/// GPA report bands
pub mod report {
    /// Lowest GPA in band A
    pub const GRADE_A_MIN: f32 = 3.5;

    /// Lowest GPA in band B
    pub const GRADE_B_MIN: f32 = 3.0;

    /// Lowest GPA in band C; anything below is band D
    pub const GRADE_C_MIN: f32 = 2.5;

    /// Students listed in the top performers table
    pub const TOP_STUDENTS: usize = 10;
}

// Re-export commonly used constants at module level for convenience
pub use codec::FIELD_DELIMITER;
pub use index::{DEFAULT_TABLE_SIZE, MAX_LOAD_FACTOR};
pub use store::{MAX_APPLICATIONS, MAX_JOBS, MAX_STUDENTS};
