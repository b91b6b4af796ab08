//! Command-line argument parsing for the internship tracker
//!
//! This module defines the CLI structure using clap derive macros: one
//! subcommand group per record collection plus file checking, statistics
//! and configuration management.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::models::ApplicationStatus;
use crate::app::ordering::SortAlgorithm;

/// Internship Tracker - manage students, job listings and applications
#[derive(Parser, Debug)]
#[command(
    name = "internship_tracker",
    version,
    about = "Manage internship students, job listings and applications",
    long_about = "Loads student, job and application record files, answers lookups, sorted listings and
searches over them, and records new registrations and applications."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the record files
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query and register students
    Students(StudentsArgs),

    /// Query and register job listings
    Jobs(JobsArgs),

    /// Record and review applications
    Applications(ApplicationsArgs),

    /// Load every record file and report skipped lines
    Check,

    /// Show store and index statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// How to find a record by identifier
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMethod {
    /// Identifier index
    #[default]
    Hash,
    /// Sort by id, then binary search
    Binary,
    /// Sort by id, then Fibonacci search
    Fibonacci,
}

/// Student listing orders
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentOrder {
    Id,
    Name,
    GpaDesc,
    GpaAsc,
}

/// Job listing orders
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOrder {
    Id,
    Deadline,
    Title,
    Company,
}

/// Arguments for student commands
#[derive(Args, Debug)]
pub struct StudentsArgs {
    /// Save even if lines skipped on load would be dropped from the file
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub action: StudentsAction,
}

/// Student actions
#[derive(Subcommand, Debug)]
pub enum StudentsAction {
    /// List students, in file order unless an order is given
    List {
        /// Sort before listing
        #[arg(short, long, value_enum)]
        sort: Option<StudentOrder>,

        /// Override the sort algorithm (selection, bubble, insertion, merge)
        #[arg(short, long)]
        algorithm: Option<SortAlgorithm>,
    },

    /// Find a student by ID
    Find {
        id: String,

        #[arg(short, long, value_enum, default_value_t = LookupMethod::Hash)]
        method: LookupMethod,
    },

    /// Students whose skills mention a keyword (case-insensitive)
    Search { skill: String },

    /// Students holding a diploma (case-insensitive exact match)
    Diploma { diploma: String },

    /// Students with a GPA within an inclusive range
    Range { min: f32, max: f32 },

    /// Find a student with exactly this GPA (interpolation search)
    Gpa { gpa: f32 },

    /// Register a new student
    Add {
        /// 10-digit student ID
        id: String,
        name: String,
        email: String,
        gpa: f32,
        diploma: String,
        #[arg(default_value = "")]
        skills: String,
    },

    /// Delete a student
    Remove { id: String },
}

/// Arguments for job commands
#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Save even if lines skipped on load would be dropped from the file
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub action: JobsAction,
}

/// Job actions
#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// List jobs, in file order unless an order is given
    List {
        #[arg(short, long, value_enum)]
        sort: Option<JobOrder>,

        #[arg(short, long)]
        algorithm: Option<SortAlgorithm>,
    },

    /// Find a job by ID
    Find {
        id: String,

        #[arg(short, long, value_enum, default_value_t = LookupMethod::Hash)]
        method: LookupMethod,
    },

    /// Jobs whose title or company mentions a keyword (case-insensitive)
    Search {
        keyword: String,

        /// Match the company only
        #[arg(long)]
        company: bool,
    },

    /// Publish a new job listing
    Add {
        id: String,
        title: String,
        company: String,
        /// Deadline as YYYY-MM-DD
        deadline: String,
        #[arg(default_value = "")]
        requirements: String,
    },

    /// Delete a job listing
    Remove { id: String },
}

/// Arguments for application commands
#[derive(Args, Debug)]
pub struct ApplicationsArgs {
    /// Save even if lines skipped on load would be dropped from the file
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub action: ApplicationsAction,
}

/// Application actions
#[derive(Subcommand, Debug)]
pub enum ApplicationsAction {
    /// List applications in the order they were made
    List {
        #[arg(long)]
        student: Option<String>,

        #[arg(long)]
        job: Option<String>,
    },

    /// Apply a student to a job
    Apply { student_id: String, job_id: String },

    /// Change the status of an application
    SetStatus {
        student_id: String,
        job_id: String,
        /// pending, approved or rejected
        status: ApplicationStatus,
    },

    /// Count a student's applications by status
    Summary {
        student_id: String,

        /// Also write the summary to student_summary_<id>.txt in the data directory
        #[arg(long)]
        save: bool,
    },
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Destination (defaults to the user configuration directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        self.explicit_log_level().unwrap_or(tracing::Level::WARN)
    }

    /// Logging level requested by a verbosity flag, if any
    pub fn explicit_log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(verbose: bool, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            very_verbose: false,
            quiet,
            config: None,
            data_dir: None,
        }
    }

    #[test]
    fn test_log_level() {
        let cli_quiet = Cli {
            global: global(false, true),
            command: Commands::Check,
        };
        let cli_verbose = Cli {
            global: global(true, false),
            command: Commands::Check,
        };
        let cli_default = Cli {
            global: global(false, false),
            command: Commands::Stats { json: false },
        };

        assert_eq!(cli_quiet.log_level(), tracing::Level::ERROR);
        assert_eq!(cli_verbose.log_level(), tracing::Level::INFO);
        assert_eq!(cli_default.log_level(), tracing::Level::WARN);
        assert_eq!(cli_default.explicit_log_level(), None);
    }

    #[test]
    fn test_parse_student_find() {
        let cli = Cli::try_parse_from([
            "internship_tracker",
            "--data-dir",
            "/tmp/data",
            "students",
            "find",
            "1002",
            "--method",
            "fibonacci",
        ])
        .unwrap();

        assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/data")));
        match cli.command {
            Commands::Students(StudentsArgs {
                action: StudentsAction::Find { id, method },
                force,
            }) => {
                assert!(!force);
                assert_eq!(id, "1002");
                assert_eq!(method, LookupMethod::Fibonacci);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sort_and_status() {
        let cli = Cli::try_parse_from([
            "internship_tracker",
            "jobs",
            "list",
            "--sort",
            "company",
            "--algorithm",
            "bubble",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Jobs(JobsArgs {
                action: JobsAction::List {
                    sort: Some(JobOrder::Company),
                    algorithm: Some(SortAlgorithm::Bubble),
                },
                ..
            })
        ));

        let cli = Cli::try_parse_from([
            "internship_tracker",
            "applications",
            "set-status",
            "1001",
            "J01",
            "Approved",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Applications(ApplicationsArgs {
                action: ApplicationsAction::SetStatus {
                    status: ApplicationStatus::Approved,
                    ..
                },
                ..
            })
        ));

        let cli = Cli::try_parse_from([
            "internship_tracker",
            "students",
            "add",
            "2024000001",
            "Ann",
            "ann@x.com",
            "3.2",
            "IT",
            "--force",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Students(StudentsArgs {
                force: true,
                action: StudentsAction::Add { .. },
            })
        ));

        let cli = Cli::try_parse_from([
            "internship_tracker",
            "students",
            "list",
            "--sort",
            "name",
            "--algorithm",
            "insertion",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Students(StudentsArgs {
                action: StudentsAction::List {
                    sort: Some(StudentOrder::Name),
                    algorithm: Some(SortAlgorithm::Insertion),
                },
                ..
            })
        ));

        let bad_status = [
            "internship_tracker",
            "applications",
            "set-status",
            "1",
            "J",
            "maybe",
        ];
        assert!(Cli::try_parse_from(bad_status).is_err());
    }
}
