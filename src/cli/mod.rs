//! Command-line interface components
//!
//! This module contains CLI-specific code for the internship tracker,
//! including argument parsing and the command handlers that drive the
//! record store.

pub mod args;
pub mod commands;

pub use args::{
    ApplicationsAction, ApplicationsArgs, Cli, Commands, ConfigAction, ConfigArgs, GlobalArgs,
    JobOrder, JobsAction, JobsArgs, LookupMethod, StudentOrder, StudentsAction, StudentsArgs,
};
pub use commands::{
    handle_applications, handle_check, handle_config, handle_jobs, handle_stats, handle_students,
    Workspace,
};
