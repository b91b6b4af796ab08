//! Internship Tracker CLI application
//!
//! Command-line interface for querying and updating the student, job and
//! application record files.

use std::process;

use tracing::{info, Level};
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::{fmt, EnvFilter};

use internship_tracker::cli::{
    handle_applications, handle_check, handle_config, handle_jobs, handle_stats, handle_students,
    Cli, Commands,
};
use internship_tracker::config::AppConfig;
use internship_tracker::errors::Result;

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if !e.is_recoverable() {
            eprintln!("This error is not recoverable ({})", e.category());
        }
        process::exit(1);
    }
}

/// Main application logic
fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // The config file may set the log level, so read it before logging starts
    let config = AppConfig::load(cli.global.config.as_deref());
    let configured_level = config.as_ref().ok().map(|c| c.logging.level.clone());
    init_logging(&cli, configured_level.as_deref());

    let config = config?.with_data_dir(cli.global.data_dir.clone());

    info!("Internship Tracker v{} starting", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {}", config.files.data_dir.display());

    match cli.command {
        Commands::Students(args) => {
            info!("Executing students command");
            handle_students(args, &config)
        }
        Commands::Jobs(args) => {
            info!("Executing jobs command");
            handle_jobs(args, &config)
        }
        Commands::Applications(args) => {
            info!("Executing applications command");
            handle_applications(args, &config)
        }
        Commands::Check => {
            info!("Executing check command");
            handle_check(&config)
        }
        Commands::Stats { json } => handle_stats(&config, json),
        Commands::Config(args) => handle_config(args, &config),
    }
}

/// Initialize logging from CLI verbosity flags, falling back to the configured level
fn init_logging(cli: &Cli, configured_level: Option<&str>) {
    let directive = cli
        .explicit_log_level()
        .map(|level| crate_directive(&level.to_string()))
        .or_else(|| configured_level.map(crate_directive))
        .and_then(|parsed| parsed.ok())
        .or_else(|| crate_directive(&Level::WARN.to_string()).ok());

    let mut filter = EnvFilter::from_default_env();
    if let Some(directive) = directive {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

fn crate_directive(level: &str) -> std::result::Result<Directive, ParseError> {
    format!("internship_tracker={}", level.to_lowercase()).parse()
}
