//! Configuration management for the internship tracker
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, and command line overrides. Every section may be omitted from the
//! file; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::catalog::IndexPolicy;
use crate::constants::{files, index, store};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Store capacities
    pub store: StoreConfig,
    /// Identifier index sizing
    pub index: IndexConfig,
    /// Record file locations and layout
    pub files: FilesConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Maximum number of records per collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_students: usize,
    pub max_jobs: usize,
    pub max_applications: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_students: store::MAX_STUDENTS,
            max_jobs: store::MAX_JOBS,
            max_applications: store::MAX_APPLICATIONS,
        }
    }
}

/// Identifier index sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Bucket count of a fresh index
    pub initial_size: usize,
    /// Load factor above which the index is rebuilt larger
    pub max_load_factor: f64,
    /// Grow automatically instead of reporting a full table
    pub auto_grow: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            initial_size: index::DEFAULT_TABLE_SIZE,
            max_load_factor: index::MAX_LOAD_FACTOR,
            auto_grow: true,
        }
    }
}

impl IndexConfig {
    /// Runtime index policy
    pub fn policy(&self) -> IndexPolicy {
        IndexPolicy {
            initial_size: self.initial_size,
            max_load_factor: self.max_load_factor,
            auto_grow: self.auto_grow,
        }
    }
}

/// Record file locations and header layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory holding the record files
    pub data_dir: PathBuf,
    pub students: String,
    pub jobs: String,
    pub applications: String,
    /// Header lines at the top of each file, skipped on load and written on save
    pub student_header_lines: usize,
    pub job_header_lines: usize,
    pub application_header_lines: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            students: files::STUDENTS.to_string(),
            jobs: files::JOBS.to_string(),
            applications: files::APPLICATIONS.to_string(),
            student_header_lines: 0,
            job_header_lines: 0,
            application_header_lines: 0,
        }
    }
}

impl FilesConfig {
    pub fn students_path(&self) -> PathBuf {
        self.data_dir.join(&self.students)
    }

    pub fn jobs_path(&self) -> PathBuf {
        self.data_dir.join(&self.jobs)
    }

    pub fn applications_path(&self) -> PathBuf {
        self.data_dir.join(&self.applications)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file: the explicit override, else the first one found in
    ///    the standard locations
    ///
    /// Command line overrides are applied by the caller afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicit file does not exist,
    /// or a parse/validation error for a bad file.
    pub fn load(config_file_override: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_CONFIG)];
        if let Ok(path) = Self::get_default_config_path() {
            search_paths.push(path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }
        None
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Override the data directory
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.files.data_dir = dir;
        }
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> ConfigResult<()> {
        let capacities = [
            ("store.max_students", self.store.max_students),
            ("store.max_jobs", self.store.max_jobs),
            ("store.max_applications", self.store.max_applications),
            ("index.initial_size", self.index.initial_size),
        ];
        for (field, value) in capacities {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }
        }

        let load = self.index.max_load_factor;
        if !(load > 0.0 && load <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "index.max_load_factor".to_string(),
                value: load.to_string(),
                reason: "Must be in the range (0, 1]".to_string(),
            });
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write a commented default configuration file
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> ConfigResult<()> {
        if path.exists() && !force {
            return Err(ConfigError::InvalidValue {
                field: "path".to_string(),
                value: path.display().to_string(),
                reason: "File already exists; pass --force to overwrite".to_string(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::generate_default_config_content())?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Internship Tracker Configuration
# Every setting is optional; removed keys fall back to these defaults.

[store]
# Maximum number of records per collection
max_students = {}
max_jobs = {}
max_applications = {}

[index]
# Buckets in a fresh identifier index
initial_size = {}
# Rebuild the index larger once this fraction of buckets is occupied
max_load_factor = {:.1}
# When false, a full index is reported as an error
auto_grow = true

[files]
# Directory holding the record files
data_dir = "."
students = "{}"
jobs = "{}"
applications = "{}"
# Header lines at the top of each file (older student files use 2)
student_header_lines = 0
job_header_lines = 0
application_header_lines = 0

[logging]
level = "warn"  # error, warn, info, debug, trace
"#,
            store::MAX_STUDENTS,
            store::MAX_JOBS,
            store::MAX_APPLICATIONS,
            index::DEFAULT_TABLE_SIZE,
            index::MAX_LOAD_FACTOR,
            files::STUDENTS,
            files::JOBS,
            files::APPLICATIONS,
        )
    }
}
