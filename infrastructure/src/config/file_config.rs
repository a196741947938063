//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML settings file.
//! They are deserialized directly and converted into application types by
//! the binary.

use enroll_application::{ScheduleConfig, TerminalPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("interval_ms cannot be 0")]
    InvalidInterval,

    #[error("{0} cannot be empty")]
    EmptyBaseUrl(&'static str),
}

/// Raw portal configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePortalConfig {
    /// Central login host
    pub portal_base_url: String,
    /// Course registration host
    pub course_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FilePortalConfig {
    fn default() -> Self {
        Self {
            portal_base_url: "http://sep.ucas.ac.cn".to_string(),
            course_base_url: "http://jwxk.ucas.ac.cn".to_string(),
            timeout_seconds: 30,
            user_agent: concat!("course-enroll/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FilePortalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Raw retry schedule configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScheduleConfig {
    /// Delay between two attempts of the same course
    pub interval_ms: u64,
    /// "halt" or "keep_retrying"
    pub terminal_policy: TerminalPolicy,
}

impl Default for FileScheduleConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            terminal_policy: TerminalPolicy::Halt,
        }
    }
}

/// Raw input file locations from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFilesConfig {
    /// Properties file holding `userName` and `pwd`
    pub credentials: PathBuf,
    /// One course code per line
    pub course_list: PathBuf,
}

impl Default for FileFilesConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("info.properties"),
            course_list: PathBuf::from("courseList.txt"),
        }
    }
}

/// Complete settings file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub portal: FilePortalConfig,
    pub schedule: FileScheduleConfig,
    pub files: FileFilesConfig,
}

impl FileConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.portal.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.schedule.interval_ms == 0 {
            return Err(ConfigValidationError::InvalidInterval);
        }

        if self.portal.portal_base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl("portal_base_url"));
        }
        if self.portal.course_base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl("course_base_url"));
        }

        Ok(())
    }

    /// Retry loop parameters for the scheduler
    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig::default()
            .with_interval(Duration::from_millis(self.schedule.interval_ms))
            .with_terminal_policy(self.schedule.terminal_policy)
    }
}
