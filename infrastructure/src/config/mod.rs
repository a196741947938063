//! Settings and input file loading for course-enroll
//!
//! Settings are merged from several sources. The priority order (highest to
//! lowest):
//!
//! 1. `ENROLL_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./enroll.toml` or `./.enroll.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/course-enroll/config.toml`
//! 5. Default values
//!
//! Credentials and the course list live in their own plain-text files, read
//! by [`CredentialsLoader`] and [`CourseListLoader`].

mod course_list;
mod credentials;
mod error;
mod file_config;
mod loader;

pub use course_list::CourseListLoader;
pub use credentials::{CredentialsLoader, parse_properties};
pub use error::ConfigError;
pub use file_config::{
    ConfigValidationError, FileConfig, FileFilesConfig, FilePortalConfig, FileScheduleConfig,
};
pub use loader::ConfigLoader;
