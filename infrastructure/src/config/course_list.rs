//! Course list loading

use super::error::ConfigError;
use enroll_domain::{CourseCode, parse_course_list};
use std::path::Path;
use tracing::{debug, warn};

/// Builds the validated list of course codes to register
pub struct CourseListLoader;

impl CourseListLoader {
    /// Read one code per line from `path`.
    ///
    /// Lines that are not exactly six digits are dropped silently.
    pub fn from_file(path: &Path) -> Result<Vec<CourseCode>, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let codes = parse_course_list(text.lines());
        debug!("{} course code(s) read from {}", codes.len(), path.display());

        if codes.is_empty() {
            return Err(ConfigError::NoCourses(path.display().to_string()));
        }
        Ok(codes)
    }

    /// Validate codes given on the command line
    pub fn from_arguments(arguments: &[String]) -> Result<Vec<CourseCode>, ConfigError> {
        for argument in arguments {
            if CourseCode::parse(argument.trim()).is_err() {
                warn!("Ignoring invalid course code {:?}", argument);
            }
        }

        let codes = parse_course_list(arguments.iter().map(String::as_str));
        if codes.is_empty() {
            return Err(ConfigError::NoCourses("the command line".to_string()));
        }
        Ok(codes)
    }
}
