//! Course code value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of digits in a course code
pub const COURSE_CODE_LEN: usize = 6;

/// A validated course code (Value Object)
///
/// The portal identifies every course section by a fixed-width numeric
/// string. Anything else is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseCode(String);

impl CourseCode {
    /// Validate and wrap a course code.
    ///
    /// Surrounding whitespace is not trimmed; callers reading lines from a
    /// file are expected to trim first.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() == COURSE_CODE_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::InvalidCourseCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CourseCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CourseCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CourseCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Filter raw course-list lines down to valid, unique course codes.
///
/// Lines are trimmed; anything that is not exactly six ASCII digits is
/// dropped silently. First occurrence wins when a code is repeated.
pub fn parse_course_list<'a, I>(lines: I) -> Vec<CourseCode>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut codes: Vec<CourseCode> = Vec::new();
    for line in lines {
        if let Ok(code) = CourseCode::parse(line.trim())
            && !codes.contains(&code)
        {
            codes.push(code);
        }
    }
    codes
}
