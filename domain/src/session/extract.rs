//! Token extraction from handshake pages
//!
//! The portal never returns tokens as structured data; they are embedded in
//! links on the pages visited during the handshake.

use regex::Regex;
use std::sync::LazyLock;

/// Marker present on the course-system landing page for student accounts
pub const STUDENT_ROLE_MARKER: &str = "学生角色";

static IDENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/login\?Identity=([0-9A-Za-z\-]+)").expect("identity pattern is valid")
});

static MANAGEMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/courseManage/selectCourse\?s=([0-9A-Za-z\-]+)")
        .expect("management pattern is valid")
});

/// Find the identity token in the portal page linking to the course system
pub fn extract_identity_token(body: &str) -> Option<&str> {
    first_capture(&IDENTITY_PATTERN, body)
}

/// Find the management token in the course-system landing page
pub fn extract_management_token(body: &str) -> Option<&str> {
    first_capture(&MANAGEMENT_PATTERN, body)
}

/// Whether the course-system login page granted the student role
pub fn has_student_role(body: &str) -> bool {
    body.contains(STUDENT_ROLE_MARKER)
}

fn first_capture<'a>(pattern: &Regex, body: &'a str) -> Option<&'a str> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
