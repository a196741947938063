//! Portal endpoints visited during the handshake and registration

/// Which of the two portal hosts serves an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalHost {
    /// Central single-sign-on portal
    Portal,
    /// Course registration system
    Course,
}

/// HTTP method used for an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    /// Form-encoded POST
    Post,
}

/// Every endpoint the enrollment flow talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalEndpoint {
    /// Step 1: central login with username and password
    PrimaryLogin,
    /// Step 2: portal page linking to the course system
    IdentityPage,
    /// Step 3: course-system login with the identity token
    CourseLogin,
    /// Step 4: course-system landing page carrying the management token
    CourseMain,
    /// Registration submission
    SaveCourse,
}

impl PortalEndpoint {
    pub fn host(&self) -> PortalHost {
        match self {
            PortalEndpoint::PrimaryLogin | PortalEndpoint::IdentityPage => PortalHost::Portal,
            PortalEndpoint::CourseLogin
            | PortalEndpoint::CourseMain
            | PortalEndpoint::SaveCourse => PortalHost::Course,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            PortalEndpoint::PrimaryLogin => "/slogin",
            PortalEndpoint::IdentityPage => "/portal/site/226/821",
            PortalEndpoint::CourseLogin => "/login",
            PortalEndpoint::CourseMain => "/courseManage/main",
            PortalEndpoint::SaveCourse => "/courseManage/saveCourse",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            PortalEndpoint::PrimaryLogin | PortalEndpoint::SaveCourse => Method::Post,
            PortalEndpoint::IdentityPage
            | PortalEndpoint::CourseLogin
            | PortalEndpoint::CourseMain => Method::Get,
        }
    }

    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PortalEndpoint::PrimaryLogin => "primary_login",
            PortalEndpoint::IdentityPage => "identity_page",
            PortalEndpoint::CourseLogin => "course_login",
            PortalEndpoint::CourseMain => "course_main",
            PortalEndpoint::SaveCourse => "save_course",
        }
    }
}

impl std::fmt::Display for PortalEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_hosts() {
        assert_eq!(PortalEndpoint::PrimaryLogin.host(), PortalHost::Portal);
        assert_eq!(PortalEndpoint::IdentityPage.host(), PortalHost::Portal);
        assert_eq!(PortalEndpoint::CourseLogin.host(), PortalHost::Course);
        assert_eq!(PortalEndpoint::SaveCourse.host(), PortalHost::Course);
    }

    #[test]
    fn test_only_login_and_save_are_posts() {
        assert_eq!(PortalEndpoint::PrimaryLogin.method(), Method::Post);
        assert_eq!(PortalEndpoint::SaveCourse.method(), Method::Post);
        assert_eq!(PortalEndpoint::IdentityPage.method(), Method::Get);
        assert_eq!(PortalEndpoint::CourseLogin.method(), Method::Get);
        assert_eq!(PortalEndpoint::CourseMain.method(), Method::Get);
    }
}
