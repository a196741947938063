//! Scripted portal used by the use case tests.
//!
//! Answers every handshake endpoint with a valid page whose tokens carry the
//! handshake number (`id-1`, `mgmt-1`, ...), and registration requests from a
//! queue of scripted replies. Tracks how many requests overlap in time.

use crate::ports::portal_client::{PortalClient, PortalRequest, PortalResponse, TransportError};
use async_trait::async_trait;
use enroll_domain::PortalEndpoint;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted reply to a registration request
pub(crate) enum SaveReply {
    Body(String),
    Fail,
}

#[derive(Default)]
struct FakeState {
    requests: Vec<PortalRequest>,
    logins: u64,
    save_replies: VecDeque<SaveReply>,
    /// Per-code replies take precedence over the shared queue
    save_replies_by_code: HashMap<String, VecDeque<SaveReply>>,
    overrides: HashMap<PortalEndpoint, String>,
    failing: Vec<PortalEndpoint>,
}

pub(crate) struct FakePortal {
    state: Mutex<FakeState>,
    default_save_body: String,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakePortal {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            default_save_body: "超过限选人数".to_string(),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_default_save_body(mut self, body: &str) -> Self {
        self.default_save_body = body.to_string();
        self
    }

    pub(crate) fn with_save_replies(self, replies: Vec<SaveReply>) -> Self {
        self.state.lock().unwrap().save_replies.extend(replies);
        self
    }

    pub(crate) fn with_save_replies_for(self, code: &str, replies: Vec<SaveReply>) -> Self {
        self.state
            .lock()
            .unwrap()
            .save_replies_by_code
            .entry(code.to_string())
            .or_default()
            .extend(replies);
        self
    }

    /// Serve a fixed body for a handshake endpoint
    pub(crate) fn with_page(self, endpoint: PortalEndpoint, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .overrides
            .insert(endpoint, body.to_string());
        self
    }

    pub(crate) fn failing_at(self, endpoint: PortalEndpoint) -> Self {
        self.state.lock().unwrap().failing.push(endpoint);
        self
    }

    /// Hold every request open for `delay` so overlaps become observable
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn heal(&self, endpoint: PortalEndpoint) {
        self.state.lock().unwrap().failing.retain(|e| *e != endpoint);
    }

    pub(crate) fn clear_page(&self, endpoint: PortalEndpoint) {
        self.state.lock().unwrap().overrides.remove(&endpoint);
    }

    pub(crate) fn requests(&self) -> Vec<PortalRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn count(&self, endpoint: PortalEndpoint) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, request: &PortalRequest) -> Result<PortalResponse, TransportError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.requests.push(request.clone());

        if state.failing.contains(&request.endpoint) {
            return Err(TransportError::Connection("connection reset".to_string()));
        }

        if request.endpoint == PortalEndpoint::PrimaryLogin {
            state.logins += 1;
        }
        let n = state.logins;

        if let Some(body) = state.overrides.get(&request.endpoint) {
            return Ok(PortalResponse::new(body.clone()));
        }

        let response = match request.endpoint {
            PortalEndpoint::PrimaryLogin => {
                PortalResponse::new("").with_cookie("JSESSIONID", format!("sep-{}", n))
            }
            PortalEndpoint::IdentityPage => PortalResponse::new(format!(
                r#"<a href="http://jwxk.ucas.ac.cn/login?Identity=id-{}">选课</a>"#,
                n
            ))
            .with_cookie("sepuser", "student"),
            PortalEndpoint::CourseLogin => PortalResponse::new("欢迎，学生角色")
                .with_cookie("JSESSIONID", format!("course-{}", n)),
            PortalEndpoint::CourseMain => PortalResponse::new(format!(
                r#"<a href="/courseManage/selectCourse?s=mgmt-{}">选择课程</a>"#,
                n
            )),
            PortalEndpoint::SaveCourse => {
                let code = request.form_value("sids").unwrap_or_default().to_string();
                let reply = match state.save_replies_by_code.get_mut(&code) {
                    Some(queue) if !queue.is_empty() => queue.pop_front(),
                    _ => state.save_replies.pop_front(),
                };
                let response = match reply {
                    Some(SaveReply::Body(body)) => PortalResponse::new(body),
                    Some(SaveReply::Fail) => {
                        return Err(TransportError::Connection("connection reset".to_string()));
                    }
                    None => PortalResponse::new(self.default_save_body.clone()),
                };
                response.with_cookie("lastSave", code)
            }
        };
        Ok(response)
    }
}

#[async_trait]
impl PortalClient for FakePortal {
    async fn send(&self, request: PortalRequest) -> Result<PortalResponse, TransportError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = self.respond(&request);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
