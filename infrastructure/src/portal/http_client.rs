//! reqwest-backed portal transport
//!
//! Sends every [`PortalRequest`] with an explicit `Cookie` header built from
//! the session's jar and reports the cookies the portal sets. Redirects are
//! followed by hand so that cookies set on intermediate `302` responses (the
//! login endpoints rely on this) are not lost.

use crate::config::{ConfigError, FilePortalConfig};
use async_trait::async_trait;
use enroll_application::{PortalClient, PortalRequest, PortalResponse, TransportError};
use enroll_domain::{CookieJar, Method, PortalEndpoint, PortalHost};
use reqwest::header::{COOKIE, LOCATION};
use reqwest::{Client, Url, redirect};
use tracing::{debug, trace};

/// Maximum redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// HTTP adapter for the [`PortalClient`] port
pub struct ReqwestPortalClient {
    client: Client,
    portal_base: Url,
    course_base: Url,
}

impl ReqwestPortalClient {
    pub fn new(config: &FilePortalConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            portal_base: parse_base_url(&config.portal_base_url)?,
            course_base: parse_base_url(&config.course_base_url)?,
        })
    }

    fn base(&self, host: PortalHost) -> &Url {
        match host {
            PortalHost::Portal => &self.portal_base,
            PortalHost::Course => &self.course_base,
        }
    }

    async fn execute(&self, request: PortalRequest) -> Result<PortalResponse, TransportError> {
        let endpoint = request.endpoint;
        let mut url = endpoint_url(self.base(endpoint.host()), endpoint, &request.query);
        let mut jar = request.cookies;
        let mut set_cookies = Vec::new();

        debug!("{} {}", endpoint, url);
        let first = match endpoint.method() {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()).form(&request.form),
        };
        let mut response = with_cookie_header(first, &jar)
            .send()
            .await
            .map_err(|e| map_send_error(endpoint, e))?;

        let mut redirects = 0;
        loop {
            for cookie in response.cookies() {
                trace!("{} set cookie {}", endpoint, cookie.name());
                jar.insert(cookie.name().to_string(), cookie.value().to_string());
                set_cookies.push((cookie.name().to_string(), cookie.value().to_string()));
            }

            let status = response.status();
            if !status.is_redirection() || redirects == MAX_REDIRECTS {
                break;
            }
            let Some(next) = redirect_target(&url, response.headers().get(LOCATION)) else {
                break;
            };

            redirects += 1;
            debug!("{} redirected ({}) to {}", endpoint, status.as_u16(), next);
            url = next;
            // Redirects are always re-issued as GET, like browsers do after a form POST
            response = with_cookie_header(self.client.get(url.clone()), &jar)
                .send()
                .await
                .map_err(|e| map_send_error(endpoint, e))?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout { endpoint }
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        Ok(PortalResponse {
            body,
            cookies: set_cookies,
        })
    }
}

#[async_trait]
impl PortalClient for ReqwestPortalClient {
    async fn send(&self, request: PortalRequest) -> Result<PortalResponse, TransportError> {
        self.execute(request).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "not a base URL".to_string(),
        });
    }
    Ok(url)
}

/// Join the endpoint path onto the host base and append query parameters
fn endpoint_url(base: &Url, endpoint: PortalEndpoint, query: &[(String, String)]) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{}{}", prefix, endpoint.path()));
    url.set_query(None);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

/// `name=value; name=value` for the `Cookie` header
fn cookie_header(jar: &CookieJar) -> String {
    jar.iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn with_cookie_header(builder: reqwest::RequestBuilder, jar: &CookieJar) -> reqwest::RequestBuilder {
    if jar.is_empty() {
        builder
    } else {
        builder.header(COOKIE, cookie_header(jar))
    }
}

fn redirect_target(current: &Url, location: Option<&reqwest::header::HeaderValue>) -> Option<Url> {
    let location = location?.to_str().ok()?;
    current.join(location).ok()
}

fn map_send_error(endpoint: PortalEndpoint, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout { endpoint }
    } else {
        TransportError::Connection(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn jar(pairs: &[(&str, &str)]) -> CookieJar {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cookie_header() {
        assert_eq!(cookie_header(&CookieJar::new()), "");
        assert_eq!(
            cookie_header(&jar(&[("sepuser", "abc"), ("JSESSIONID", "42")])),
            "JSESSIONID=42; sepuser=abc"
        );
    }

    #[test]
    fn test_endpoint_url_with_query() {
        let base = parse_base_url("http://jwxk.ucas.ac.cn").unwrap();
        let url = endpoint_url(
            &base,
            PortalEndpoint::CourseLogin,
            &[("Identity".to_string(), "ab-12".to_string())],
        );
        assert_eq!(url.as_str(), "http://jwxk.ucas.ac.cn/login?Identity=ab-12");
    }

    #[test]
    fn test_endpoint_url_keeps_base_prefix() {
        let base = parse_base_url("http://localhost:8080/mirror/").unwrap();
        let url = endpoint_url(&base, PortalEndpoint::IdentityPage, &[]);
        assert_eq!(url.as_str(), "http://localhost:8080/mirror/portal/site/226/821");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(matches!(
            parse_base_url("sep.ucas.ac.cn"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("mailto:someone@example.edu"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_redirect_target_resolves_relative_location() {
        let current = Url::parse("http://sep.ucas.ac.cn/slogin").unwrap();
        let location = reqwest::header::HeaderValue::from_static("/appStore");
        assert_eq!(
            redirect_target(&current, Some(&location)).unwrap().as_str(),
            "http://sep.ucas.ac.cn/appStore"
        );
        assert!(redirect_target(&current, None).is_none());
    }

    /// One canned HTTP/1.1 exchange per accepted connection; records raw requests
    async fn serve(responses: Vec<String>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&seen);

        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut raw = Vec::new();
                let mut buffer = [0u8; 4096];
                loop {
                    let n = stream.read(&mut buffer).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buffer[..n]);
                    if request_complete(&raw) {
                        break;
                    }
                }
                recorded
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&raw).into_owned());
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        (format!("http://{}", address), seen)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..head_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= head_end + 4 + content_length
    }

    fn http_response(status: &str, headers: &[&str], body: &str) -> String {
        let mut response = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
        for header in headers {
            response.push_str(header);
            response.push_str("\r\n");
        }
        response.push_str(&format!(
            "Content-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ));
        response
    }

    fn client_for(base: &str) -> ReqwestPortalClient {
        let config = FilePortalConfig {
            portal_base_url: base.to_string(),
            course_base_url: base.to_string(),
            timeout_seconds: 5,
            ..FilePortalConfig::default()
        };
        ReqwestPortalClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_post_sends_form_and_cookies() {
        let (base, seen) = serve(vec![http_response(
            "200 OK",
            &["Set-Cookie: lastSave=123456; Path=/"],
            "超过限选人数",
        )])
        .await;
        let client = client_for(&base);

        let request = PortalRequest::new(PortalEndpoint::SaveCourse)
            .with_form("sids", "123456")
            .with_form("s", "mgmt-1")
            .with_cookies(&jar(&[("JSESSIONID", "course-1")]));
        let response = client.send(request).await.unwrap();

        assert_eq!(response.body, "超过限选人数");
        assert_eq!(
            response.cookies,
            vec![("lastSave".to_string(), "123456".to_string())]
        );

        let raw = seen.lock().unwrap()[0].clone();
        assert!(raw.starts_with("POST /courseManage/saveCourse HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("cookie: jsessionid=course-1"));
        assert!(raw.ends_with("sids=123456&s=mgmt-1"));
    }

    #[tokio::test]
    async fn test_cookies_survive_redirects() {
        let (base, seen) = serve(vec![
            http_response(
                "302 Found",
                &["Set-Cookie: JSESSIONID=sep-1; Path=/", "Location: /appStore"],
                "",
            ),
            http_response("200 OK", &["Set-Cookie: sepuser=alice"], "<html>ok</html>"),
        ])
        .await;
        let client = client_for(&base);

        let request = PortalRequest::new(PortalEndpoint::PrimaryLogin)
            .with_form("userName", "alice")
            .with_form("pwd", "secret")
            .with_form("sb", "sb");
        let response = client.send(request).await.unwrap();

        assert_eq!(response.body, "<html>ok</html>");
        assert_eq!(
            response.cookies,
            vec![
                ("JSESSIONID".to_string(), "sep-1".to_string()),
                ("sepuser".to_string(), "alice".to_string()),
            ]
        );

        // The follow-up GET carries the cookie set by the redirect
        let requests = seen.lock().unwrap().clone();
        assert!(requests[1].starts_with("GET /appStore HTTP/1.1"));
        assert!(requests[1].to_ascii_lowercase().contains("cookie: jsessionid=sep-1"));
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let (base, _) = serve(vec![http_response("503 Service Unavailable", &[], "")]).await;
        let client = client_for(&base);

        let err = client
            .send(PortalRequest::new(PortalEndpoint::CourseMain))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                endpoint: PortalEndpoint::CourseMain,
                status: 503,
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let client = client_for(&format!("http://{}", address));
        let err = client
            .send(PortalRequest::new(PortalEndpoint::IdentityPage))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)));
    }
}
