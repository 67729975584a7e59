//! Redmine REST client
//!
//! One method per tracker operation, each issuing exactly one HTTP request.
//! Requests carry the `X-Redmine-API-Key` header and honor the configured
//! timeout. Non-2xx answers become [`RedmineError::Api`] with the status and
//! body text; nothing is retried.

use std::sync::Arc;

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::error::{ensure_positive, RedmineError, RedmineResult};
use crate::config::RedmineConfig;
use crate::types::{
    Issue, IssueList, IssueQuery, IssueStatus, IssueUpdate, NewIssue, Page, Pagination, Priority,
    Project, Tracker, UploadToken, UploadedFile, User,
};

const API_KEY_HEADER: &str = "x-redmine-api-key";

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `Content-Type` mentioned JSON
    Json(Value),
    /// Any other non-empty body
    Text(String),
    /// No body, e.g. the 204 Redmine sends after an update
    Empty,
}

enum Body {
    None,
    Json(Value),
    Bytes(Vec<u8>),
}

/// Client for one Redmine instance
#[derive(Debug, Clone)]
pub struct RedmineClient {
    http: Client,
    config: Arc<RedmineConfig>,
}

impl RedmineClient {
    /// Build a client; fails if the configuration is invalid
    pub fn new(config: RedmineConfig) -> RedmineResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| RedmineError::Config("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if !config.verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .user_agent(concat!("redmine-mcp/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(RedmineError::Transport)?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &RedmineConfig {
        &self.config
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// `GET /issues/{id}.json`
    pub async fn get_issue(&self, id: u64, include: Option<&str>) -> RedmineResult<Issue> {
        let id = ensure_positive("issue_id", id)?;
        let query: Vec<(String, String)> = include
            .filter(|s| !s.is_empty())
            .map(|s| vec![("include".to_string(), s.to_string())])
            .unwrap_or_default();

        let payload = self
            .send(Method::GET, &format!("issues/{}", id), &query, Body::None)
            .await?;
        take_field(payload, "issue")
    }

    /// `POST /issues.json`
    pub async fn create_issue(&self, issue: &NewIssue) -> RedmineResult<Issue> {
        ensure_positive("project_id", issue.project_id)?;

        let body = serde_json::json!({ "issue": issue });
        let payload = self
            .send(Method::POST, "issues", &[], Body::Json(body))
            .await?;
        take_field(payload, "issue")
    }

    /// `PUT /issues/{id}.json`
    pub async fn update_issue(&self, id: u64, update: &IssueUpdate) -> RedmineResult<()> {
        let id = ensure_positive("issue_id", id)?;
        if update.is_empty() {
            return Err(RedmineError::validation("no fields to update"));
        }

        let body = serde_json::json!({ "issue": update });
        self.send(Method::PUT, &format!("issues/{}", id), &[], Body::Json(body))
            .await?;
        Ok(())
    }

    /// `GET /issues.json` with only the defined filters
    pub async fn search_issues(&self, query: &IssueQuery) -> RedmineResult<IssueList> {
        let payload = self
            .send(Method::GET, "issues", &query.to_query_pairs(), Body::None)
            .await?;
        decode(payload)
    }

    /// Add a journal note
    pub async fn add_note(&self, id: u64, notes: &str, private: bool) -> RedmineResult<()> {
        let update = IssueUpdate {
            notes: Some(notes.to_string()),
            private_notes: private.then_some(true),
            ..Default::default()
        };
        self.update_issue(id, &update).await
    }

    /// Move an issue to another status, optionally with a note
    pub async fn transition_status(
        &self,
        id: u64,
        status_id: u64,
        notes: Option<String>,
    ) -> RedmineResult<()> {
        let status_id = ensure_positive("status_id", status_id)?;
        let update = IssueUpdate {
            status_id: Some(status_id),
            notes,
            ..Default::default()
        };
        self.update_issue(id, &update).await
    }

    /// Attach a previously uploaded file to an issue
    pub async fn add_attachment(&self, id: u64, file: UploadedFile) -> RedmineResult<()> {
        if file.token.is_empty() {
            return Err(RedmineError::validation("upload token is empty"));
        }
        let update = IssueUpdate {
            uploads: Some(vec![file]),
            ..Default::default()
        };
        self.update_issue(id, &update).await
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// `POST /uploads.json` with the raw bytes; returns the token to attach
    pub async fn upload(&self, bytes: Vec<u8>, filename: Option<&str>) -> RedmineResult<UploadToken> {
        let query: Vec<(String, String)> = filename
            .map(|f| vec![("filename".to_string(), f.to_string())])
            .unwrap_or_default();

        let payload = self
            .send(Method::POST, "uploads", &query, Body::Bytes(bytes))
            .await?;
        take_field(payload, "upload")
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    pub async fn list_projects(&self, page: &Pagination) -> RedmineResult<Page<Project>> {
        let payload = self
            .send(Method::GET, "projects", &page.to_query_pairs(), Body::None)
            .await?;
        take_page(payload, "projects")
    }

    pub async fn list_trackers(&self) -> RedmineResult<Vec<Tracker>> {
        let payload = self.send(Method::GET, "trackers", &[], Body::None).await?;
        take_field(payload, "trackers")
    }

    pub async fn list_statuses(&self) -> RedmineResult<Vec<IssueStatus>> {
        let payload = self
            .send(Method::GET, "issue_statuses", &[], Body::None)
            .await?;
        take_field(payload, "issue_statuses")
    }

    /// `GET /users.json`; Redmine only allows this for administrators
    pub async fn list_users(&self, page: &Pagination) -> RedmineResult<Page<User>> {
        let payload = self
            .send(Method::GET, "users", &page.to_query_pairs(), Body::None)
            .await?;
        let mut users: Page<User> = take_page(payload, "users")?;
        users.items = users.items.into_iter().map(User::with_display_name).collect();
        Ok(users)
    }

    pub async fn list_priorities(&self) -> RedmineResult<Vec<Priority>> {
        let payload = self
            .send(Method::GET, "enumerations/issue_priorities", &[], Body::None)
            .await?;
        take_field(payload, "issue_priorities")
    }

    /// The account the API key belongs to
    pub async fn current_user(&self) -> RedmineResult<User> {
        let payload = self
            .send(Method::GET, "users/current", &[], Body::None)
            .await?;
        let user: User = take_field(payload, "user")?;
        Ok(user.with_display_name())
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// `{base}/{path}.json?{query}`
    fn endpoint(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = format!("{}/{}.json", self.config.base_url(), path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&encode_query(query));
        }
        url
    }

    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Body,
    ) -> RedmineResult<Payload> {
        let url = self.endpoint(path, query);
        debug!("{} {}", method, url);

        let request = self.http.request(method, &url);
        let request = match body {
            Body::None => request,
            Body::Json(value) => request.json(&value),
            Body::Bytes(bytes) => request
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .body(bytes),
        };

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, path))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(e, path))?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %text, "Redmine request failed");
            return Err(RedmineError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            Ok(Payload::Empty)
        } else if content_type.contains("json") {
            Ok(Payload::Json(serde_json::from_str(&text)?))
        } else {
            Ok(Payload::Text(text))
        }
    }
}

fn transport_error(e: reqwest::Error, path: &str) -> RedmineError {
    if e.is_timeout() {
        error!(path, "Redmine request timed out");
        RedmineError::Timeout(format!("/{}.json", path))
    } else {
        error!(path, error = %e, "Redmine request failed to complete");
        RedmineError::Transport(e)
    }
}

/// URL-encode each name and value
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn expect_json(payload: Payload) -> RedmineResult<Value> {
    match payload {
        Payload::Json(value) => Ok(value),
        Payload::Text(text) => Err(RedmineError::Decode(format!(
            "expected JSON, got text: {}",
            text.chars().take(200).collect::<String>()
        ))),
        Payload::Empty => Err(RedmineError::Decode(
            "expected JSON, got an empty body".to_string(),
        )),
    }
}

fn decode<T: DeserializeOwned>(payload: Payload) -> RedmineResult<T> {
    Ok(serde_json::from_value(expect_json(payload)?)?)
}

/// Decode the value under `key` of a JSON object body
fn take_field<T: DeserializeOwned>(payload: Payload, key: &str) -> RedmineResult<T> {
    let mut value = expect_json(payload)?;
    let field = value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| RedmineError::Decode(format!("missing '{}' in response", key)))?;
    Ok(serde_json::from_value(field)?)
}

/// Decode a paginated collection stored under `key`
fn take_page<T: DeserializeOwned>(payload: Payload, key: &str) -> RedmineResult<Page<T>> {
    let value = expect_json(payload)?;
    let count = |name: &str| value.get(name).and_then(Value::as_u64);
    let (total_count, offset, limit) = (count("total_count"), count("offset"), count("limit"));
    let items = take_field(Payload::Json(value), key)?;
    Ok(Page {
        items,
        total_count,
        offset,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RedmineClient {
        RedmineClient::new(RedmineConfig::new(server.uri(), "secret-key")).unwrap()
    }

    fn issue_json(id: u64, subject: &str) -> Value {
        json!({
            "id": id,
            "project": { "id": 1, "name": "Ops" },
            "tracker": { "id": 1, "name": "Bug" },
            "status": { "id": 1, "name": "New" },
            "priority": { "id": 2, "name": "Normal" },
            "author": { "id": 5, "name": "Jane Doe" },
            "subject": subject,
            "done_ratio": 0,
            "created_on": "2024-05-01T08:00:00Z",
            "updated_on": "2024-05-01T08:00:00Z"
        })
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = RedmineClient::new(RedmineConfig::new("https://r.example.com", ""));
        assert!(matches!(result, Err(RedmineError::Config(_))));
    }

    #[test]
    fn test_encode_query_escapes_values() {
        let pairs = vec![
            ("subject".to_string(), "~disk full".to_string()),
            ("sort".to_string(), "updated_on:desc".to_string()),
        ];
        assert_eq!(
            encode_query(&pairs),
            "subject=~disk%20full&sort=updated_on%3Adesc"
        );
    }

    #[tokio::test]
    async fn test_get_issue_sends_api_key() {
        // Given: a Redmine that only answers authenticated requests
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/12.json"))
            .and(header("X-Redmine-API-Key", "secret-key"))
            .and(query_param("include", "attachments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issue": issue_json(12, "Disk full")
            })))
            .expect(1)
            .mount(&server)
            .await;

        // When
        let issue = client_for(&server)
            .get_issue(12, Some("attachments"))
            .await
            .unwrap();

        // Then
        assert_eq!(issue.id, 12);
        assert_eq!(issue.subject, "Disk full");
    }

    #[tokio::test]
    async fn test_get_issue_zero_id_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server).get_issue(0, None).await;
        assert!(matches!(result, Err(RedmineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_non_success_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/404.json"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_issue(404, None).await.unwrap_err();
        match err {
            RedmineError::Api { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_issue_wraps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/issues.json"))
            .and(body_json(json!({
                "issue": { "project_id": 1, "subject": "New thing" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "issue": issue_json(30, "New thing")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let issue = client_for(&server)
            .create_issue(&NewIssue {
                project_id: 1,
                subject: "New thing".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(issue.id, 30);
    }

    #[tokio::test]
    async fn test_update_accepts_empty_204() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/issues/7.json"))
            .and(body_json(json!({ "issue": { "status_id": 3, "notes": "done" } })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .transition_status(7, 3, Some("done".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_with_nothing_to_send_is_rejected() {
        let server = MockServer::start().await;
        let result = client_for(&server)
            .update_issue(7, &IssueUpdate::default())
            .await;
        assert!(matches!(result, Err(RedmineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_note_private_flag() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/issues/7.json"))
            .and(body_json(json!({
                "issue": { "notes": "internal", "private_notes": true }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).add_note(7, "internal", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_sends_octet_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/uploads.json"))
            .and(header("Content-Type", "application/octet-stream"))
            .and(query_param("filename", "log.txt"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "upload": { "id": 9, "token": "9.abcdef" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server)
            .upload(b"hello".to_vec(), Some("log.txt"))
            .await
            .unwrap();
        assert_eq!(token.token, "9.abcdef");
        assert_eq!(token.id, Some(9));
    }

    #[tokio::test]
    async fn test_list_users_fills_names_and_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users.json"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [
                    { "id": 1, "login": "admin", "firstname": "Redmine", "lastname": "Admin" },
                    { "id": 2, "login": "bot" }
                ],
                "total_count": 9,
                "offset": 0,
                "limit": 2
            })))
            .mount(&server)
            .await;

        let page = client_for(&server)
            .list_users(&Pagination::new(Some(2), None))
            .await
            .unwrap();
        assert_eq!(page.total_count, Some(9));
        assert_eq!(page.items[0].name, "Redmine Admin");
        assert_eq!(page.items[1].name, "bot");
    }

    #[tokio::test]
    async fn test_non_json_body_is_returned_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trackers.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "text/html")
                    .set_body_string("<html>login</html>"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let payload = client
            .send(Method::GET, "trackers", &[], Body::None)
            .await
            .unwrap();
        assert_eq!(payload, Payload::Text("<html>login</html>".to_string()));

        let err = client.list_trackers().await.unwrap_err();
        assert!(matches!(err, RedmineError::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trackers.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "trackers": [] }))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client =
            RedmineClient::new(RedmineConfig::new(server.uri(), "secret-key").with_timeout(1))
                .unwrap();
        let err = client.list_trackers().await.unwrap_err();
        assert!(matches!(err, RedmineError::Timeout(_)));
    }
}
