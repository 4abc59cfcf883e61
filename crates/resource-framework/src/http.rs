//! # HTTP Backend
//!
//! REST client for a Barbican-style key manager. Each resource kind lives under
//! `{endpoint}/{BASE_PATH}`; entities are addressed as `{endpoint}/{BASE_PATH}/{id}`.
//!
//! | Operation | Request | Absent |
//! |-----------|---------|--------|
//! | create | `POST /{path}` with the JSON payload | – |
//! | get    | `GET /{path}/{id}` | 404 → `None` |
//! | update | `PUT /{path}/{id}`, then re-fetched | 404 → `None` |
//! | delete | `DELETE /{path}/{id}` | 404 → `false` |
//! | list   | `GET /{path}?name=…`, array under `RESOURCES_KEY` | – |
//!
//! The service answers a create with only the new reference (`{"secret_ref": "…"}`), so the
//! returned entity is the submitted payload merged with that response.
//!
//! Ids always occupy exactly one path segment. Reserved characters are percent-encoded, and
//! an id that is empty, `.` or `..` cannot name an entity, so it is reported as absent
//! without sending a request.

use crate::backend::Backend;
use crate::error::SessionError;
use crate::resource::{merge_attrs, ListQuery, Resource};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by every resource kind.
#[derive(Debug, Clone)]
pub struct HttpSession {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    project_id: Option<String>,
}

impl HttpSession {
    fn user_agent() -> String {
        format!("resource-framework/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Create a session against `endpoint` (e.g. `http://kms:9311/v1`).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(SessionError::Network)?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            token: None,
            project_id: None,
        })
    }

    /// Send `X-Auth-Token` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Send `X-Project-Id` with every request.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds a request for `{endpoint}/{segments...}`. Segments must already be encoded.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = format!("{}/{}", self.endpoint, segments.join("/"));
        debug!(%method, %url, "HTTP request");
        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header("X-Auth-Token", token);
        }
        if let Some(project_id) = &self.project_id {
            builder = builder.header("X-Project-Id", project_id);
        }
        builder
    }
}

/// Serves one resource kind from the remote service.
#[derive(Debug, Clone)]
pub struct HttpBackend<T: Resource> {
    session: HttpSession,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> HttpBackend<T> {
    pub fn new(session: HttpSession) -> Self {
        Self {
            session,
            _resource: PhantomData,
        }
    }

    /// The encoded id segment, or `None` when the id would address something else.
    fn id_segment(id: &T::Id) -> Option<String> {
        match id.as_ref() {
            "" | "." | ".." => {
                debug!(resource = T::KIND, id = id.as_ref(), "Id cannot name an entity");
                None
            }
            raw => Some(percent_encode_component(raw)),
        }
    }

    fn entity_request(&self, method: Method, id: &T::Id) -> Option<RequestBuilder> {
        let segment = Self::id_segment(id)?;
        Some(self.session.request(method, &[T::BASE_PATH, &segment]))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, SessionError> {
        builder.send().await.map_err(SessionError::Network)
    }

    async fn fetch(&self, id: &T::Id) -> Result<Option<T>, SessionError> {
        let Some(builder) = self.entity_request(Method::GET, id) else {
            return Ok(None);
        };
        let response = Self::send(builder).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = json_body(check_status(response).await?).await?;
        require_ref::<T>(&body, "get")?;
        Ok(Some(serde_json::from_value(body)?))
    }
}

/// Percent-encodes everything outside the unreserved set so a value stays one path segment.
fn percent_encode_component(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[usize::from(b >> 4)] as char);
            out.push(HEX[usize::from(b & 0x0F)] as char);
        }
    }
    out
}

/// Entity bodies always carry their reference; anything else is not a `T`.
fn require_ref<T: Resource>(body: &Value, operation: &str) -> Result<(), SessionError> {
    if body.get(T::REF_KEY).is_none() {
        return Err(SessionError::InvalidResponse(format!(
            "{operation} response has no {}",
            T::REF_KEY
        )));
    }
    Ok(())
}

/// Maps non-success statuses onto `SessionError`.
async fn check_status(response: Response) -> Result<Response, SessionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status.as_u16() {
        401 | 403 => Err(SessionError::Unauthorized(status.as_u16())),
        code => {
            let text = response.text().await.unwrap_or_default();
            Err(SessionError::Status {
                status: code,
                message: error_message(&text),
            })
        }
    }
}

/// Extracts the service's `description` (or `title`) from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["description", "title"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

async fn json_body(response: Response) -> Result<Value, SessionError> {
    let bytes = response.bytes().await.map_err(SessionError::Network)?;
    if bytes.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl<T: Resource> Backend<T> for HttpBackend<T> {
    async fn create(&mut self, attrs: T::Create) -> Result<T, SessionError> {
        let mut body = serde_json::to_value(&attrs)?;
        let response =
            Self::send(self.session.request(Method::POST, &[T::BASE_PATH]).json(&body)).await?;
        let created = json_body(check_status(response).await?).await?;
        require_ref::<T>(&created, "create")?;
        merge_attrs(&mut body, created)?;
        Ok(serde_json::from_value(body)?)
    }

    async fn get(&mut self, id: &T::Id) -> Result<Option<T>, SessionError> {
        self.fetch(id).await
    }

    async fn update(&mut self, id: &T::Id, attrs: T::Update) -> Result<Option<T>, SessionError> {
        let Some(builder) = self.entity_request(Method::PUT, id) else {
            return Ok(None);
        };
        let response = Self::send(builder.json(&attrs)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(response).await?;
        self.fetch(id).await
    }

    async fn delete(&mut self, id: &T::Id) -> Result<bool, SessionError> {
        let Some(builder) = self.entity_request(Method::DELETE, id) else {
            return Ok(false);
        };
        let response = Self::send(builder).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    async fn list(&mut self, query: &ListQuery) -> Result<Vec<T>, SessionError> {
        let mut builder = self.session.request(Method::GET, &[T::BASE_PATH]);
        if let Some(name) = &query.name {
            builder = builder.query(&[("name", name)]);
        }
        let mut body = json_body(check_status(Self::send(builder).await?).await?).await?;
        match body.get_mut(T::RESOURCES_KEY).map(Value::take) {
            Some(items) => Ok(serde_json::from_value(items)?),
            None => Ok(Vec::new()),
        }
    }
}
