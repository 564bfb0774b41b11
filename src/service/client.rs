//! HTTP client for the collector agent's web API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ServiceError;
use crate::shell::{ConfigService, SessionService, VersionInfo};

pub const INFO_PATH: &str = "/api/rt/agent/info/version/";
pub const RELOAD_PATH: &str = "/api/rt/agent/reload/";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const IMPORT_PATH: &str = "/api/cfg/import";

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Agent API client.
///
/// Keeps a cookie store so the session established by [`Self::login`] is reused
/// by every later call.
#[derive(Debug, Clone)]
pub struct HttpSessionService {
    base_url: String,
    client: Client,
}

impl HttpSessionService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ServiceError::InvalidUrl(base_url));
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Open a session on the agent
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&Credentials { username, password })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Map non-success statuses to [`ServiceError::Status`] carrying the body text
async fn check(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        text => text.to_string(),
    };
    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Decode a body that is either a JSON string or plain text
fn text_payload(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        _ => body.trim().to_string(),
    }
}

/// Sections are served either as an array or as a map keyed by entry ID
fn entries_payload(value: Value) -> Result<Vec<Value>, ServiceError> {
    match value {
        Value::Array(entries) => Ok(entries),
        Value::Object(map) => Ok(map.into_iter().map(|(_, v)| v).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(ServiceError::Decode(format!(
            "expected a list of entries, got {}",
            other
        ))),
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    #[instrument(skip(self))]
    async fn fetch_info(&self) -> Result<VersionInfo, ServiceError> {
        let response = self.client.get(self.url(INFO_PATH)).send().await?;
        let info = check(response).await?.json::<VersionInfo>().await?;
        debug!("Agent version {}", info.version);
        Ok(info)
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), ServiceError> {
        let response = self.client.post(self.url(LOGOUT_PATH)).send().await?;
        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reload_config(&self) -> Result<String, ServiceError> {
        let response = self.client.get(self.url(RELOAD_PATH)).send().await?;
        let body = check(response).await?.text().await?;
        Ok(text_payload(&body))
    }
}

#[async_trait]
impl ConfigService for HttpSessionService {
    #[instrument(skip(self))]
    async fn list_entries(&self, path: &str) -> Result<Vec<Value>, ServiceError> {
        let response = self.client.get(self.url(path)).send().await?;
        let value = check(response).await?.json::<Value>().await?;
        entries_payload(value)
    }

    #[instrument(skip(self, document))]
    async fn import_config(
        &self,
        document: Value,
        overwrite: bool,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/{}", self.url(IMPORT_PATH), overwrite);
        let response = self.client.post(url).json(&document).send().await?;
        let body = check(response).await?.text().await?;
        Ok(text_payload(&body))
    }
}
