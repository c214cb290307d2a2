//! HTTP client for the event service.
//!
//! Every path is relative to `{api_url}/api`. The bearer token from the
//! [`AuthStore`] is attached when present. A 401 signs the agent out and
//! empties the query cache before the error reaches the caller.

pub mod auth;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::QueryCache;
use crate::config::HubConfig;
use crate::error::{HubError, Result};
use crate::store::AuthStore;

const API_PREFIX: &str = "/api";

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// 204 or a zero-length body
    Empty,
    /// Body that is not valid JSON, returned verbatim
    Text(String),
    Json(Value),
}

impl ResponseBody {
    fn from_text(status: StatusCode, text: String) -> Self {
        if status == StatusCode::NO_CONTENT || text.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value)?),
            Self::Empty => Err(HubError::Decode("empty response body".to_string())),
            Self::Text(text) => Err(HubError::Decode(format!("expected JSON, got: {}", text))),
        }
    }

    /// JSON array rows; anything else yields no rows.
    pub fn into_rows(self) -> Vec<Value> {
        match self {
            Self::Json(Value::Array(rows)) => rows,
            _ => Vec::new(),
        }
    }
}

enum Payload {
    None,
    Json(Value),
    Multipart(Form),
}

/// Shared client. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: AuthStore,
    cache: QueryCache,
}

impl ApiClient {
    pub fn new(config: &HubConfig, auth: AuthStore, cache: QueryCache) -> Result<Self> {
        let parsed = url::Url::parse(&config.api_url)
            .map_err(|e| HubError::Validation(format!("Invalid api_url {}: {}", config.api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HubError::Validation(format!(
                "Invalid api_url {}: expected http or https",
                config.api_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: format!("{}{}", config.api_url.trim_end_matches('/'), API_PREFIX),
            auth,
            cache,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<ResponseBody> {
        self.execute(Method::GET, path, Payload::None).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.into_json()
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ResponseBody> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, Payload::Json(body)).await
    }

    /// POST without a body.
    pub async fn post_empty(&self, path: &str) -> Result<ResponseBody> {
        self.execute(Method::POST, path, Payload::None).await
    }

    pub async fn delete(&self, path: &str) -> Result<ResponseBody> {
        self.execute(Method::DELETE, path, Payload::None).await
    }

    /// Multipart upload of one file under the `file` field.
    pub async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<ResponseBody> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.execute(Method::POST, path, Payload::Multipart(form)).await
    }

    async fn execute(&self, method: Method, path: &str, payload: Payload) -> Result<ResponseBody> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, path, "API request");

        let mut request = self.client.request(method.clone(), &url);
        request = match payload {
            Payload::None => request.header("Content-Type", "application/json"),
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form),
        };
        if let Some(token) = self.auth.token().await {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        // An unreadable body is treated like an empty one
        let text = response.text().await.unwrap_or_default();
        debug!(method = %method, path, status = status.as_u16(), "API response");

        if status.is_success() {
            return Ok(ResponseBody::from_text(status, text));
        }

        let message = if text.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            text
        };

        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "request rejected with 401, signing out");
            self.auth.logout("unauthorized").await;
            self.cache.clear().await;
            return Err(HubError::Unauthorized(message));
        }

        Err(HubError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

/// Encode an id for use as a path segment.
pub fn segment(id: impl std::fmt::Display) -> String {
    urlencoding::encode(&id.to_string()).into_owned()
}
