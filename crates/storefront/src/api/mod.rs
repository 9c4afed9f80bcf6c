//! Remote client for the Shopfront REST backend.
//!
//! # Architecture
//!
//! - One `reqwest::Client` shared by every facade through an `Arc`
//! - The backend is the source of truth - no caching, no retries
//! - Every non-success status becomes an [`ApiError`]; nothing is swallowed
//!
//! # API Reference
//!
//! - Base URL: `SHOPFRONT_API_URL` (e.g. `http://localhost:8080`)
//! - Authentication: none; user identity travels as a plain integer
//! - Payloads: JSON with camelCase fields

mod error;

pub use error::{ApiError, ApiResult};

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiConfig;

/// Maximum number of body characters kept in logs and error messages.
const BODY_SNIPPET_LEN: usize = 200;

/// HTTP client bound to the backend base URL.
///
/// Cheaply cloneable; clones share the same connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        // Url::join drops the last path segment unless the base ends in '/'.
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a resource path (e.g. `products/3`) against the base URL.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(method = "GET", %url, "API request");
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(method = "POST", %url, "API request");
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a PATCH request with a JSON body.
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(method = "PATCH", %url, "API request");
        let response = self.inner.client.patch(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a PATCH request whose arguments travel in the query string.
    pub(crate) async fn patch_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut url = self.url(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        tracing::debug!(method = "PATCH", %url, "API request");
        let response = self
            .inner
            .client
            .patch(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request and decode the response body.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(method = "DELETE", %url, "API request");
        let response = self.inner.client.delete(url).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request whose response body is not needed.
    pub(crate) async fn delete_empty(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path)?;
        tracing::debug!(method = "DELETE", %url, "API request");
        let response = self.inner.client.delete(url).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        tracing::warn!(
            status = %status,
            body = %snippet(&body),
            "API returned non-success status"
        );
        Err(Self::status_error(status, &body))
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %snippet(&body),
                "API returned non-success status"
            );
            return Err(Self::status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %snippet(&body),
                "Failed to decode API response"
            );
            ApiError::Decode(e.to_string())
        })
    }

    /// Map a non-success status to an error, keeping the backend's message.
    fn status_error(status: StatusCode, body: &str) -> ApiError {
        let message = error_message(status, body);
        match status {
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Pull a human-readable message out of an error body.
///
/// Prefers a JSON `message` or `error` field, then the raw text, then the
/// status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        snippet(trimmed)
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let api = client("http://localhost:8080/api");
        assert_eq!(api.base_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(
            api.url("/products/3").unwrap().as_str(),
            "http://localhost:8080/api/products/3"
        );
    }

    #[test]
    fn test_url_at_root() {
        let api = client("http://localhost:8080");
        assert_eq!(
            api.url("carts/user/1").unwrap().as_str(),
            "http://localhost:8080/carts/user/1"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            ApiClient::status_error(StatusCode::BAD_REQUEST, r#"{"message":"Insufficient stock"}"#),
            ApiError::BadRequest(msg) if msg == "Insufficient stock"
        ));
        assert!(matches!(
            ApiClient::status_error(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(msg) if msg == "Not Found"
        ));
        assert!(matches!(
            ApiClient::status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::Status { status: 500, message } if message == "boom"
        ));
    }

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#"{"error":"taken"}"#),
            "taken"
        );
        assert_eq!(error_message(StatusCode::CONFLICT, "  plain  "), "plain");
    }
}
