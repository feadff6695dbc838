//! Shopify Admin REST API client (HIGH PRIVILEGE).
//!
//! Every call is routed through the [`CallGovernor`](crate::governor::CallGovernor),
//! so the process-wide rate ceiling and throttle-retry policy apply no matter
//! which component issues the call.
//!
//! # Example
//!
//! ```rust,ignore
//! let client = ShopifyClient::new(&config.shopify, CallGovernor::new())?;
//!
//! if let Some(id) = client.find_product_by_handle("ring-1").await? {
//!     client.update_product(id, &product).await?;
//! } else {
//!     client.create_product(&product).await?;
//! }
//! ```

mod inventory;
mod products;
pub mod types;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::ShopifyConfig;
use crate::governor::CallGovernor;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (network, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by Shopify (HTTP 429). Recovered by the call governor
    /// unless retries exhaust.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed (invalid access token).
    #[error("Unauthorized: invalid access token")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Every retry attempt was throttled.
    #[error("Rate-limit retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Shopify Admin REST API client.
///
/// Cheap to clone; all state lives behind an `Arc`. The access token rides
/// in a default header on the underlying HTTP client.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    base_url: String,
    governor: CallGovernor,
}

impl ShopifyClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &ShopifyConfig, governor: CallGovernor) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(config.access_token.expose_secret())
            .map_err(|e| ShopifyError::Parse(format!("Invalid access token format: {e}")))?;
        token.set_sensitive(true);
        headers.insert("X-Shopify-Access-Token", token);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                client,
                base_url: format!(
                    "https://{}/admin/api/{}",
                    config.store, config.api_version
                ),
                governor,
            }),
        })
    }

    /// Execute a governed GET request.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ShopifyError> {
        let url = format!("{}/{path}", self.inner.base_url);
        self.inner
            .governor
            .run(async || {
                let response = self.inner.client.get(&url).query(query).send().await?;
                handle_response(response).await
            })
            .await
    }

    /// Execute a governed POST request.
    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ShopifyError> {
        let url = format!("{}/{path}", self.inner.base_url);
        self.inner
            .governor
            .run(async || {
                let response = self.inner.client.post(&url).json(body).send().await?;
                handle_response(response).await
            })
            .await
    }

    /// Execute a governed PUT request.
    pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ShopifyError> {
        let url = format!("{}/{path}", self.inner.base_url);
        self.inner
            .governor
            .run(async || {
                let response = self.inner.client.put(&url).json(body).send().await?;
                handle_response(response).await
            })
            .await
    }
}

/// Handle an API response and parse the JSON body.
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ShopifyError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(format!("Failed to parse response: {e}")));
    }

    Err(parse_error(response).await)
}

/// Map an error response onto the error taxonomy.
async fn parse_error(response: reqwest::Response) -> ShopifyError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        return ShopifyError::RateLimited(retry_after);
    }

    if status == 401 || status == 403 {
        return ShopifyError::Unauthorized;
    }

    if status == 404 {
        return ShopifyError::NotFound("Resource not found".to_string());
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    ShopifyError::Api { status, message }
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
