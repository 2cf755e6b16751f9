//! Client configuration

use crate::{ClientResult, HttpClient};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Client configuration for connecting to the Ceylon Travels API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, including the `/api` prefix
    pub base_url: String,

    /// JWT token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
        }
    }

    /// Set the JWT token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Server origin: the base URL without its `/api` suffix
    pub fn origin(&self) -> &str {
        let base = self.base_url.trim_end_matches('/');
        base.strip_suffix("/api").unwrap_or(base)
    }

    /// Absolute URL of a stored image path such as `/uploads/<hash>.png`
    ///
    /// Absolute URLs pass through unchanged.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.origin(), path.trim_start_matches('/'))
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<HttpClient> {
        HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
