use crate::error::ApiError;
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("movie-catalog/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    pub base_url: String,
    pub access_token: Option<String>,
}

impl TmdbClient {
    /// Client with the default request timeout.
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::ClientInit {
                message: e.to_string(),
            })?;

        Ok(TmdbClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    pub fn with_access_token(mut self, access_token: String) -> Self {
        self.access_token = Some(access_token);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Builds a request for `path` (expected to start with `/`) under the base URL.
    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        request
    }
}
