//! HTTP client abstraction for testability.

use super::error::ClientError;

/// User-Agent sent with every request so the server can tell frames apart
/// in its logs.
const USER_AGENT: &str = concat!("picframe/", env!("CARGO_PKG_VERSION"));

/// Trait for the HTTP operations the client needs.
///
/// This abstraction allows for dependency injection and easier testing by
/// enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, ClientError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new client with a 30 second request timeout.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(30)
    }

    /// Creates a new client with a custom request timeout.
    ///
    /// The timeout also bounds how long the prefetch worker can be stuck
    /// in a single fetch, which in turn bounds shutdown latency.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ClientError::Http(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ClientError::Http(format!("failed to read response: {}", e)))
    }
}
