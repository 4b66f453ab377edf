//! Single-attempt HTTP execution with status classification.

use tracing::{debug, instrument};

use crate::config::HttpOptions;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::Response;

/// HTTP client carrying per-service raw options.
///
/// Executes one attempt per call; retry behavior lives in [`crate::retry`]
/// so callers can wrap as much of their round-trip as an attempt covers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    options: HttpOptions,
}

impl HttpClient {
    /// Create a new HTTP client with the given options.
    pub fn new(options: HttpOptions) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .user_agent(&options.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, options })
    }

    /// Create a new HTTP client with default options.
    pub fn default_client() -> Result<Self> {
        Self::new(HttpOptions::default())
    }

    /// Get the client options.
    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Execute a single request attempt.
    ///
    /// Rate-limit responses (429) and server errors (5xx) are surfaced as
    /// errors so a retry wrapper can classify them; other statuses are
    /// returned to the caller for decoding.
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let mut req = self.inner.request(request.method.to_reqwest(), &request.url);

        if let Some(ref token) = request.bearer_token {
            req = req.bearer_auth(token);
        }

        // Per-service headers first, request-level headers win on conflict.
        for (name, value) in &self.options.headers {
            if !request.headers.contains_key(name) {
                req = req.header(name.as_str(), value.as_str());
            }
        }
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if !request.query_params.is_empty() {
            req = req.query(&request.query_params);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        debug!("sending request");

        let response = Response::new(req.send().await?);
        let status = response.status();

        debug!(status, "response received");

        if status == 429 {
            return Err(Error::new(ErrorKind::RateLimited {
                retry_after: response.retry_after(),
            }));
        }

        if matches!(status, 500 | 502 | 503 | 504) {
            return Err(Error::new(ErrorKind::Http {
                status,
                message: format!("Server error: {}", status),
            }));
        }

        Ok(response)
    }

    /// Execute a request and deserialize the JSON response.
    pub async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.execute(request).await?;
        response.json().await
    }
}
