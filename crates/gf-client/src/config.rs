//! Raw HTTP options applied to every request issued through a client.

use std::collections::HashMap;
use std::time::Duration;

/// Raw HTTP options for the underlying transport.
///
/// These are merged into each request: timeouts bound individual attempts,
/// and `headers` are sent on every request (a request-level header with the
/// same name wins).
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Extra headers added to every request.
    pub headers: HashMap<String, String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
            headers: HashMap::new(),
        }
    }
}

impl HttpOptions {
    /// Create a new options builder.
    pub fn builder() -> HttpOptionsBuilder {
        HttpOptionsBuilder::default()
    }
}

/// Builder for [`HttpOptions`].
#[derive(Debug, Default)]
pub struct HttpOptionsBuilder {
    options: HttpOptions,
}

impl HttpOptionsBuilder {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Set a custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = user_agent.into();
        self
    }

    /// Add a header sent on every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.insert(name.into(), value.into());
        self
    }

    /// Build the options.
    pub fn build(self) -> HttpOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = HttpOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.connect_timeout, Duration::from_secs(10));
        assert!(options.user_agent.contains("graphfetch"));
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_builder() {
        let options = HttpOptions::builder()
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("custom-agent/1.0")
            .with_header("X-Request-Source", "batch")
            .build();

        assert_eq!(options.timeout, Duration::from_secs(60));
        assert_eq!(options.user_agent, "custom-agent/1.0");
        assert_eq!(
            options.headers.get("X-Request-Source"),
            Some(&"batch".to_string())
        );
    }
}
