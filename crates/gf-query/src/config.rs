//! Per-service configuration.
//!
//! One [`ServiceConfig`] describes one GraphQL service: endpoint, raw HTTP
//! options, optional authentication, and the retry knob. Configuration is
//! passed explicitly to constructors; there is no ambient or inherited
//! state.

use std::sync::Arc;

use graphfetch_auth::TokenEncoder;
use graphfetch_client::{HttpOptions, Retriable};

/// Configuration for one GraphQL service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// GraphQL endpoint URL.
    pub url: String,
    /// Raw HTTP options merged into each request.
    pub http: HttpOptions,
    /// Optional authentication.
    pub auth: Option<AuthConfig>,
    /// Retry knob, resolved once per fetcher.
    pub retriable: Retriable,
}

impl ServiceConfig {
    /// Create a config for the given endpoint with defaults everywhere else.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: HttpOptions::default(),
            auth: None,
            retriable: Retriable::default(),
        }
    }

    /// Set raw HTTP options.
    pub fn with_http(mut self, http: HttpOptions) -> Self {
        self.http = http;
        self
    }

    /// Set the authentication config.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Configure bearer authentication with the given token source.
    pub fn with_bearer(self, encoder: Arc<dyn TokenEncoder>) -> Self {
        self.with_auth(AuthConfig::bearer(encoder))
    }

    /// Set the retry knob.
    pub fn with_retriable(mut self, retriable: impl Into<Retriable>) -> Self {
        self.retriable = retriable.into();
        self
    }
}

/// Authentication strategy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// `Authorization: Bearer <token>` with a token from a [`TokenEncoder`].
    Bearer,
}

/// Authentication configuration: a strategy plus its credential source.
#[derive(Clone)]
pub struct AuthConfig {
    /// The strategy to apply.
    pub strategy: AuthStrategy,
    /// The credential source invoked once per request.
    pub encoder: Arc<dyn TokenEncoder>,
}

impl AuthConfig {
    /// Bearer authentication with the given token source.
    pub fn bearer(encoder: Arc<dyn TokenEncoder>) -> Self {
        Self {
            strategy: AuthStrategy::Bearer,
            encoder,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("strategy", &self.strategy)
            .field("encoder", &"[dyn TokenEncoder]")
            .finish()
    }
}
