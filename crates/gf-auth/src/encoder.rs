//! The credential-source trait and the static-token implementation.

use crate::error::Result;

/// A source of bearer tokens.
///
/// Implementations produce a token string on demand; the query layer calls
/// `encode()` once per request when bearer authentication is configured.
pub trait TokenEncoder: Send + Sync {
    /// Produce a bearer token.
    fn encode(&self) -> Result<String>;
}

/// A fixed, pre-issued bearer token.
///
/// The token value is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl StaticToken {
    /// Create a new static token source.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenEncoder for StaticToken {
    fn encode(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
