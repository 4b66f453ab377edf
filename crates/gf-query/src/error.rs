//! Error types for gf-query.

use std::time::Duration;

use graphfetch_client::{ErrorClass, RetryableError};

/// Result type alias for gf-query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for gf-query operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The messages reported by the server, if this is a server error.
    pub fn server_messages(&self) -> Option<&[String]> {
        match &self.kind {
            ErrorKind::Server(messages) => Some(messages),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The response envelope carried an `errors` array. The display is the
    /// comma-joined, double-quoted list of the reported messages.
    #[error("{}", quote_join(.0))]
    Server(Vec<String>),

    /// The decoded payload was neither an object, an array, nor null.
    #[error("unexpected response payload: {0}")]
    UnexpectedPayload(String),

    /// The payload did not deserialize into the bound model type.
    #[error("payload does not match model: {0}")]
    Decode(String),

    /// Transport-level failure.
    #[error("{0}")]
    Client(graphfetch_client::ErrorKind),

    /// Token encoding failure.
    #[error("{0}")]
    Auth(graphfetch_auth::ErrorKind),
}

fn quote_join(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("\"{}\"", m))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<graphfetch_client::Error> for Error {
    fn from(err: graphfetch_client::Error) -> Self {
        let graphfetch_client::Error { kind, source } = err;
        Error {
            kind: ErrorKind::Client(kind),
            source,
        }
    }
}

impl From<graphfetch_auth::Error> for Error {
    fn from(err: graphfetch_auth::Error) -> Self {
        let graphfetch_auth::Error { kind, source } = err;
        Error {
            kind: ErrorKind::Auth(kind),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Decode(err.to_string()), err)
    }
}

impl RetryableError for Error {
    fn class(&self) -> Option<ErrorClass> {
        match &self.kind {
            ErrorKind::Client(kind) => kind.class(),
            ErrorKind::Server(_) => Some(ErrorClass::Server),
            _ => None,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::Client(kind) => kind.retry_after(),
            _ => None,
        }
    }
}
