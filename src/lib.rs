//! # graphfetch
//!
//! A GraphQL fetch client library for Rust.
//!
//! Application code declares field selections as plain data instead of raw
//! query text; graphfetch renders the query document, executes it over HTTP
//! with retry and bearer authentication, translates wire lowerCamelCase keys
//! into snake_case, and wraps payloads into model values.
//!
//! ## Crates
//!
//! - **graphfetch-client** - HTTP transport: request building, response
//!   handling, retry policy with backoff and jitter
//! - **graphfetch-auth** - Bearer-token credential sources: static tokens,
//!   JWT signing
//! - **graphfetch-query** - Query surface: selection trees, document
//!   rendering, envelope decoding, retry-wrapped fetching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graphfetch::{Fetched, Fetcher, Params, Record, Selection, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::new("http://localhost:3000/graphql")
//!         .with_retriable(true);
//!
//!     let fetcher: Fetcher<Record> =
//!         Fetcher::new(config, "users", Params::new().set("active", true))?;
//!
//!     let selection = vec![
//!         Selection::field("first_name"),
//!         Selection::nested("address", vec![Selection::field("city")]),
//!     ];
//!
//!     for user in fetcher.fetch(&selection).await?.many() {
//!         println!("{:?}", user.get_str("first_name"));
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use graphfetch_auth as auth;
#[cfg(feature = "client")]
pub use graphfetch_client as client;
#[cfg(feature = "query")]
pub use graphfetch_query as query;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use graphfetch_auth::{JwtEncoder, StaticToken, TokenEncoder};
#[cfg(feature = "client")]
pub use graphfetch_client::{HttpOptions, Retriable, RetryConfig, RetryOverrides};
#[cfg(feature = "query")]
pub use graphfetch_query::{
    Fetched, Fetcher, ParamValue, Params, Query, Record, Selection, ServiceConfig,
};
