//! # gf-query
//!
//! GraphQL query surface for graphfetch.
//!
//! Application code declares a field selection as plain data — a
//! [`Selection`] tree — instead of raw query text. The crate renders the
//! selection into a GraphQL query document, executes it over HTTP, decodes
//! the response envelope (translating wire lowerCamelCase keys into
//! snake_case), and wraps the payload into model values.
//!
//! ## Example
//!
//! ```rust,ignore
//! use graphfetch_query::{Fetched, Fetcher, Params, Record, Selection, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), graphfetch_query::Error> {
//!     let config = ServiceConfig::new("http://localhost:3000/graphql")
//!         .with_retriable(true);
//!
//!     let fetcher: Fetcher<Record> =
//!         Fetcher::new(config, "user", Params::new().set("id", "42"))?;
//!
//!     let selection = vec![
//!         Selection::field("first_name"),
//!         Selection::nested("address", vec![Selection::field("city")]),
//!     ];
//!
//!     match fetcher.in_locale("en").fetch(&selection).await? {
//!         Fetched::One(user) => println!("{:?}", user.get_str("first_name")),
//!         Fetched::Many(_) | Fetched::None => {}
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod case;
mod config;
mod error;
mod fetcher;
mod model;
mod params;
mod query;
mod selection;

pub use config::{AuthConfig, AuthStrategy, ServiceConfig};
pub use error::{Error, ErrorKind, Result};
pub use fetcher::{Fetched, Fetcher};
pub use model::Record;
pub use params::{ParamValue, Params};
pub use query::Query;
pub use selection::Selection;

// Config building blocks from the transport crate, re-exported so callers
// don't need a direct gf-client dependency.
pub use graphfetch_client::{ErrorClass, HttpOptions, Retriable, RetryConfig, RetryOverrides};
