//! # gf-auth
//!
//! Bearer-token credential sources for graphfetch.
//!
//! A GraphQL service configured with bearer authentication needs a fresh
//! token for each request. This crate defines the [`TokenEncoder`] trait —
//! a zero-argument `encode()` returning the token string — and two
//! implementations:
//!
//! - [`StaticToken`] — a fixed, pre-issued token
//! - [`JwtEncoder`] — signs a short-lived JWT per request
//!
//! ## Security
//!
//! Token and key material is redacted in Debug output so credentials do not
//! leak into logs.
//!
//! ## Example
//!
//! ```rust,ignore
//! use graphfetch_auth::{JwtEncoder, TokenEncoder};
//!
//! let encoder = JwtEncoder::from_secret("my-service", b"shared-secret");
//! let token = encoder.encode()?;
//! ```

mod encoder;
mod error;
mod jwt;

pub use encoder::{StaticToken, TokenEncoder};
pub use error::{Error, ErrorKind, Result};
pub use jwt::JwtEncoder;
