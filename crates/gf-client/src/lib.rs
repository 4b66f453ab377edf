//! # gf-client
//!
//! Core HTTP transport infrastructure for graphfetch.
//!
//! This crate provides the foundational HTTP client with:
//! - Request building (headers, query parameters, bearer auth)
//! - Response handling with typed JSON decoding
//! - Rate limit detection with Retry-After support
//! - A reusable retry policy with exponential backoff and jitter
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Query surface                           │
//! │  (gf-query: selection rendering, envelope decoding)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HttpClient                             │
//! │  - Single-attempt execution with status classification      │
//! │  - Request building with per-service default headers        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   retry::run (decorator)                    │
//! │  - Wraps any fallible async operation                       │
//! │  - Backoff schedule + configurable retryable error classes  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The retry wrapper is deliberately a standalone component rather than being
//! baked into [`HttpClient`]: callers decide how much of their round-trip
//! (transport only, or transport plus decoding) a retry attempt covers.

mod client;
mod config;
mod error;
mod request;
mod response;
pub mod retry;

pub use client::HttpClient;
pub use config::{HttpOptions, HttpOptionsBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::Response;
pub use retry::{
    BackoffStrategy, ErrorClass, Retriable, RetryConfig, RetryOverrides, RetryPolicy,
    RetryableError,
};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("graphfetch/", env!("CARGO_PKG_VERSION"));
