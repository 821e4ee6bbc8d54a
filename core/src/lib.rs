//! Request transport for the cluster administration console.
//!
//! # Overview
//! Every call the console makes to its backend goes through
//! `Transport::request`: one logical request with a per-attempt timeout,
//! bounded retry with exponential backoff for transient failures, and a
//! single `ApiError` shape for everything that goes wrong. `AdminClient`
//! layers typed endpoint wrappers on top.
//!
//! # Design
//! - The network primitive (`Fetch`) and the clock (`Timer`) are traits, so
//!   tests drive the transport with scripted responses and a paused clock.
//! - `ApiError::status` tells callers what happened: `0` no response,
//!   `408` client timeout, otherwise the server's HTTP status.
//! - Configuration is injected through `TransportConfig`; nothing is global.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod retry;
pub mod timer;
pub mod transport;
pub mod types;

pub use client::AdminClient;
pub use config::{ConfigError, TransportConfig};
pub use error::{ApiError, FetchError};
pub use fetch::{Fetch, ReqwestFetcher};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use retry::{RetryPolicy, MAX_RETRIES, RETRY_BASE_DELAY};
pub use timer::{Timer, TokioTimer};
pub use transport::{Transport, DEFAULT_TIMEOUT};
