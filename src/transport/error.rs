//! Transport failures.

use thiserror::Error;

/// Why a lookup request produced no response at all.
///
/// A 4xx or 5xx answer still counts as a response; the provider turns
/// those into its own error.
#[derive(Debug, Error)]
pub enum HttpError {
    /// DNS, TCP, TLS or body read failure.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Request timed out")]
    Timeout,

    /// reqwest refused to build a request for the configured URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
