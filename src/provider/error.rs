//! Address lookup errors.

use thiserror::Error;

use crate::changelog::MalformedRecord;
use crate::transport::HttpError;

/// Error type for address lookups.
///
/// All variants are recovered the same way by the scheduler: the check
/// is reported as failed and the next scheduled check is the retry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be completed.
    #[error("Request failed: {0}")]
    Transport(#[from] HttpError),

    /// The service answered with a non-success status.
    #[error("Service returned HTTP {status}")]
    Status {
        /// Status code returned by the service
        status: http::StatusCode,
    },

    /// The response body was not valid UTF-8.
    #[error("Response body is not valid UTF-8")]
    InvalidEncoding,

    /// The response body was empty after trimming whitespace.
    #[error("Response body is empty")]
    EmptyResponse,

    /// The response body is not a single address, for example several
    /// comma-separated values or more than one line.
    #[error("Response is not a single address: {body:?}")]
    InvalidAddress {
        /// Trimmed response body
        body: String,
        /// What made it unusable
        #[source]
        reason: MalformedRecord,
    },
}
