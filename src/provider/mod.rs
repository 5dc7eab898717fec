//! External address lookup.
//!
//! This module provides:
//! - The provider abstraction ([`AddressProvider`])
//! - The HTTP implementation against a "what is my IP" service ([`HttpAddressProvider`])
//! - Error types ([`FetchError`])

mod error;
mod service;

#[cfg(test)]
mod service_tests;

pub use error::FetchError;
pub use service::HttpAddressProvider;

/// Trait for fetching the host's externally visible address.
///
/// # Design
///
/// - One call is one outbound request; no retries, no caching
/// - No state is kept between calls
/// - The returned address is the trimmed service response; it is not parsed
///   as an IP, but it never holds a `,` or line break
///
/// # Example
///
/// ```ignore
/// use ipwatch::provider::{AddressProvider, FetchError};
///
/// struct Fixed(&'static str);
///
/// impl AddressProvider for Fixed {
///     async fn fetch(&self) -> Result<String, FetchError> {
///         Ok(self.0.to_string())
///     }
/// }
/// ```
pub trait AddressProvider: Send + Sync {
    /// Fetches the current external address.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failures, non-success responses,
    /// or a response body that does not contain an address.
    fn fetch(&self) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}
