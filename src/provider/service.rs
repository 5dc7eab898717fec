//! HTTP-backed address provider.

use http::header::{ACCEPT, HeaderValue};

use crate::changelog::check_address;
use crate::transport::{HttpClient, HttpRequest};

use super::{AddressProvider, FetchError};

/// Address provider that asks a plain-text "what is my IP" endpoint.
///
/// Sends one GET per [`fetch`](AddressProvider::fetch) and returns the
/// whitespace-trimmed body. A body holding several values or lines is
/// rejected, since it could not be logged as one record. Services such as `https://api.ipify.org`
/// answer with the bare address.
#[derive(Debug, Clone)]
pub struct HttpAddressProvider<H> {
    client: H,
    url: url::Url,
}

impl<H> HttpAddressProvider<H> {
    /// Creates a provider that queries `url` through `client`.
    #[must_use]
    pub const fn new(client: H, url: url::Url) -> Self {
        Self { client, url }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the configured service URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }
}

impl<H: HttpClient> AddressProvider for HttpAddressProvider<H> {
    async fn fetch(&self) -> Result<String, FetchError> {
        let request = HttpRequest::get(self.url.clone())
            .with_header(ACCEPT, HeaderValue::from_static("text/plain"));

        let response = self.client.request(request).await?;

        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
            });
        }

        let address = response
            .body_text()
            .ok_or(FetchError::InvalidEncoding)?
            .trim();

        if address.is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        check_address(address).map_err(|reason| FetchError::InvalidAddress {
            body: address.to_string(),
            reason,
        })?;

        Ok(address.to_string())
    }
}
