//! Tests for `HttpAddressProvider`.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::*;
use crate::changelog::MalformedRecord;
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client that replays scripted results and records requests.
struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn body(status: http::StatusCode, body: &str) -> Self {
        Self::new(vec![Ok(HttpResponse::new(status, body.as_bytes().to_vec()))])
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HttpError::Timeout))
    }
}

fn provider(client: MockClient) -> HttpAddressProvider<MockClient> {
    HttpAddressProvider::new(client, url::Url::parse("https://api.ipify.org").unwrap())
}

#[tokio::test]
async fn returns_trimmed_body() {
    let provider = provider(MockClient::body(http::StatusCode::OK, "  203.0.113.5\n"));

    let address = provider.fetch().await.unwrap();

    assert_eq!(address, "203.0.113.5");
}

#[tokio::test]
async fn does_not_validate_address_format() {
    let provider = provider(MockClient::body(http::StatusCode::OK, "not-an-ip"));

    assert_eq!(provider.fetch().await.unwrap(), "not-an-ip");
}

#[tokio::test]
async fn multi_line_body_is_failure() {
    let provider = provider(MockClient::body(
        http::StatusCode::OK,
        "203.0.113.5\n2024-01-01 00:00:00,6.6.6.6\n",
    ));

    let error = provider.fetch().await.unwrap_err();

    assert!(matches!(
        error,
        FetchError::InvalidAddress {
            reason: MalformedRecord::ForbiddenCharacter('\n'),
            ..
        }
    ));
    assert!(error.to_string().contains("not a single address"));
}

#[tokio::test]
async fn comma_separated_body_is_failure() {
    let provider = provider(MockClient::body(
        http::StatusCode::OK,
        "203.0.113.5, 198.51.100.7",
    ));

    let error = provider.fetch().await.unwrap_err();

    match error {
        FetchError::InvalidAddress { body, reason } => {
            assert_eq!(body, "203.0.113.5, 198.51.100.7");
            assert_eq!(reason, MalformedRecord::ForbiddenCharacter(','));
        }
        other => panic!("expected InvalidAddress, got {other:?}"),
    }
}

#[tokio::test]
async fn crlf_terminated_body_is_accepted() {
    let provider = provider(MockClient::body(http::StatusCode::OK, "203.0.113.5\r\n"));

    assert_eq!(provider.fetch().await.unwrap(), "203.0.113.5");
}

#[tokio::test]
async fn sends_single_get_to_configured_url() {
    let provider = provider(MockClient::body(http::StatusCode::OK, "2001:db8::1"));

    provider.fetch().await.unwrap();

    let requests = provider.client().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, http::Method::GET);
    assert_eq!(requests[0].url.as_str(), "https://api.ipify.org/");
}

#[tokio::test]
async fn non_success_status_is_failure() {
    let provider = provider(MockClient::body(
        http::StatusCode::SERVICE_UNAVAILABLE,
        "203.0.113.5",
    ));

    let error = provider.fetch().await.unwrap_err();

    assert!(matches!(
        error,
        FetchError::Status {
            status: http::StatusCode::SERVICE_UNAVAILABLE
        }
    ));
    assert!(error.to_string().contains("503"));
}

#[tokio::test]
async fn transport_error_is_failure() {
    let provider = provider(MockClient::new(vec![Err(HttpError::Timeout)]));

    let error = provider.fetch().await.unwrap_err();

    assert!(matches!(error, FetchError::Transport(HttpError::Timeout)));
}

#[tokio::test]
async fn blank_body_is_failure() {
    let provider = provider(MockClient::body(http::StatusCode::OK, " \r\n "));

    assert!(matches!(
        provider.fetch().await,
        Err(FetchError::EmptyResponse)
    ));
}

#[tokio::test]
async fn invalid_utf8_is_failure() {
    let client = MockClient::new(vec![Ok(HttpResponse::new(
        http::StatusCode::OK,
        vec![0xc3, 0x28],
    ))]);
    let provider = provider(client);

    assert!(matches!(
        provider.fetch().await,
        Err(FetchError::InvalidEncoding)
    ));
}

#[tokio::test]
async fn no_state_between_calls() {
    let client = MockClient::new(vec![
        Ok(HttpResponse::new(http::StatusCode::OK, b"203.0.113.5".to_vec())),
        Err(HttpError::Timeout),
        Ok(HttpResponse::new(http::StatusCode::OK, b"203.0.113.9".to_vec())),
    ]);
    let provider = provider(client);

    assert_eq!(provider.fetch().await.unwrap(), "203.0.113.5");
    assert!(provider.fetch().await.is_err());
    assert_eq!(provider.fetch().await.unwrap(), "203.0.113.9");
}
