//! Mock transport for testing.
//!
//! [`MockTransport`] records every request it receives and answers from a
//! queue of canned responses or failures, so facade behaviour can be checked
//! without a network.
//!
//! ```
//! use integrations_aws_ses_query::mocks::{MockResponse, MockTransport};
//!
//! let transport = MockTransport::with_responses(vec![
//!     MockResponse::ok_with_body("<GetSendQuotaResponse/>"),
//!     MockResponse::error(500, ""),
//! ]);
//! assert_eq!(transport.request_count(), 0);
//! ```

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportFailure};

/// Sample response documents.
pub struct TestFixtures;

impl TestFixtures {
    /// Successful `SendEmail`/`SendRawEmail` response.
    pub fn send_email_xml(action: &str, message_id: &str, request_id: &str) -> String {
        format!(
            r#"<{action}Response xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <{action}Result>
    <MessageId>{message_id}</MessageId>
  </{action}Result>
  <ResponseMetadata>
    <RequestId>{request_id}</RequestId>
  </ResponseMetadata>
</{action}Response>"#
        )
    }

    /// `ListVerifiedEmailAddresses` response.
    pub fn verified_addresses_xml(addresses: &[&str]) -> String {
        let members: String = addresses
            .iter()
            .map(|a| format!("<member>{}</member>", a))
            .collect();
        format!(
            r#"<ListVerifiedEmailAddressesResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <ListVerifiedEmailAddressesResult>
    <VerifiedEmailAddresses>{members}</VerifiedEmailAddresses>
  </ListVerifiedEmailAddressesResult>
  <ResponseMetadata>
    <RequestId>list-request-id</RequestId>
  </ResponseMetadata>
</ListVerifiedEmailAddressesResponse>"#
        )
    }

    /// `GetSendQuota` response.
    pub fn send_quota_xml() -> &'static str {
        r#"<GetSendQuotaResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <GetSendQuotaResult>
    <SentLast24Hours>127.0</SentLast24Hours>
    <Max24HourSend>200.0</Max24HourSend>
    <MaxSendRate>1.0</MaxSendRate>
  </GetSendQuotaResult>
  <ResponseMetadata>
    <RequestId>quota-request-id</RequestId>
  </ResponseMetadata>
</GetSendQuotaResponse>"#
    }

    /// Service error document.
    pub fn error_xml(error_type: &str, code: &str, message: &str, request_id: &str) -> String {
        format!(
            r#"<ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <Error>
    <Type>{error_type}</Type>
    <Code>{code}</Code>
    <Message>{message}</Message>
  </Error>
  <RequestId>{request_id}</RequestId>
</ErrorResponse>"#
        )
    }
}

/// A canned answer: an HTTP response or a transport failure.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Answer with this response.
    Response(MockResponse),
    /// Fail before any response.
    Failure(TransportFailure),
}

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Create a successful response with empty body.
    pub fn ok() -> Self {
        Self::error(200, Vec::new())
    }

    /// Create a successful response with body.
    pub fn ok_with_body(body: impl Into<Vec<u8>>) -> Self {
        Self::error(200, body)
    }

    /// Create a response with any status.
    pub fn error(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Add a header to the response. Invalid names or values are skipped.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }
}

impl From<MockResponse> for MockOutcome {
    fn from(response: MockResponse) -> Self {
        MockOutcome::Response(response)
    }
}

/// Mock HTTP transport for testing.
pub struct MockTransport {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

impl MockTransport {
    /// Create a mock transport with no responses.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: None,
        }
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        let transport = Self::new();
        for response in responses {
            transport.queue(response);
        }
        transport
    }

    /// Create a mock transport that answers every request the same way.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::new()
        }
    }

    /// Create a mock transport whose first request fails.
    pub fn with_failure(code: &str, message: &str) -> Self {
        let transport = Self::new();
        transport.queue(MockOutcome::Failure(TransportFailure::new(code, message)));
        transport
    }

    /// Queue an outcome.
    pub fn queue(&self, outcome: impl Into<MockOutcome>) {
        lock(&self.outcomes).push_back(outcome.into());
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        lock(&self.requests).push(request);

        let outcome = lock(&self.outcomes)
            .pop_front()
            .or_else(|| self.default_response.clone().map(MockOutcome::Response));

        match outcome {
            Some(MockOutcome::Response(mock)) => Ok(HttpResponse {
                status: mock.status,
                headers: mock.headers,
                body: mock.body,
            }),
            Some(MockOutcome::Failure(failure)) => Err(failure),
            None => Err(TransportFailure::new(
                "connect",
                "No mock response available",
            )),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_outcomes", &lock(&self.outcomes).len())
            .field("recorded_requests", &lock(&self.requests).len())
            .finish()
    }
}
