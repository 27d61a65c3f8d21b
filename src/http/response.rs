//! HTTP response types for the SES query API.

use crate::xml::XmlElement;
use http::HeaderMap;

/// Status codes the query API treats as success.
pub const SUCCESS_CODES: [u16; 4] = [200, 201, 202, 204];

/// Raw response as returned by a [`Transport`](super::Transport).
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is one the query API treats as success.
    pub fn is_success(&self) -> bool {
        SUCCESS_CODES.contains(&self.status)
    }
}

/// Why a request did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorInfo {
    /// The request never completed at the network level.
    Transport {
        /// Short failure class such as `connect` or `timeout`.
        code: String,
        /// Human-readable description.
        message: String,
    },
    /// The service answered with an `<Error>` document.
    Service {
        /// `Sender` or `Receiver`.
        error_type: String,
        /// Service error code, e.g. `MessageRejected`.
        code: String,
        /// Service error message.
        message: String,
        /// Request ID reported alongside the error.
        request_id: String,
    },
}

/// Outcome of one request, returned by value.
///
/// A fresh envelope is built for every call; status `0` means no HTTP
/// response was received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEnvelope {
    /// Parsed response document, absent when empty or replaced by an error.
    pub body: Option<XmlElement>,
    /// HTTP status code.
    pub status: u16,
    /// Error, when one occurred.
    pub error: Option<ErrorInfo>,
}

impl ResponseEnvelope {
    /// Whether an error was recorded.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_envelope() {
        let envelope = ResponseEnvelope::default();
        assert!(envelope.body.is_none());
        assert_eq!(envelope.status, 0);
        assert!(!envelope.is_error());
    }

    #[test]
    fn test_success_codes() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(203, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
