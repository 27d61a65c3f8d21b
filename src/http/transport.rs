//! Transport layer abstraction for HTTP communication.
//!
//! The request handler builds and signs an [`HttpRequest`] and hands it to a
//! [`Transport`]. The default implementation uses reqwest; tests substitute
//! [`MockTransport`](crate::mocks::MockTransport).

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::request::HttpRequest;
use super::response::HttpResponse;
use crate::error::{SesError, SesResult};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "SimpleEmailService/rust";

/// A request that failed below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct TransportFailure {
    /// Short failure class such as `connect`, `timeout` or `body`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

impl TransportFailure {
    /// Create a failure.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(e: reqwest::Error) -> Self {
        let code = if e.is_timeout() {
            "timeout"
        } else if e.is_connect() {
            "connect"
        } else if e.is_redirect() {
            "redirect"
        } else if e.is_body() || e.is_decode() {
            "body"
        } else if e.is_builder() {
            "request"
        } else {
            "network"
        };
        Self::new(code, e.to_string())
    }
}

/// Trait for HTTP transport implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a signed request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportFailure`] when no HTTP response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

/// TLS and client settings for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Verify that the certificate matches the host.
    pub verify_host: bool,
    /// Verify the certificate chain.
    pub verify_peer: bool,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Overall request timeout; none by default.
    pub timeout: Option<Duration>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            verify_host: true,
            verify_peer: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

/// Reqwest-based HTTP transport implementation.
///
/// One instance owns one `reqwest::Client`, and with it one connection pool,
/// so keeping the transport alive across calls reuses connections.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport from options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_aws_ses_query::http::{ReqwestTransport, TransportOptions};
    ///
    /// let transport = ReqwestTransport::new(&TransportOptions::default()).unwrap();
    /// ```
    pub fn new(options: &TransportOptions) -> SesResult<Self> {
        let mut builder = Client::builder()
            .user_agent(options.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        builder = apply_tls_options(builder, options);

        let client = builder.build().map_err(|e| SesError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying reqwest client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Whether the built client accepts certificates that fail verification.
#[cfg(feature = "native-tls")]
fn accepts_invalid_certs(options: &TransportOptions) -> bool {
    !options.verify_peer
}

/// Whether the built client accepts certificates that fail verification.
///
/// rustls cannot skip the hostname check alone, so turning off host
/// verification turns off certificate verification too.
#[cfg(not(feature = "native-tls"))]
fn accepts_invalid_certs(options: &TransportOptions) -> bool {
    !options.verify_peer || !options.verify_host
}

#[cfg(feature = "native-tls")]
fn apply_tls_options(
    builder: reqwest::ClientBuilder,
    options: &TransportOptions,
) -> reqwest::ClientBuilder {
    builder
        .danger_accept_invalid_certs(accepts_invalid_certs(options))
        .danger_accept_invalid_hostnames(!options.verify_host)
}

#[cfg(not(feature = "native-tls"))]
fn apply_tls_options(
    builder: reqwest::ClientBuilder,
    options: &TransportOptions,
) -> reqwest::ClientBuilder {
    if options.verify_peer && !options.verify_host {
        tracing::warn!("host verification disabled without native-tls; certificate verification is disabled as well");
    }
    builder.danger_accept_invalid_certs(accepts_invalid_certs(options))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        debug!(method = %request.method, url = %request.url, "Sending SES request");

        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(status, bytes = body.len(), "Received SES response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_transport_creation() {
        let transport = ReqwestTransport::new(&TransportOptions::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_transport_without_verification() {
        let options = TransportOptions {
            verify_host: false,
            verify_peer: false,
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        assert!(ReqwestTransport::new(&options).is_ok());
    }

    #[test]
    fn test_default_options() {
        let options = TransportOptions::default();
        assert!(options.verify_host);
        assert!(options.verify_peer);
        assert_eq!(options.user_agent, DEFAULT_USER_AGENT);
        assert!(options.timeout.is_none());
    }

    fn options(verify_host: bool, verify_peer: bool) -> TransportOptions {
        TransportOptions {
            verify_host,
            verify_peer,
            ..Default::default()
        }
    }

    #[cfg(not(feature = "native-tls"))]
    #[test]
    fn test_host_toggle_also_disables_cert_check_under_rustls() {
        assert!(!accepts_invalid_certs(&options(true, true)));
        assert!(accepts_invalid_certs(&options(false, true)));
        assert!(accepts_invalid_certs(&options(true, false)));
        assert!(accepts_invalid_certs(&options(false, false)));
    }

    #[cfg(feature = "native-tls")]
    #[test]
    fn test_host_and_peer_toggles_are_independent_under_native_tls() {
        assert!(!accepts_invalid_certs(&options(true, true)));
        assert!(!accepts_invalid_certs(&options(false, true)));
        assert!(accepts_invalid_certs(&options(true, false)));
    }

    #[test]
    fn test_failure_display() {
        let failure = TransportFailure::new("connect", "connection refused");
        assert_eq!(failure.to_string(), "connect: connection refused");
    }
}
