//! Error types for the SES query API client.
//!
//! Every failure is returned as a value. Three kinds come back from the
//! service round trip and are kept apart so callers can react differently:
//!
//! - [`SesError::Transport`]: no HTTP response was received
//! - [`SesError::Service`]: the service answered with an `<Error>` document
//! - [`SesError::UnexpectedStatus`]: any other status outside 200, 201, 202 and 204
//!
//! The rest cover local failures caught before anything is sent.
//!
//! # Examples
//!
//! ```rust
//! use integrations_aws_ses_query::error::SesError;
//!
//! fn describe(error: &SesError) {
//!     if let Some(code) = error.error_code() {
//!         println!("SES error code: {}", code);
//!     }
//!     if let Some(request_id) = error.request_id() {
//!         println!("Request ID: {}", request_id);
//!     }
//! }
//! ```

pub(crate) mod mapping;

use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::http::ErrorInfo;
use crate::message::MessageError;
use crate::signing::SigningError;

/// Result type used throughout the crate.
pub type SesResult<T> = Result<T, SesError>;

/// Top-level error type for the SES query API client.
#[derive(Debug, Error)]
pub enum SesError {
    /// The request did not complete at the network level.
    #[error("Transport error: {code} {message}")]
    Transport {
        /// Short failure class such as `connect` or `timeout`.
        code: String,
        /// Description of the failure.
        message: String,
    },

    /// The service returned an error document.
    #[error("{error_type} - {code}: {message}\nRequest Id: {request_id}")]
    Service {
        /// `Sender` or `Receiver`.
        error_type: String,
        /// Service error code.
        code: String,
        /// Service error message.
        message: String,
        /// Request ID reported with the error.
        request_id: String,
    },

    /// The service answered with a non-success status and no error document.
    #[error("Unexpected HTTP status: {status}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
    },

    /// Input was rejected before sending.
    #[error("Validation error: {message}")]
    Validation {
        /// What failed validation.
        message: String,
    },

    /// Client or transport configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credentials could not be obtained.
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// The request could not be signed.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Message content could not be loaded.
    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    /// A response document did not have the expected shape.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the problem.
        message: String,
    },
}

impl SesError {
    /// Service error code, or the transport failure class.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            SesError::Service { code, .. } | SesError::Transport { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Request ID of a service error.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SesError::Service { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Whether no HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, SesError::Transport { .. })
    }

    /// Whether the service returned an error document.
    pub fn is_service(&self) -> bool {
        matches!(self, SesError::Service { .. })
    }

    /// Whether the service returned an unexpected status.
    pub fn is_unexpected_status(&self) -> bool {
        matches!(self, SesError::UnexpectedStatus { .. })
    }

    /// Whether local validation failed.
    pub fn is_validation(&self) -> bool {
        matches!(self, SesError::Validation { .. })
    }
}

impl From<ErrorInfo> for SesError {
    fn from(info: ErrorInfo) -> Self {
        match info {
            ErrorInfo::Transport { code, message } => SesError::Transport { code, message },
            ErrorInfo::Service {
                error_type,
                code,
                message,
                request_id,
            } => SesError::Service {
                error_type,
                code,
                message,
                request_id,
            },
        }
    }
}

impl From<ConfigError> for SesError {
    fn from(e: ConfigError) -> Self {
        SesError::Configuration {
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<crate::xml::XmlError> for SesError {
    fn from(e: crate::xml::XmlError) -> Self {
        SesError::Serialization {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let error = SesError::Service {
            error_type: "Sender".to_string(),
            code: "MessageRejected".to_string(),
            message: "Address not verified".to_string(),
            request_id: "req-1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Sender - MessageRejected: Address not verified\nRequest Id: req-1"
        );
        assert_eq!(error.error_code(), Some("MessageRejected"));
        assert_eq!(error.request_id(), Some("req-1"));
        assert!(error.is_service());
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let transport = SesError::from(ErrorInfo::Transport {
            code: "connect".to_string(),
            message: "refused".to_string(),
        });
        let status = SesError::UnexpectedStatus { status: 500 };

        assert!(transport.is_transport() && !transport.is_service());
        assert!(status.is_unexpected_status() && !status.is_transport());
        assert_eq!(transport.to_string(), "Transport error: connect refused");
        assert_eq!(status.to_string(), "Unexpected HTTP status: 500");
        assert_eq!(status.error_code(), None);
    }

    #[test]
    fn test_from_config_error() {
        let error: SesError = ConfigError::MissingField {
            field: "endpoint".to_string(),
        }
        .into();
        assert!(matches!(error, SesError::Configuration { .. }));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SesError>();
    }
}
