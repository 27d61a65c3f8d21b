//! Signing error types for the SES query API.
//!
//! Signing is pure, so every failure here comes from bad input: missing key
//! material, an endpoint host the V4 scope cannot be derived from, or a header
//! value that cannot be represented.

use thiserror::Error;

/// Errors that can occur while computing SES authentication headers.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Key material was absent or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_query::signing::SigningError;
    ///
    /// let error = SigningError::MissingCredentials {
    ///     message: "Secret access key is empty".to_string(),
    /// };
    /// assert_eq!(
    ///     error.to_string(),
    ///     "Missing credentials: Secret access key is empty"
    /// );
    /// ```
    #[error("Missing credentials: {message}")]
    MissingCredentials {
        /// What was missing.
        message: String,
    },

    /// The endpoint host does not carry a service and a region label.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_query::signing::SigningError;
    ///
    /// let error = SigningError::InvalidHost {
    ///     host: "localhost".to_string(),
    /// };
    /// assert_eq!(
    ///     error.to_string(),
    ///     "Invalid endpoint host for signing: localhost"
    /// );
    /// ```
    #[error("Invalid endpoint host for signing: {host}")]
    InvalidHost {
        /// The offending host.
        host: String,
    },

    /// A computed value could not be placed into a header.
    #[error("Invalid header value for {header}: {message}")]
    InvalidHeader {
        /// Header name.
        header: String,
        /// Details about the failure.
        message: String,
    },

    /// The signing operation failed.
    #[error("Signing failed: {message}")]
    SigningFailed {
        /// Details about the signing failure.
        message: String,
    },
}
