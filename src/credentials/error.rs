//! Credential error types.

use thiserror::Error;

/// Errors raised while obtaining credentials.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// No credentials were configured or found.
    #[error("Missing credentials: {message}")]
    Missing {
        /// Where the credentials were expected.
        message: String,
    },

    /// Credentials were found but are unusable.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Why they are unusable.
        message: String,
    },
}
