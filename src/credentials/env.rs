//! Environment variable credentials provider.

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use std::env;

/// Environment variable holding the access key ID.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Credentials provider that reads from environment variables.
///
/// By default it reads `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` each
/// time credentials are requested.
///
/// # Example
///
/// ```no_run
/// use integrations_aws_ses_query::credentials::{CredentialProvider, EnvironmentCredentialProvider};
///
/// # async {
/// let provider = EnvironmentCredentialProvider::new();
/// let credentials = provider.credentials().await?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # };
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentCredentialProvider {
    access_key_var: String,
    secret_key_var: String,
}

impl EnvironmentCredentialProvider {
    /// Create a provider reading the standard AWS variables.
    pub fn new() -> Self {
        Self::with_names(AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY)
    }

    /// Create a provider reading custom variable names.
    pub fn with_names(access_key_var: impl Into<String>, secret_key_var: impl Into<String>) -> Self {
        Self {
            access_key_var: access_key_var.into(),
            secret_key_var: secret_key_var.into(),
        }
    }

    fn read(&self, name: &str) -> Result<String, CredentialError> {
        let value = env::var(name).map_err(|_| CredentialError::Missing {
            message: format!("{} environment variable not set", name),
        })?;
        if value.is_empty() {
            return Err(CredentialError::Invalid {
                message: format!("{} is empty", name),
            });
        }
        Ok(value)
    }
}

impl Default for EnvironmentCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for EnvironmentCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        let access_key_id = self.read(&self.access_key_var)?;
        let secret_access_key = self.read(&self.secret_key_var)?;
        Ok(AwsCredentials::new(access_key_id, secret_access_key))
    }

    fn access_key_id(&self) -> Option<String> {
        env::var(&self.access_key_var).ok().filter(|v| !v.is_empty())
    }
}
