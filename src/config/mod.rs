//! Configuration module for the SES query client.
//!
//! - Endpoint host and an optional network URL override
//! - Credential provider
//! - Signature version
//! - TLS verification, bulk mode and error-trigger toggles
//! - User agent and timeout

use std::sync::Arc;
use std::time::Duration;

pub mod endpoint;
pub mod error;

pub use endpoint::Endpoint;
pub use error::ConfigError;

use crate::credentials::{
    AwsCredentials, CredentialError, CredentialProvider, EnvironmentCredentialProvider,
    StaticCredentialProvider,
};
use crate::http::{TransportOptions, DEFAULT_USER_AGENT};
use crate::signing::SignatureVersion;

/// Environment variable naming the endpoint host.
pub const AWS_SES_ENDPOINT: &str = "AWS_SES_ENDPOINT";

/// Configuration for the SES client.
#[derive(Clone)]
pub struct SesConfig {
    /// Endpoint host; also the host that is signed.
    pub endpoint: Endpoint,

    /// URL requests are sent to instead of `https://<host>`, e.g. a local emulator.
    pub endpoint_url: Option<String>,

    /// Credential provider; requests fail before sending when absent.
    pub credentials_provider: Option<Arc<dyn CredentialProvider>>,

    /// Signature scheme.
    pub signature_version: SignatureVersion,

    /// Verify that the server certificate matches the host.
    pub verify_host: bool,

    /// Verify the server certificate chain.
    pub verify_peer: bool,

    /// Keep one request handler, and its connections, across calls.
    pub bulk_mode: bool,

    /// Emit a warning line for every failed facade call.
    pub trigger_errors: bool,

    /// `User-Agent` header value.
    pub user_agent: String,

    /// Overall request timeout; none when unset.
    pub timeout: Option<Duration>,
}

impl SesConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_aws_ses_query::config::{Endpoint, SesConfig};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SesConfig::builder()
    ///     .endpoint(Endpoint::EU_WEST_1)
    ///     .credentials("access_key", "secret_key")
    ///     .build()?;
    /// assert_eq!(config.host(), "email.eu-west-1.amazonaws.com");
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> SesConfigBuilder {
        SesConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// - `AWS_SES_ENDPOINT` names the host; otherwise `AWS_REGION` or
    ///   `AWS_DEFAULT_REGION` select `email.<region>.amazonaws.com`; otherwise
    ///   us-east-1 is used
    /// - credentials come from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`
    ///   at request time
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_aws_ses_query::config::SesConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SesConfig::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = match non_empty_var(AWS_SES_ENDPOINT) {
            Some(host) => Endpoint::new(host),
            None => non_empty_var("AWS_REGION")
                .or_else(|| non_empty_var("AWS_DEFAULT_REGION"))
                .map(|region| Endpoint::from_region(&region))
                .unwrap_or_default(),
        };

        Self::builder()
            .endpoint(endpoint)
            .credentials_provider(EnvironmentCredentialProvider::new())
            .build()
    }

    /// Endpoint host.
    pub fn host(&self) -> &str {
        self.endpoint.host()
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.endpoint_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.endpoint.host()),
        }
    }

    /// Fetch credentials from the configured provider.
    pub async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        match &self.credentials_provider {
            Some(provider) => provider.credentials().await,
            None => Err(CredentialError::Missing {
                message: "no credentials configured".to_string(),
            }),
        }
    }

    /// Settings for building a reqwest transport.
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            verify_host: self.verify_host,
            verify_peer: self.verify_peer,
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
    }
}

impl std::fmt::Debug for SesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesConfig")
            .field("endpoint", &self.endpoint)
            .field("endpoint_url", &self.endpoint_url)
            .field("credentials_provider", &self.credentials_provider)
            .field("signature_version", &self.signature_version)
            .field("verify_host", &self.verify_host)
            .field("verify_peer", &self.verify_peer)
            .field("bulk_mode", &self.bulk_mode)
            .field("trigger_errors", &self.trigger_errors)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Builder for [`SesConfig`].
#[derive(Default)]
pub struct SesConfigBuilder {
    endpoint: Option<Endpoint>,
    endpoint_url: Option<String>,
    credentials_provider: Option<Arc<dyn CredentialProvider>>,
    signature_version: Option<SignatureVersion>,
    verify_host: Option<bool>,
    verify_peer: Option<bool>,
    bulk_mode: bool,
    trigger_errors: Option<bool>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl SesConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint. Defaults to [`Endpoint::US_EAST_1`].
    pub fn endpoint(mut self, endpoint: impl Into<Endpoint>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Use the standard endpoint for a region.
    pub fn region(self, region: &str) -> Self {
        self.endpoint(Endpoint::from_region(region))
    }

    /// Send requests to this URL instead of `https://<host>`.
    ///
    /// The configured host is still the one signed.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set a credential provider.
    pub fn credentials_provider(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.credentials_provider = Some(Arc::new(provider));
        self
    }

    /// Use fixed credentials.
    pub fn credentials(self, access_key: &str, secret_key: &str) -> Self {
        self.credentials_provider(StaticCredentialProvider::new(AwsCredentials::new(
            access_key, secret_key,
        )))
    }

    /// Set the signature version. Defaults to V4.
    pub fn signature_version(mut self, version: SignatureVersion) -> Self {
        self.signature_version = Some(version);
        self
    }

    /// Toggle certificate host name verification. Defaults to on.
    pub fn verify_host(mut self, enabled: bool) -> Self {
        self.verify_host = Some(enabled);
        self
    }

    /// Toggle certificate chain verification. Defaults to on.
    pub fn verify_peer(mut self, enabled: bool) -> Self {
        self.verify_peer = Some(enabled);
        self
    }

    /// Toggle bulk mode. Defaults to off.
    pub fn bulk_mode(mut self, enabled: bool) -> Self {
        self.bulk_mode = enabled;
        self
    }

    /// Toggle warning lines for failed calls. Defaults to on.
    pub fn trigger_errors(mut self, enabled: bool) -> Self {
        self.trigger_errors = Some(enabled);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set an overall request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint host is empty or the endpoint URL does not
    /// parse as an absolute `http`/`https` URL.
    pub fn build(self) -> Result<SesConfig, ConfigError> {
        let endpoint = self.endpoint.unwrap_or_default();
        if endpoint.host().is_empty() {
            return Err(ConfigError::MissingField {
                field: "endpoint".to_string(),
            });
        }

        if let Some(raw) = &self.endpoint_url {
            let parsed = url::Url::parse(raw).map_err(|e| ConfigError::Invalid {
                message: format!("endpoint_url '{}': {}", raw, e),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    message: format!("endpoint_url '{}' must use http or https", raw),
                });
            }
        }

        Ok(SesConfig {
            endpoint,
            endpoint_url: self.endpoint_url,
            credentials_provider: self.credentials_provider,
            signature_version: self.signature_version.unwrap_or_default(),
            verify_host: self.verify_host.unwrap_or(true),
            verify_peer: self.verify_peer.unwrap_or(true),
            bulk_mode: self.bulk_mode,
            trigger_errors: self.trigger_errors.unwrap_or(true),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: self.timeout,
        })
    }
}
