//! SES endpoint hosts.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// An SES endpoint host such as `email.us-east-1.amazonaws.com`.
///
/// The first label names the service and the second the region; both feed
/// the V4 credential scope.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::config::Endpoint;
///
/// let endpoint = Endpoint::from_region("ap-south-1");
/// assert_eq!(endpoint.host(), "email.ap-south-1.amazonaws.com");
/// assert_eq!(endpoint.service(), Some("email"));
/// assert_eq!(endpoint.region(), Some("ap-south-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    host: Cow<'static, str>,
}

impl Endpoint {
    /// US East (N. Virginia).
    pub const US_EAST_1: Endpoint = Endpoint {
        host: Cow::Borrowed("email.us-east-1.amazonaws.com"),
    };

    /// US West (Oregon).
    pub const US_WEST_2: Endpoint = Endpoint {
        host: Cow::Borrowed("email.us-west-2.amazonaws.com"),
    };

    /// EU (Ireland).
    pub const EU_WEST_1: Endpoint = Endpoint {
        host: Cow::Borrowed("email.eu-west-1.amazonaws.com"),
    };

    /// Wrap an arbitrary host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Cow::Owned(host.into()),
        }
    }

    /// Standard SES host for a region.
    pub fn from_region(region: &str) -> Self {
        Self::new(format!("email.{}.amazonaws.com", region))
    }

    /// The host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// First dot label of the host.
    pub fn service(&self) -> Option<&str> {
        self.host.split('.').next().filter(|s| !s.is_empty())
    }

    /// Second dot label of the host.
    pub fn region(&self) -> Option<&str> {
        self.host.split('.').nth(1).filter(|s| !s.is_empty())
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::US_EAST_1
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

impl From<&str> for Endpoint {
    fn from(host: &str) -> Self {
        Self::new(host)
    }
}

impl From<String> for Endpoint {
    fn from(host: String) -> Self {
        Self::new(host)
    }
}
