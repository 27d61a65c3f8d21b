//! AWS SES Query API Integration Module
//!
//! Async client for the Amazon Simple Email Service query API.
//!
//! # Features
//!
//! - **Signing**: AWS Signature Version 4, or the legacy `AWS3-HTTPS` scheme
//! - **Request handler**: deterministic parameter canonicalization, GET/POST/DELETE
//!   placement, and XML response parsing into a three-way error model
//! - **Bulk mode**: one retained request handler so connections are reused
//!   across many sends
//! - **Messages**: owned builder with attachments, inline parts, custom
//!   headers, tags and a raw multipart MIME renderer
//! - **Testing**: a [`mocks::MockTransport`] that records requests and replays
//!   canned responses
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_aws_ses_query::{EmailMessage, SesClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Endpoint and credentials from AWS_* variables
//!     let mut client = SesClient::from_env()?;
//!
//!     let mut message = EmailMessage::new()
//!         .set_from("sender@example.com")
//!         .add_to("recipient@example.com")
//!         .set_subject("Hello from SES")
//!         .set_text("This is a test email.");
//!
//!     let response = client.send_email(&mut message).await?;
//!     println!("Message sent! ID: {}", response.message_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Bulk Sending
//!
//! ```rust,no_run
//! use integrations_aws_ses_query::{EmailMessage, SesClient, SesConfig};
//!
//! # async fn example(recipients: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = SesConfig::builder()
//!     .region("us-west-2")
//!     .credentials("AKID", "SECRET")
//!     .bulk_mode(true)
//!     .build()?;
//! let mut client = SesClient::new(config);
//!
//! for recipient in recipients {
//!     let mut message = EmailMessage::new()
//!         .set_from("news@example.com")
//!         .add_to(recipient)
//!         .set_subject("Newsletter")
//!         .set_html("<h1>News</h1>");
//!     client.send_email(&mut message).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use integrations_aws_ses_query::{SesClient, SesError};
//!
//! # async fn example(client: &mut SesClient) {
//! match client.get_send_quota().await {
//!     Ok(quota) => println!("{} of {} sent", quota.sent_last_24_hours, quota.max_24_hour_send),
//!     Err(SesError::Service { code, request_id, .. }) => {
//!         eprintln!("SES rejected the call: {} ({})", code, request_id);
//!     }
//!     Err(SesError::Transport { code, message }) => eprintln!("network: {} {}", code, message),
//!     Err(SesError::UnexpectedStatus { status }) => eprintln!("HTTP {}", status),
//!     Err(e) => eprintln!("{}", e),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod message;
pub mod mocks;
pub mod signing;
pub mod types;
pub mod xml;

pub use client::{SendOptions, SesClient};
pub use config::{ConfigError, Endpoint, SesConfig, SesConfigBuilder};
pub use credentials::{
    AwsCredentials, CredentialError, CredentialProvider, EnvironmentCredentialProvider,
    StaticCredentialProvider,
};
pub use error::{SesError, SesResult};
pub use http::{HttpMethod, SesHttpClient, Transport};
pub use message::{Attachment, Disposition, EmailMessage, MessageError, MessageTag};
pub use signing::{SignatureVersion, SigningError};
pub use types::{
    ListVerifiedEmailAddressesResponse, RequestIdResponse, SendDataPoint, SendEmailResponse,
    SendQuota, SendStatistics, SesAction,
};

/// Result type alias for SES operations.
pub type Result<T> = std::result::Result<T, SesError>;
