//! SES client facade.
//!
//! [`SesClient`] exposes the query API actions as async methods returning
//! typed results. Every call goes through a [`SesHttpClient`] request handler:
//! a fresh one per call by default, or a single retained one in bulk mode so
//! that its transport, and the connections it pools, are reused.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_aws_ses_query::{EmailMessage, SesClient, SesConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SesConfig::builder()
//!     .region("eu-west-1")
//!     .credentials("AKID", "SECRET")
//!     .build()?;
//! let mut client = SesClient::new(config);
//!
//! let mut message = EmailMessage::new()
//!     .set_from("sender@example.com")
//!     .add_to("recipient@example.com")
//!     .set_subject("Hello")
//!     .set_text("Email body");
//!
//! let response = client.send_email(&mut message).await?;
//! println!("Message ID: {}", response.message_id);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{Endpoint, SesConfig};
use crate::credentials::{AwsCredentials, StaticCredentialProvider};
use crate::error::{SesError, SesResult};
use crate::http::{ResponseEnvelope, SesHttpClient, Transport, SUCCESS_CODES};
use crate::message::EmailMessage;
use crate::signing::SignatureVersion;
use crate::types::{
    ListVerifiedEmailAddressesResponse, RequestIdResponse, SendEmailResponse, SendQuota,
    SendStatistics, SesAction,
};
use crate::xml::XmlElement;

/// Per-call options for [`SesClient::send_email_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Send through `SendRawEmail` even without attachments.
    pub use_raw_request: bool,
    /// Override the client's error trigger for this call.
    pub trigger_error: Option<bool>,
}

impl SendOptions {
    /// Options that force `SendRawEmail`.
    pub fn raw() -> Self {
        Self {
            use_raw_request: true,
            ..Self::default()
        }
    }

    /// Set the error trigger override.
    pub fn with_trigger_error(mut self, enabled: bool) -> Self {
        self.trigger_error = Some(enabled);
        self
    }
}

/// Client for the SES query API.
///
/// Calls take `&mut self`: one request is in flight per client. Use separate
/// clients for parallel sending.
pub struct SesClient {
    config: SesConfig,
    transport: Option<Arc<dyn Transport>>,
    request_handler: Option<SesHttpClient>,
}

impl SesClient {
    /// Create a client that sends over reqwest.
    pub fn new(config: SesConfig) -> Self {
        Self {
            config,
            transport: None,
            request_handler: None,
        }
    }

    /// Create a client that sends through the given transport.
    pub fn with_transport(config: SesConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Some(transport),
            ..Self::new(config)
        }
    }

    /// Create a client from environment variables. See [`SesConfig::from_env`].
    pub fn from_env() -> SesResult<Self> {
        Ok(Self::new(SesConfig::from_env()?))
    }

    /// Client configuration.
    pub fn config(&self) -> &SesConfig {
        &self.config
    }

    /// Replace the credentials with a fixed key pair.
    pub fn set_auth(&mut self, access_key: &str, secret_key: &str) -> &mut Self {
        self.config.credentials_provider = Some(Arc::new(StaticCredentialProvider::new(
            AwsCredentials::new(access_key, secret_key),
        )));
        self
    }

    /// Access key ID of the configured credentials, when known without a lookup.
    pub fn access_key(&self) -> Option<String> {
        self.config
            .credentials_provider
            .as_ref()
            .and_then(|provider| provider.access_key_id())
    }

    /// Endpoint host.
    pub fn host(&self) -> &str {
        self.config.host()
    }

    /// Change the endpoint host.
    pub fn set_host(&mut self, endpoint: impl Into<Endpoint>) -> &mut Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Whether certificate host names are verified.
    pub fn verify_host(&self) -> bool {
        self.config.verify_host
    }

    /// Toggle certificate host name verification.
    pub fn set_verify_host(&mut self, enabled: bool) -> &mut Self {
        self.config.verify_host = enabled;
        self.request_handler = None;
        self
    }

    /// Whether certificate chains are verified.
    pub fn verify_peer(&self) -> bool {
        self.config.verify_peer
    }

    /// Toggle certificate chain verification.
    pub fn set_verify_peer(&mut self, enabled: bool) -> &mut Self {
        self.config.verify_peer = enabled;
        self.request_handler = None;
        self
    }

    /// Whether a request handler is retained across calls.
    pub fn bulk_mode(&self) -> bool {
        self.config.bulk_mode
    }

    /// Toggle bulk mode. Turning it off drops the retained handler.
    pub fn set_bulk_mode(&mut self, enabled: bool) -> &mut Self {
        self.config.bulk_mode = enabled;
        if !enabled {
            self.request_handler = None;
        }
        self
    }

    /// Change the signature version.
    pub fn set_signature_version(&mut self, version: SignatureVersion) -> &mut Self {
        self.config.signature_version = version;
        self
    }

    /// Toggle warning lines for failed calls.
    pub fn set_trigger_errors(&mut self, enabled: bool) -> &mut Self {
        self.config.trigger_errors = enabled;
        self
    }

    /// Whether a request handler is currently retained.
    pub fn has_retained_handler(&self) -> bool {
        self.request_handler.is_some()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Send a verification email to an address.
    pub async fn verify_email_address(&mut self, email: &str) -> SesResult<RequestIdResponse> {
        let action = SesAction::VerifyEmailAddress;
        let mut handler = self.take_handler(action);
        handler.set_parameter("EmailAddress", email);

        let doc = self.dispatch("verify_email_address", handler, None).await?;
        RequestIdResponse::from_xml(&doc)
    }

    /// List verified sender addresses.
    pub async fn list_verified_email_addresses(
        &mut self,
    ) -> SesResult<ListVerifiedEmailAddressesResponse> {
        let handler = self.take_handler(SesAction::ListVerifiedEmailAddresses);

        let doc = self
            .dispatch("list_verified_email_addresses", handler, None)
            .await?;
        ListVerifiedEmailAddressesResponse::from_xml(&doc)
    }

    /// Remove a verified sender address.
    pub async fn delete_verified_email_address(
        &mut self,
        email: &str,
    ) -> SesResult<RequestIdResponse> {
        let mut handler = self.take_handler(SesAction::DeleteVerifiedEmailAddress);
        handler.set_parameter("EmailAddress", email);

        let doc = self
            .dispatch("delete_verified_email_address", handler, None)
            .await?;
        RequestIdResponse::from_xml(&doc)
    }

    /// Read sending limits.
    pub async fn get_send_quota(&mut self) -> SesResult<SendQuota> {
        let handler = self.take_handler(SesAction::GetSendQuota);

        let doc = self.dispatch("get_send_quota", handler, None).await?;
        SendQuota::from_xml(&doc)
    }

    /// Read sending activity for the last two weeks.
    pub async fn get_send_statistics(&mut self) -> SesResult<SendStatistics> {
        let handler = self.take_handler(SesAction::GetSendStatistics);

        let doc = self.dispatch("get_send_statistics", handler, None).await?;
        SendStatistics::from_xml(&doc)
    }

    /// Send a message with default options.
    pub async fn send_email(&mut self, message: &mut EmailMessage) -> SesResult<SendEmailResponse> {
        self.send_email_with(message, SendOptions::default()).await
    }

    /// Send a message.
    ///
    /// The message is validated first; an invalid message fails with
    /// [`SesError::Validation`] without any request. Messages with
    /// attachments, or sent with [`SendOptions::use_raw_request`], go through
    /// `SendRawEmail`; all others through `SendEmail`.
    pub async fn send_email_with(
        &mut self,
        message: &mut EmailMessage,
        options: SendOptions,
    ) -> SesResult<SendEmailResponse> {
        if let Err(e) = message.check() {
            let error = SesError::Validation {
                message: format!("Message failed validation: {}", e),
            };
            self.trigger_error("send_email", &error, options.trigger_error);
            return Err(error);
        }

        let action = if message.has_attachments() || options.use_raw_request {
            SesAction::SendRawEmail
        } else {
            SesAction::SendEmail
        };

        let mut handler = self.take_handler(action);
        match action {
            SesAction::SendRawEmail => {
                handler.set_parameter("RawMessage.Data", message.raw_message(true));
            }
            _ => set_simple_parameters(&mut handler, message),
        }

        let doc = self
            .dispatch("send_email", handler, options.trigger_error)
            .await?;
        SendEmailResponse::from_xml(&doc, action)
    }

    // =========================================================================
    // Request handling
    // =========================================================================

    fn take_handler(&mut self, action: SesAction) -> SesHttpClient {
        let verb = action.http_method();
        let mut handler = match self.request_handler.take() {
            Some(mut handler) if self.config.bulk_mode => {
                handler.set_verb(verb).clear_parameters();
                handler
            }
            _ => match &self.transport {
                Some(transport) => SesHttpClient::with_transport(verb, Arc::clone(transport)),
                None => SesHttpClient::new(verb),
            },
        };
        handler.set_parameter("Action", action.as_str());
        handler
    }

    fn return_handler(&mut self, handler: SesHttpClient) {
        if self.config.bulk_mode {
            self.request_handler = Some(handler);
        }
    }

    async fn dispatch(
        &mut self,
        operation: &str,
        mut handler: SesHttpClient,
        trigger: Option<bool>,
    ) -> SesResult<XmlElement> {
        let result = handler.get_response(&self.config).await;
        self.return_handler(handler);

        let outcome = result.and_then(interpret);
        if let Err(error) = &outcome {
            self.trigger_error(operation, error, trigger);
        }
        outcome
    }

    fn trigger_error(&self, operation: &str, error: &SesError, trigger: Option<bool>) {
        if trigger.unwrap_or(self.config.trigger_errors) {
            warn!("SesClient::{}(): {}", operation, error);
        } else {
            debug!(operation, error = %error, "SES call failed");
        }
    }
}

fn interpret(envelope: ResponseEnvelope) -> SesResult<XmlElement> {
    if let Some(info) = envelope.error {
        return Err(info.into());
    }
    if !SUCCESS_CODES.contains(&envelope.status) {
        return Err(SesError::UnexpectedStatus {
            status: envelope.status,
        });
    }
    Ok(envelope.body.unwrap_or_default())
}

fn set_simple_parameters(handler: &mut SesHttpClient, message: &EmailMessage) {
    let lists = [
        ("Destination.ToAddresses", message.to()),
        ("Destination.CcAddresses", message.cc()),
        ("Destination.BccAddresses", message.bcc()),
        ("ReplyToAddresses", message.reply_to()),
    ];
    for (prefix, addresses) in lists {
        for (i, address) in addresses.iter().enumerate() {
            handler.set_parameter(
                format!("{}.member.{}", prefix, i + 1),
                message.encode_recipient(address),
            );
        }
    }

    handler.set_parameter("Source", message.encode_recipient(message.from().unwrap_or_default()));
    if let Some(return_path) = message.return_path() {
        handler.set_parameter("ReturnPath", return_path);
    }

    let parts = [
        ("Message.Subject", message.subject(), message.subject_charset()),
        ("Message.Body.Text", message.text(), message.text_charset()),
        ("Message.Body.Html", message.html(), message.html_charset()),
    ];
    for (prefix, data, charset) in parts {
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            continue;
        };
        handler.set_parameter(format!("{}.Data", prefix), data);
        if !charset.is_empty() {
            handler.set_parameter(format!("{}.Charset", prefix), charset);
        }
    }

    if let Some(set) = message.configuration_set() {
        handler.set_parameter("ConfigurationSetName", set);
    }
    for (i, tag) in message.message_tags().iter().enumerate() {
        handler.set_parameter(format!("Tags.member.{}.Name", i + 1), tag.name.as_str());
        handler.set_parameter(format!("Tags.member.{}.Value", i + 1), tag.value.as_str());
    }
}

impl fmt::Debug for SesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SesClient")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .field("retained_handler", &self.request_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::mocks::{MockResponse, MockTransport};

    fn config() -> SesConfig {
        SesConfig::builder()
            .credentials("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
            .build()
            .unwrap()
    }

    fn client(responses: Vec<MockResponse>) -> (SesClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::with_responses(responses));
        let client = SesClient::with_transport(config(), transport.clone());
        (client, transport)
    }

    fn message() -> EmailMessage {
        EmailMessage::new()
            .set_from("Sender <sender@example.com>")
            .add_to("to@example.com")
            .set_subject("Hi")
            .set_text("Body")
    }

    #[tokio::test]
    async fn test_simple_send_parameters() {
        let (mut client, transport) = client(vec![MockResponse::ok_with_body(
            "<SendEmailResponse><SendEmailResult><MessageId>m-1</MessageId></SendEmailResult>\
             <ResponseMetadata><RequestId>r-1</RequestId></ResponseMetadata></SendEmailResponse>",
        )]);

        let mut msg = message()
            .add_cc("cc@example.com")
            .add_reply_to("reply@example.com")
            .set_return_path("bounce@example.com")
            .set_configuration_set("marketing")
            .set_message_tag("campaign", "spring");

        let response = client.send_email(&mut msg).await.unwrap();
        assert_eq!(response.message_id, "m-1");
        assert_eq!(response.request_id, "r-1");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::POST);
        let body = request.body_str().unwrap();
        for expected in [
            "Action=SendEmail",
            "Destination.ToAddresses.member.1=to%40example.com",
            "Destination.CcAddresses.member.1=cc%40example.com",
            "ReplyToAddresses.member.1=reply%40example.com",
            "ReturnPath=bounce%40example.com",
            "Source=%3D%3FUTF-8%3FB%3FU2VuZGVyIA%3D%3D%3F%3D%20%3Csender%40example.com%3E",
            "Message.Subject.Data=Hi",
            "Message.Subject.Charset=UTF-8",
            "Message.Body.Text.Data=Body",
            "Message.Body.Text.Charset=UTF-8",
            "ConfigurationSetName=marketing",
            "Tags.member.1.Name=campaign",
            "Tags.member.1.Value=spring",
        ] {
            assert!(body.contains(expected), "missing {} in {}", expected, body);
        }
        assert!(!body.contains("Message.Body.Html"));
        assert!(!body.contains("RawMessage.Data"));
    }

    #[tokio::test]
    async fn test_raw_send_when_requested() {
        let (mut client, transport) = client(vec![MockResponse::ok_with_body(
            "<SendRawEmailResponse><SendRawEmailResult><MessageId>m-2</MessageId>\
             </SendRawEmailResult></SendRawEmailResponse>",
        )]);

        let mut msg = message();
        let response = client
            .send_email_with(&mut msg, SendOptions::raw())
            .await
            .unwrap();
        assert_eq!(response.message_id, "m-2");

        let body = transport.last_request().unwrap().body_str().unwrap().to_string();
        assert!(body.contains("Action=SendRawEmail"));
        assert!(body.contains("RawMessage.Data="));
        assert!(!body.contains("Source="));
    }

    #[tokio::test]
    async fn test_invalid_message_sends_nothing() {
        let (mut client, transport) = client(vec![MockResponse::ok()]);
        let mut msg = message().set_subject("");

        let err = client.send_email(&mut msg).await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("subject"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_verbs_per_operation() {
        let (mut client, transport) = client(vec![
            MockResponse::ok_with_body("<R/>"),
            MockResponse::ok_with_body("<R/>"),
            MockResponse::ok_with_body("<R/>"),
            MockResponse::ok_with_body("<R/>"),
            MockResponse::ok_with_body("<R/>"),
        ]);

        client.verify_email_address("a@example.com").await.unwrap();
        client.list_verified_email_addresses().await.unwrap();
        client.delete_verified_email_address("a@example.com").await.unwrap();
        client.get_send_quota().await.unwrap();
        client.get_send_statistics().await.unwrap();

        let requests = transport.requests();
        let methods: Vec<HttpMethod> = requests.iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![
                HttpMethod::POST,
                HttpMethod::GET,
                HttpMethod::DELETE,
                HttpMethod::GET,
                HttpMethod::GET,
            ]
        );
        assert_eq!(
            requests[0].body_str(),
            Some("Action=VerifyEmailAddress&EmailAddress=a%40example.com")
        );
        assert!(requests[2]
            .url
            .ends_with("/?Action=DeleteVerifiedEmailAddress&EmailAddress=a%40example.com"));
        assert!(requests[3].url.ends_with("/?Action=GetSendQuota"));
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let (mut client, transport) = client(vec![
            MockResponse::error(500, ""),
            MockResponse::error(
                400,
                "<ErrorResponse><Error><Type>Sender</Type><Code>InvalidParameterValue</Code>\
                 <Message>bad</Message></Error><RequestId>r-9</RequestId></ErrorResponse>",
            ),
        ]);
        transport.queue(crate::mocks::MockOutcome::Failure(
            crate::http::TransportFailure::new("connect", "refused"),
        ));
        client.set_trigger_errors(false);

        let unexpected = client.get_send_quota().await.unwrap_err();
        assert!(matches!(unexpected, SesError::UnexpectedStatus { status: 500 }));

        let service = client.get_send_quota().await.unwrap_err();
        assert!(service.is_service());
        assert_eq!(service.error_code(), Some("InvalidParameterValue"));
        assert_eq!(service.request_id(), Some("r-9"));

        let transport_error = client.get_send_quota().await.unwrap_err();
        assert!(transport_error.is_transport());
        assert_eq!(transport_error.error_code(), Some("connect"));
    }

    #[tokio::test]
    async fn test_bulk_mode_retains_handler() {
        let (mut client, _transport) = client(vec![
            MockResponse::ok_with_body("<R/>"),
            MockResponse::ok_with_body("<R/>"),
        ]);

        client.get_send_quota().await.unwrap();
        assert!(!client.has_retained_handler());

        client.set_bulk_mode(true);
        client.get_send_quota().await.unwrap();
        assert!(client.has_retained_handler());

        client.set_verify_peer(false);
        assert!(!client.has_retained_handler());

        client.set_bulk_mode(false);
        assert!(!client.bulk_mode());
    }

    #[test]
    fn test_accessors() {
        let mut client = SesClient::new(config());
        assert_eq!(client.host(), "email.us-east-1.amazonaws.com");
        assert_eq!(client.access_key().as_deref(), Some("AKIDEXAMPLE"));

        client.set_auth("OTHER", "TOPSECRETVALUE").set_host(Endpoint::EU_WEST_1);
        assert_eq!(client.access_key().as_deref(), Some("OTHER"));
        assert_eq!(client.host(), "email.eu-west-1.amazonaws.com");
        assert!(client.verify_host());
        assert!(client.verify_peer());

        let debug = format!("{:?}", client);
        assert!(!debug.contains("TOPSECRETVALUE"));
    }
}
