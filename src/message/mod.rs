//! Email messages for the SES query API.
//!
//! [`EmailMessage`] is an owned builder: every mutator takes the message and
//! returns the updated one. It feeds both send paths:
//!
//! - `SendEmail`, from its recipients, subject and bodies
//! - `SendRawEmail`, from [`EmailMessage::raw_message`], a multipart MIME
//!   document covering attachments, custom headers and tags
//!
//! # Examples
//!
//! ```rust
//! use integrations_aws_ses_query::message::{Attachment, EmailMessage};
//!
//! let mut message = EmailMessage::new()
//!     .set_from("Sender <sender@example.com>")
//!     .add_to("recipient@example.com")
//!     .set_subject("Quarterly report")
//!     .set_text("See attached.")
//!     .add_attachment(Attachment::new("report.csv", b"a,b\n1,2\n".to_vec()).with_mime_type("text/csv"));
//!
//! assert!(message.validate());
//! let raw = message.raw_message(false);
//! assert!(raw.contains("Content-Transfer-Encoding: base64"));
//! ```

mod attachment;
pub mod mime;

pub use attachment::{Attachment, Disposition, DEFAULT_MIME_TYPE};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use thiserror::Error;

/// Charset used for headers and bodies unless overridden.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Errors raised while loading or checking message content.
#[derive(Debug, Error)]
pub enum MessageError {
    /// A local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A remote resource could not be fetched.
    #[error("Failed to fetch {url}: {message}")]
    Fetch {
        /// Resource URL.
        url: String,
        /// Failure description.
        message: String,
    },

    /// A field required for sending is empty.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name.
        field: String,
    },
}

impl MessageError {
    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        MessageError::MissingField {
            field: field.into(),
        }
    }
}

/// A message tag, sent as `X-SES-MESSAGE-TAGS` or `Tags.member.N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTag {
    /// Tag name.
    pub name: String,
    /// Tag value.
    pub value: String,
}

/// An email message.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Vec<String>,
    recipients_charset: String,
    from: Option<String>,
    return_path: Option<String>,
    subject: Option<String>,
    subject_charset: String,
    text: Option<String>,
    text_charset: String,
    html: Option<String>,
    html_charset: String,
    attachment_charset: String,
    attachments: Vec<Attachment>,
    custom_headers: Vec<String>,
    configuration_set: Option<String>,
    message_tags: Vec<MessageTag>,
    raw_message: Option<String>,
    is_clean: bool,
}

impl Default for EmailMessage {
    fn default() -> Self {
        Self {
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: Vec::new(),
            recipients_charset: DEFAULT_CHARSET.to_string(),
            from: None,
            return_path: None,
            subject: None,
            subject_charset: DEFAULT_CHARSET.to_string(),
            text: None,
            text_charset: DEFAULT_CHARSET.to_string(),
            html: None,
            html_charset: DEFAULT_CHARSET.to_string(),
            attachment_charset: DEFAULT_CHARSET.to_string(),
            attachments: Vec::new(),
            custom_headers: Vec::new(),
            configuration_set: None,
            message_tags: Vec::new(),
            raw_message: None,
            is_clean: false,
        }
    }
}

fn push_unique(list: &mut Vec<String>, address: String) {
    if !list.contains(&address) {
        list.push(address);
    }
}

impl EmailMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    fn touched(mut self) -> Self {
        self.is_clean = false;
        self
    }

    // Recipients

    /// Add a `To` recipient. Duplicates are ignored.
    pub fn add_to(mut self, address: impl Into<String>) -> Self {
        push_unique(&mut self.to, address.into());
        self.touched()
    }

    /// Add several `To` recipients.
    pub fn add_to_many<I, S>(self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        addresses.into_iter().fold(self, |m, a| m.add_to(a))
    }

    /// Replace the `To` recipients.
    pub fn set_to<I, S>(self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clear_to().add_to_many(addresses)
    }

    /// Remove every `To` recipient.
    pub fn clear_to(mut self) -> Self {
        self.to.clear();
        self.touched()
    }

    /// Add a `CC` recipient. Duplicates are ignored.
    pub fn add_cc(mut self, address: impl Into<String>) -> Self {
        push_unique(&mut self.cc, address.into());
        self.touched()
    }

    /// Add several `CC` recipients.
    pub fn add_cc_many<I, S>(self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        addresses.into_iter().fold(self, |m, a| m.add_cc(a))
    }

    /// Remove every `CC` recipient.
    pub fn clear_cc(mut self) -> Self {
        self.cc.clear();
        self.touched()
    }

    /// Add a `BCC` recipient. Duplicates are ignored.
    pub fn add_bcc(mut self, address: impl Into<String>) -> Self {
        push_unique(&mut self.bcc, address.into());
        self.touched()
    }

    /// Add several `BCC` recipients.
    pub fn add_bcc_many<I, S>(self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        addresses.into_iter().fold(self, |m, a| m.add_bcc(a))
    }

    /// Remove every `BCC` recipient.
    pub fn clear_bcc(mut self) -> Self {
        self.bcc.clear();
        self.touched()
    }

    /// Add a `Reply-To` address. Duplicates are ignored.
    pub fn add_reply_to(mut self, address: impl Into<String>) -> Self {
        push_unique(&mut self.reply_to, address.into());
        self.touched()
    }

    /// Add several `Reply-To` addresses.
    pub fn add_reply_to_many<I, S>(self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        addresses.into_iter().fold(self, |m, a| m.add_reply_to(a))
    }

    /// Remove every `Reply-To` address.
    pub fn clear_reply_to(mut self) -> Self {
        self.reply_to.clear();
        self.touched()
    }

    /// Remove all recipients and reply-to addresses.
    pub fn clear_recipients(self) -> Self {
        self.clear_to().clear_cc().clear_bcc().clear_reply_to()
    }

    /// Charset used to encode display names.
    pub fn set_recipients_charset(mut self, charset: impl Into<String>) -> Self {
        self.recipients_charset = charset.into();
        self.touched()
    }

    // Envelope

    /// Set the sender.
    pub fn set_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self.touched()
    }

    /// Set the bounce address.
    pub fn set_return_path(mut self, return_path: impl Into<String>) -> Self {
        self.return_path = Some(return_path.into());
        self.touched()
    }

    /// Set the subject.
    pub fn set_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self.touched()
    }

    /// Set the subject charset.
    pub fn set_subject_charset(mut self, charset: impl Into<String>) -> Self {
        self.subject_charset = charset.into();
        self.touched()
    }

    // Bodies

    /// Set the plain text body.
    pub fn set_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self.touched()
    }

    /// Set the HTML body.
    pub fn set_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self.touched()
    }

    /// Set both bodies at once; `None` clears the HTML body.
    pub fn set_message_from_string(mut self, text: impl Into<String>, html: Option<String>) -> Self {
        self.text = Some(text.into());
        self.html = html;
        self.touched()
    }

    /// Load bodies from files. An unreadable path leaves that body empty.
    pub fn set_message_from_file(mut self, text_path: impl AsRef<Path>, html_path: Option<&Path>) -> Self {
        self.text = std::fs::read_to_string(text_path).ok();
        self.html = html_path.and_then(|path| std::fs::read_to_string(path).ok());
        self.touched()
    }

    /// Download bodies. `None` clears that body.
    pub async fn set_message_from_url(
        mut self,
        text_url: Option<&str>,
        html_url: Option<&str>,
    ) -> Result<Self, MessageError> {
        self.text = match text_url {
            Some(url) => Some(fetch_text(url).await?),
            None => None,
        };
        self.html = match html_url {
            Some(url) => Some(fetch_text(url).await?),
            None => None,
        };
        Ok(self.touched())
    }

    /// Set the text and HTML charsets. An empty charset is omitted from the output.
    pub fn set_message_charset(
        self,
        text_charset: impl Into<String>,
        html_charset: impl Into<String>,
    ) -> Self {
        self.set_text_charset(text_charset).set_html_charset(html_charset)
    }

    /// Set the text body charset.
    pub fn set_text_charset(mut self, charset: impl Into<String>) -> Self {
        self.text_charset = charset.into();
        self.touched()
    }

    /// Set the HTML body charset.
    pub fn set_html_charset(mut self, charset: impl Into<String>) -> Self {
        self.html_charset = charset.into();
        self.touched()
    }

    // Headers and tags

    /// Add a raw header line, e.g. `X-Priority: 1`.
    pub fn add_custom_header(mut self, header: impl Into<String>) -> Self {
        self.custom_headers.push(header.into());
        self.touched()
    }

    /// Set the configuration set.
    pub fn set_configuration_set(mut self, name: impl Into<String>) -> Self {
        self.configuration_set = Some(name.into());
        self.touched()
    }

    /// Remove the configuration set.
    pub fn clear_configuration_set(mut self) -> Self {
        self.configuration_set = None;
        self.touched()
    }

    /// Set a tag, replacing the value of an existing tag with the same name.
    pub fn set_message_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.message_tags.iter_mut().find(|t| t.name == name) {
            Some(tag) => tag.value = value,
            None => self.message_tags.push(MessageTag { name, value }),
        }
        self.touched()
    }

    /// Merge tags into the existing ones.
    pub fn set_message_tags<I, K, V>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        tags.into_iter()
            .fold(self, |m, (name, value)| m.set_message_tag(name, value))
    }

    /// Remove a tag.
    pub fn remove_message_tag(mut self, name: &str) -> Self {
        self.message_tags.retain(|t| t.name != name);
        self.touched()
    }

    /// Remove every tag.
    pub fn remove_message_tags(mut self) -> Self {
        self.message_tags.clear();
        self.touched()
    }

    // Attachments

    /// Add an attachment. An attachment with the same name is replaced in place.
    pub fn add_attachment(mut self, attachment: Attachment) -> Self {
        match self
            .attachments
            .iter_mut()
            .find(|a| a.name() == attachment.name())
        {
            Some(existing) => *existing = attachment,
            None => self.attachments.push(attachment),
        }
        self.touched()
    }

    /// Add an attachment from bytes.
    pub fn add_attachment_from_data(
        self,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
    ) -> Self {
        self.add_attachment(Attachment::new(name, data).with_mime_type(mime_type))
    }

    /// Attach a file from disk. On failure the message is left unchanged.
    pub fn add_attachment_from_file(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self, MessageError> {
        let attachment = Attachment::from_file(name, path)?;
        *self = std::mem::take(self).add_attachment(attachment);
        Ok(self)
    }

    /// Attach a downloaded resource. On failure the message is left unchanged.
    pub async fn add_attachment_from_url(
        &mut self,
        name: impl Into<String>,
        url: &str,
    ) -> Result<&mut Self, MessageError> {
        let attachment = Attachment::from_url(name, url).await?;
        *self = std::mem::take(self).add_attachment(attachment);
        Ok(self)
    }

    // Accessors

    /// `To` recipients.
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// `CC` recipients.
    pub fn cc(&self) -> &[String] {
        &self.cc
    }

    /// `BCC` recipients.
    pub fn bcc(&self) -> &[String] {
        &self.bcc
    }

    /// `Reply-To` addresses.
    pub fn reply_to(&self) -> &[String] {
        &self.reply_to
    }

    /// Charset used for display names.
    pub fn recipients_charset(&self) -> &str {
        &self.recipients_charset
    }

    /// Sender.
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// Bounce address.
    pub fn return_path(&self) -> Option<&str> {
        self.return_path.as_deref()
    }

    /// Subject.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Subject charset.
    pub fn subject_charset(&self) -> &str {
        &self.subject_charset
    }

    /// Plain text body.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text body charset.
    pub fn text_charset(&self) -> &str {
        &self.text_charset
    }

    /// HTML body.
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// HTML body charset.
    pub fn html_charset(&self) -> &str {
        &self.html_charset
    }

    /// Charset used to encode attachment names.
    pub fn attachment_charset(&self) -> &str {
        &self.attachment_charset
    }

    /// Set the charset used to encode attachment names.
    pub fn set_attachment_charset(mut self, charset: impl Into<String>) -> Self {
        self.attachment_charset = charset.into();
        self.touched()
    }

    /// Attachments in insertion order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Whether any attachment is present.
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Whether any attachment is inline.
    pub fn has_inline_attachments(&self) -> bool {
        self.attachments
            .iter()
            .any(|a| a.disposition() != Disposition::Attachment)
    }

    /// Raw header lines.
    pub fn custom_headers(&self) -> &[String] {
        &self.custom_headers
    }

    /// Configuration set.
    pub fn configuration_set(&self) -> Option<&str> {
        self.configuration_set.as_deref()
    }

    /// Tags in insertion order.
    pub fn message_tags(&self) -> &[MessageTag] {
        &self.message_tags
    }

    /// Value of a tag.
    pub fn message_tag(&self, name: &str) -> Option<&str> {
        self.message_tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value.as_str())
    }

    // Encoding

    /// Encode a `Name <address>` recipient as an RFC 2047 word plus address.
    ///
    /// Addresses without angle brackets are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_query::message::EmailMessage;
    ///
    /// let message = EmailMessage::new();
    /// assert_eq!(
    ///     message.encode_recipient("Jane <jane@example.com>"),
    ///     "=?UTF-8?B?SmFuZSA=?= <jane@example.com>"
    /// );
    /// assert_eq!(message.encode_recipient("jane@example.com"), "jane@example.com");
    /// ```
    pub fn encode_recipient(&self, recipient: &str) -> String {
        let Some(close) = recipient.rfind('>') else {
            return recipient.to_string();
        };
        let Some(open) = recipient[..close].rfind('<') else {
            return recipient.to_string();
        };
        format!(
            "=?{}?B?{}?= <{}>",
            self.recipients_charset,
            STANDARD.encode(&recipient[..open]),
            &recipient[open + 1..close]
        )
    }

    /// Encode a list of recipients, joined with `, `.
    pub fn encode_recipients(&self, recipients: &[String]) -> String {
        recipients
            .iter()
            .map(|r| self.encode_recipient(r))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The message as a raw MIME document.
    ///
    /// With `encode` the document is base64 encoded and cached until the next
    /// mutation; without it a fresh plain document is built each time.
    pub fn raw_message(&mut self, encode: bool) -> String {
        if encode && self.is_clean {
            if let Some(cached) = &self.raw_message {
                return cached.clone();
            }
        }

        let raw = mime::render(self, &mime::new_boundary());
        if !encode {
            return raw;
        }

        let encoded = STANDARD.encode(raw);
        self.raw_message = Some(encoded.clone());
        self.is_clean = true;
        encoded
    }

    // Validation

    /// Whether the message has what SES needs to send it.
    ///
    /// Requires a recipient in `To`, `CC` or `BCC`, a sender, a subject, and
    /// a text or HTML body.
    pub fn validate(&self) -> bool {
        self.check().is_ok()
    }

    /// Like [`validate`](Self::validate), naming the first missing field.
    pub fn check(&self) -> Result<(), MessageError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(MessageError::missing_field("recipients"));
        }
        if is_blank(&self.from) {
            return Err(MessageError::missing_field("from"));
        }
        if is_blank(&self.subject) {
            return Err(MessageError::missing_field("subject"));
        }
        if is_blank(&self.text) && is_blank(&self.html) {
            return Err(MessageError::missing_field("body"));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

pub(crate) async fn fetch(url: &str) -> Result<Vec<u8>, MessageError> {
    let failed = |e: reqwest::Error| MessageError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    };
    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(failed)?;
    let bytes = response.bytes().await.map_err(failed)?;
    Ok(bytes.to_vec())
}

async fn fetch_text(url: &str) -> Result<String, MessageError> {
    let bytes = fetch(url).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
