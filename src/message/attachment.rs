//! Message attachments.

use std::path::Path;

use super::MessageError;

/// Default MIME type for attachments.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// How a mail client should present an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Offered as a download.
    #[default]
    Attachment,
    /// Shown in the body, usually referenced by content ID.
    Inline,
}

impl Disposition {
    /// Value placed before the encoded filename in `Content-Disposition`.
    pub fn header_value(&self, name: &str) -> String {
        match self {
            Disposition::Attachment => "attachment".to_string(),
            Disposition::Inline => format!("inline; filename=\"{}\"", name),
        }
    }
}

/// A file attached to a message.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::message::{Attachment, Disposition};
///
/// let logo = Attachment::new("logo.png", vec![0x89, 0x50, 0x4e, 0x47])
///     .with_mime_type("image/png")
///     .with_content_id("<logo@example.com>")
///     .inline();
///
/// assert_eq!(logo.disposition(), Disposition::Inline);
/// assert_eq!(logo.mime_type(), "image/png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    name: String,
    mime_type: String,
    data: Vec<u8>,
    content_id: Option<String>,
    disposition: Disposition,
}

impl Attachment {
    /// Create an attachment of type `application/octet-stream`.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            data: data.into(),
            content_id: None,
            disposition: Disposition::Attachment,
        }
    }

    /// Read an attachment from disk, guessing its type from the path.
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, MessageError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| MessageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(name, data).with_mime_type(mime_type))
    }

    /// Download an attachment.
    pub async fn from_url(name: impl Into<String>, url: &str) -> Result<Self, MessageError> {
        let data = super::fetch(url).await?;
        Ok(Self::new(name, data))
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Set the `Content-ID`, e.g. `<logo@example.com>`.
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Set the disposition.
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Mark the attachment inline.
    pub fn inline(self) -> Self {
        self.with_disposition(Disposition::Inline)
    }

    /// File name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Content ID, if set and non-empty.
    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Disposition.
    pub fn disposition(&self) -> Disposition {
        self.disposition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let attachment = Attachment::new("report.bin", b"abc".to_vec());
        assert_eq!(attachment.mime_type(), DEFAULT_MIME_TYPE);
        assert_eq!(attachment.disposition(), Disposition::Attachment);
        assert_eq!(attachment.content_id(), None);
        assert_eq!(attachment.data(), b"abc");
    }

    #[test]
    fn test_disposition_header_value() {
        assert_eq!(Disposition::Attachment.header_value("a.pdf"), "attachment");
        assert_eq!(
            Disposition::Inline.header_value("logo.png"),
            "inline; filename=\"logo.png\""
        );
    }

    #[test]
    fn test_empty_content_id_is_ignored() {
        let attachment = Attachment::new("a", Vec::new()).with_content_id("");
        assert_eq!(attachment.content_id(), None);
    }

    #[test]
    fn test_from_file_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.4")
            .unwrap();

        let attachment = Attachment::from_file("report.pdf", &path).unwrap();
        assert_eq!(attachment.mime_type(), "application/pdf");
        assert_eq!(attachment.data(), b"%PDF-1.4");
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Attachment::from_file("missing", dir.path().join("missing.txt"));
        assert!(matches!(result, Err(MessageError::Io { .. })));
    }
}
