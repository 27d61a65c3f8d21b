//! Raw MIME rendering for `SendRawEmail`.
//!
//! Layout, with `\n` line endings:
//!
//! ```text
//! headers
//! MIME-Version: 1.0
//! Content-type: Multipart/Mixed; boundary="B"      (multipart/related with inline parts)
//!
//! --B
//! Content-type: Multipart/Alternative; boundary="alt-B"
//!
//! --alt-B            text part, then html part, each only when non-empty
//! ...
//! --alt-B--
//!
//! --B                one block per attachment
//! ...
//! --B--
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use uuid::Uuid;

use super::{Attachment, EmailMessage};

const BASE64_LINE: usize = 76;

/// Generate a fresh multipart boundary.
pub fn new_boundary() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Render a message as a raw MIME document.
pub fn render(message: &EmailMessage, boundary: &str) -> String {
    let mut raw = String::new();

    for header in message.custom_headers() {
        raw.push_str(header);
        raw.push('\n');
    }

    if !message.message_tags().is_empty() {
        let tags: Vec<String> = message
            .message_tags()
            .iter()
            .map(|tag| format!("{}={}", tag.name, tag.value))
            .collect();
        raw.push_str(&format!("X-SES-MESSAGE-TAGS: {}\n", tags.join(", ")));
    }

    if let Some(set) = message.configuration_set() {
        raw.push_str(&format!("X-SES-CONFIGURATION-SET: {}\n", set));
    }

    if !message.to().is_empty() {
        raw.push_str(&format!("To: {}\n", message.encode_recipients(message.to())));
    }
    raw.push_str(&format!(
        "From: {}\n",
        message.encode_recipient(message.from().unwrap_or_default())
    ));
    if !message.reply_to().is_empty() {
        raw.push_str(&format!(
            "Reply-To: {}\n",
            message.encode_recipients(message.reply_to())
        ));
    }
    if !message.cc().is_empty() {
        raw.push_str(&format!("CC: {}\n", message.encode_recipients(message.cc())));
    }
    if !message.bcc().is_empty() {
        raw.push_str(&format!("BCC: {}\n", message.encode_recipients(message.bcc())));
    }

    if let Some(subject) = message.subject().filter(|s| !s.is_empty()) {
        raw.push_str(&format!(
            "Subject: {}\n",
            encoded_word(message.subject_charset(), subject.as_bytes())
        ));
    }

    let top_type = if message.has_inline_attachments() {
        "multipart/related"
    } else {
        "Multipart/Mixed"
    };
    raw.push_str("MIME-Version: 1.0\n");
    raw.push_str(&format!(
        "Content-type: {}; boundary=\"{}\"\n",
        top_type, boundary
    ));
    raw.push_str(&format!("\n--{}\n", boundary));
    raw.push_str(&format!(
        "Content-type: Multipart/Alternative; boundary=\"alt-{}\"\n",
        boundary
    ));

    if let Some(text) = message.text().filter(|t| !t.is_empty()) {
        push_alternative(&mut raw, boundary, "text/plain", message.text_charset(), text);
    }
    if let Some(html) = message.html().filter(|h| !h.is_empty()) {
        push_alternative(&mut raw, boundary, "text/html", message.html_charset(), html);
    }
    raw.push_str(&format!("\n--alt-{}--\n", boundary));

    for attachment in message.attachments() {
        push_attachment(&mut raw, boundary, message.attachment_charset(), attachment);
    }

    raw.push_str(&format!("\n--{}--\n", boundary));
    raw
}

/// `=?charset?B?base64?=` encoded word.
pub fn encoded_word(charset: &str, bytes: &[u8]) -> String {
    format!("=?{}?B?{}?=", charset, STANDARD.encode(bytes))
}

/// Base64 wrapped at 76 characters, every line ending in `\n`.
pub fn wrap_base64(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    if encoded.is_empty() {
        return "\n".to_string();
    }
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE + 1);
    for chunk in encoded.as_bytes().chunks(BASE64_LINE) {
        // base64 output is ASCII, so byte chunks are valid UTF-8
        wrapped.push_str(&String::from_utf8_lossy(chunk));
        wrapped.push('\n');
    }
    wrapped
}

fn charset_suffix(charset: &str) -> String {
    if charset.is_empty() {
        String::new()
    } else {
        format!("; charset=\"{}\"", charset)
    }
}

fn push_alternative(raw: &mut String, boundary: &str, content_type: &str, charset: &str, body: &str) {
    raw.push_str(&format!("\n--alt-{}\n", boundary));
    raw.push_str(&format!(
        "Content-Type: {}{}\n\n",
        content_type,
        charset_suffix(charset)
    ));
    raw.push_str(body);
    raw.push('\n');
}

fn push_attachment(raw: &mut String, boundary: &str, charset: &str, attachment: &Attachment) {
    let name = encoded_word(charset, attachment.name().as_bytes());

    raw.push_str(&format!("\n--{}\n", boundary));
    raw.push_str(&format!(
        "Content-Type: {}; name=\"{}\";\n",
        attachment.mime_type(),
        name
    ));
    raw.push_str(&format!(
        "Content-Disposition: {}; filename=\"{}\";\n",
        attachment.disposition().header_value(attachment.name()),
        name
    ));
    if let Some(content_id) = attachment.content_id() {
        raw.push_str(&format!("Content-ID: {}\n", content_id));
    }
    raw.push_str("Content-Transfer-Encoding: base64\n");
    raw.push('\n');
    raw.push_str(&wrap_base64(attachment.data()));
    raw.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_unique() {
        let a = new_boundary();
        let b = new_boundary();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_encoded_word() {
        assert_eq!(encoded_word("UTF-8", b"Hello"), "=?UTF-8?B?SGVsbG8=?=");
    }

    #[test]
    fn test_wrap_base64() {
        let data = vec![0u8; 60];
        let wrapped = wrap_base64(&data);
        let lines: Vec<&str> = wrapped.split_terminator('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1].len(), 4);
        assert!(wrapped.ends_with('\n'));
        assert_eq!(wrap_base64(b""), "\n");
    }

    #[test]
    fn test_render_text_only_exact() {
        let message = EmailMessage::new()
            .add_to("to@example.com")
            .set_from("from@example.com")
            .set_subject("Hi")
            .set_text("Body");

        let raw = render(&message, "B");
        assert_eq!(
            raw,
            "To: to@example.com\n\
             From: from@example.com\n\
             Subject: =?UTF-8?B?SGk=?=\n\
             MIME-Version: 1.0\n\
             Content-type: Multipart/Mixed; boundary=\"B\"\n\
             \n--B\n\
             Content-type: Multipart/Alternative; boundary=\"alt-B\"\n\
             \n--alt-B\n\
             Content-Type: text/plain; charset=\"UTF-8\"\n\n\
             Body\n\
             \n--alt-B--\n\
             \n--B--\n"
        );
    }

    #[test]
    fn test_render_attachment_block_exact() {
        let message = EmailMessage::new()
            .add_to("to@example.com")
            .set_from("from@example.com")
            .set_subject("Hi")
            .set_text("Body")
            .add_attachment(Attachment::new("a.txt", b"hi".to_vec()).with_mime_type("text/plain"));

        let raw = render(&message, "B");
        assert!(raw.ends_with(
            "\n--alt-B--\n\
             \n--B\n\
             Content-Type: text/plain; name=\"=?UTF-8?B?YS50eHQ=?=\";\n\
             Content-Disposition: attachment; filename=\"=?UTF-8?B?YS50eHQ=?=\";\n\
             Content-Transfer-Encoding: base64\n\
             \naGk=\n\n\
             \n--B--\n"
        ));
    }

    #[test]
    fn test_render_headers_order_and_inline() {
        let message = EmailMessage::new()
            .add_custom_header("X-Priority: 1")
            .set_message_tag("campaign", "spring")
            .set_message_tag("team", "growth")
            .set_configuration_set("marketing")
            .add_to("to@example.com")
            .set_from("from@example.com")
            .add_reply_to("reply@example.com")
            .add_cc("cc@example.com")
            .add_bcc("bcc@example.com")
            .set_html("<p>x</p>")
            .set_html_charset("")
            .add_attachment(
                Attachment::new("logo.png", vec![1, 2, 3])
                    .with_mime_type("image/png")
                    .with_content_id("<logo>")
                    .inline(),
            );

        let raw = render(&message, "B");
        assert!(raw.starts_with(
            "X-Priority: 1\n\
             X-SES-MESSAGE-TAGS: campaign=spring, team=growth\n\
             X-SES-CONFIGURATION-SET: marketing\n\
             To: to@example.com\n\
             From: from@example.com\n\
             Reply-To: reply@example.com\n\
             CC: cc@example.com\n\
             BCC: bcc@example.com\n\
             MIME-Version: 1.0\n\
             Content-type: multipart/related; boundary=\"B\"\n"
        ));
        assert!(raw.contains("Content-Type: text/html\n\n<p>x</p>\n"));
        assert!(!raw.contains("text/plain"));
        assert!(raw.contains(
            "Content-Disposition: inline; filename=\"logo.png\"; filename=\"=?UTF-8?B?bG9nby5wbmc=?=\";\n\
             Content-ID: <logo>\n"
        ));
    }
}
