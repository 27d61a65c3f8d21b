//! XML document tree for SES query responses.
//!
//! Query API responses are small, namespace-qualified documents such as
//!
//! ```text
//! <GetSendQuotaResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
//!   <GetSendQuotaResult>
//!     <Max24HourSend>200.0</Max24HourSend>
//!   </GetSendQuotaResult>
//!   <ResponseMetadata><RequestId>abc</RequestId></ResponseMetadata>
//! </GetSendQuotaResponse>
//! ```
//!
//! They are parsed into an [`XmlElement`] tree keyed by local names, which the
//! response types walk with [`XmlElement::path`] and friends.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Errors raised while parsing a response body.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The document is not well formed.
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed {
        /// Parser message.
        message: String,
        /// Byte offset where parsing stopped.
        position: u64,
    },

    /// The document had no root element.
    #[error("XML document has no root element")]
    Empty,
}

/// One element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an element with no text or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a document and return its root element.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_query::xml::XmlElement;
    ///
    /// let doc = XmlElement::parse(
    ///     "<R><ResponseMetadata><RequestId>abc</RequestId></ResponseMetadata></R>",
    /// )
    /// .unwrap();
    /// assert_eq!(doc.name(), "R");
    /// assert_eq!(doc.text_at(&["ResponseMetadata", "RequestId"]), "abc");
    /// ```
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event().map_err(|e| XmlError::Malformed {
                message: e.to_string(),
                position: reader.buffer_position() as u64,
            })?;

            match event {
                Event::Start(e) => {
                    stack.push(XmlElement::new(local_name(e.local_name().as_ref())));
                }
                Event::Empty(e) => {
                    let element = XmlElement::new(local_name(e.local_name().as_ref()));
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|e| XmlError::Malformed {
                        message: e.to_string(),
                        position: reader.buffer_position() as u64,
                    })?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Malformed {
                message: "unexpected end of document".to_string(),
                position: reader.buffer_position() as u64,
            });
        }

        root.ok_or(XmlError::Empty)
    }

    /// Local name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content of the element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All child elements in document order.
    pub fn elements(&self) -> &[XmlElement] {
        &self.children
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Every child with the given name.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a chain of child names from this element.
    pub fn path(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter()
            .try_fold(self, |element, name| element.child(name))
    }

    /// Text at a path, or an empty string when the path is absent.
    pub fn text_at(&self, path: &[&str]) -> String {
        self.path(path)
            .map(|e| e.text.clone())
            .unwrap_or_default()
    }

    /// Add a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set the element text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
