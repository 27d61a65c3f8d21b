//! Mapping of SES error documents.
//!
//! The query API reports failures as:
//!
//! ```xml
//! <ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
//!   <Error>
//!     <Type>Sender</Type>
//!     <Code>MessageRejected</Code>
//!     <Message>Email address is not verified.</Message>
//!   </Error>
//!   <RequestId>c5c5ccd9-8d9b-11e0-85c1-0123456789ab</RequestId>
//! </ErrorResponse>
//! ```

use crate::http::ErrorInfo;
use crate::xml::XmlElement;

/// Extract a service error from a response document, if it carries one.
pub(crate) fn service_error(document: &XmlElement) -> Option<ErrorInfo> {
    let error = document.child("Error")?;
    Some(ErrorInfo::Service {
        error_type: error.text_at(&["Type"]),
        code: error.text_at(&["Code"]),
        message: error.text_at(&["Message"]),
        request_id: document.text_at(&["RequestId"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error() {
        let document = XmlElement::parse(
            "<ErrorResponse><Error><Type>Receiver</Type><Code>InternalFailure</Code>\
             <Message>Try again</Message></Error><RequestId>abc</RequestId></ErrorResponse>",
        )
        .unwrap();

        assert_eq!(
            service_error(&document),
            Some(ErrorInfo::Service {
                error_type: "Receiver".to_string(),
                code: "InternalFailure".to_string(),
                message: "Try again".to_string(),
                request_id: "abc".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let document =
            XmlElement::parse("<ErrorResponse><Error><Code>Throttling</Code></Error></ErrorResponse>")
                .unwrap();

        match service_error(&document) {
            Some(ErrorInfo::Service {
                error_type,
                code,
                request_id,
                ..
            }) => {
                assert_eq!(code, "Throttling");
                assert!(error_type.is_empty());
                assert!(request_id.is_empty());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_no_error_element() {
        let document = XmlElement::parse("<SendEmailResponse/>").unwrap();
        assert!(service_error(&document).is_none());
    }
}
