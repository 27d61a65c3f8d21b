//! Parameter canonicalization for SES query requests.
//!
//! The same canonical string is used both as the wire query (or form body)
//! and as the input to the V4 canonical request, so it must be byte-for-byte
//! deterministic for a given parameter set.

use crate::http::RequestParameters;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters that should NOT be percent-encoded in parameter values.
///
/// RFC 3986 unreserved characters: `A-Z a-z 0-9 - _ . ~`.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a parameter value.
///
/// Spaces become `%20` and `~` is left untouched.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::signing::uri_encode;
///
/// assert_eq!(uri_encode("hello world"), "hello%20world");
/// assert_eq!(uri_encode("user+tag@example.com"), "user%2Btag%40example.com");
/// assert_eq!(uri_encode("a~b"), "a~b");
/// ```
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, QUERY_SET).to_string()
}

/// Expand parameters into encoded `name=value` entries, sorted.
///
/// Names are emitted verbatim; only values are encoded. Sorting is a plain
/// byte-wise comparison of the whole entry, not of the names alone, so
/// `member.10=..` sorts before `member.1=..` (`0` is below `=`).
pub fn encoded_entries(params: &RequestParameters) -> Vec<String> {
    let mut entries: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, uri_encode(value)))
        .collect();
    entries.sort();
    entries
}

/// Build the canonical query string for a parameter set.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::http::RequestParameters;
/// use integrations_aws_ses_query::signing::canonical_query_string;
///
/// let mut params = RequestParameters::new();
/// params.set("Action", "VerifyEmailAddress");
/// params.set("EmailAddress", "user@example.com");
///
/// assert_eq!(
///     canonical_query_string(&params),
///     "Action=VerifyEmailAddress&EmailAddress=user%40example.com"
/// );
/// ```
pub fn canonical_query_string(params: &RequestParameters) -> String {
    encoded_entries(params).join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_encode_unreserved() {
        assert_eq!(uri_encode("AZaz09-_.~"), "AZaz09-_.~");
    }

    #[test]
    fn test_uri_encode_reserved() {
        assert_eq!(uri_encode("a/b"), "a%2Fb");
        assert_eq!(uri_encode("a=b&c"), "a%3Db%26c");
        assert_eq!(uri_encode("=?UTF-8?B?"), "%3D%3FUTF-8%3FB%3F");
    }

    #[test]
    fn test_uri_encode_utf8() {
        assert_eq!(uri_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_empty_parameters() {
        let params = RequestParameters::new();
        assert_eq!(canonical_query_string(&params), "");
    }

    #[test]
    fn test_list_values_are_repeated() {
        let mut params = RequestParameters::new();
        params.add("Key", "b").add("Key", "a");
        params.set("Action", "X");

        assert_eq!(canonical_query_string(&params), "Action=X&Key=a&Key=b");
    }

    #[test]
    fn test_sorting_is_over_whole_entries() {
        let mut params = RequestParameters::new();
        params.set("Destination.ToAddresses.member.10", "j@example.com");
        params.set("Destination.ToAddresses.member.2", "b@example.com");
        params.set("Destination.ToAddresses.member.1", "a@example.com");

        assert_eq!(
            encoded_entries(&params),
            vec![
                "Destination.ToAddresses.member.10=j%40example.com",
                "Destination.ToAddresses.member.1=a%40example.com",
                "Destination.ToAddresses.member.2=b%40example.com",
            ]
        );
    }

    #[test]
    fn test_names_are_not_encoded() {
        let mut params = RequestParameters::new();
        params.set("Message.Subject.Data", "Hi there");

        assert_eq!(
            canonical_query_string(&params),
            "Message.Subject.Data=Hi%20there"
        );
    }
}
