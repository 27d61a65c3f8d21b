//! AWS Signature Version 4 for the SES query API.
//!
//! The query API signs a fixed set of headers (`host` and `x-amz-date`) and
//! always uses `/` as the canonical URI. The canonical query is the request's
//! parameter string for GET and DELETE; for POST the parameters travel in the
//! body, the canonical query is empty and the payload hash covers the body.
//!
//! Reference: https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html

use super::error::SigningError;
use super::SigningParams;
use crate::http::HttpMethod;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::{HeaderMap, HeaderName, HeaderValue};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// AWS Signature V4 algorithm identifier.
pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Headers covered by the signature, in canonical order.
pub const SIGNED_HEADERS: &str = "host;x-amz-date";

/// Header carrying the V4 timestamp.
pub const X_AMZ_DATE: &str = "x-amz-date";

/// Calculate SHA-256 hash of data and return as hex string.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::signing::sha256_hex;
///
/// assert_eq!(
///     sha256_hex(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| SigningError::SigningFailed {
        message: e.to_string(),
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the signing key for AWS Signature V4.
///
/// 1. kDate = HMAC("AWS4" + SecretKey, Date)
/// 2. kRegion = HMAC(kDate, Region)
/// 3. kService = HMAC(kRegion, Service)
/// 4. kSigning = HMAC(kService, "aws4_request")
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::signing::derive_signing_key;
///
/// let key = derive_signing_key(
///     "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
///     "20120215",
///     "us-east-1",
///     "iam",
/// )
/// .unwrap();
/// assert_eq!(
///     hex::encode(key),
///     "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
/// );
/// ```
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, SigningError> {
    let seed = Zeroizing::new(format!("AWS4{}", secret_key));
    let k_date = Zeroizing::new(hmac_sha256(seed.as_bytes(), date_stamp.as_bytes())?);
    let k_region = Zeroizing::new(hmac_sha256(&k_date, region.as_bytes())?);
    let k_service = Zeroizing::new(hmac_sha256(&k_region, service.as_bytes())?);
    hmac_sha256(&k_service, b"aws4_request")
}

/// Format a timestamp as `YYYYMMDDTHHMMSSZ`.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::signing::format_datetime;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
/// assert_eq!(format_datetime(&dt), "20150830T123600Z");
/// ```
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format a timestamp as `YYYYMMDD`.
pub fn format_date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

/// Build the credential scope `date/region/service/aws4_request`.
pub fn build_credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/aws4_request", date_stamp, region, service)
}

/// Split an endpoint host into its service and region labels.
///
/// `email.us-east-1.amazonaws.com` yields `("email", "us-east-1")`.
pub fn service_and_region(host: &str) -> Result<(&str, &str), SigningError> {
    let mut labels = host.split('.');
    match (labels.next(), labels.next()) {
        (Some(service), Some(region)) if !service.is_empty() && !region.is_empty() => {
            Ok((service, region))
        }
        _ => Err(SigningError::InvalidHost {
            host: host.to_string(),
        }),
    }
}

/// Build the canonical request for a query API call.
pub fn build_canonical_request(
    method: HttpMethod,
    host: &str,
    amz_date: &str,
    query: &str,
) -> String {
    let (canonical_query, payload) = if method.carries_body() {
        ("", query)
    } else {
        (query, "")
    };
    let canonical_headers = format!("host:{}\nx-amz-date:{}\n", host, amz_date);

    [
        method.as_str(),
        "/",
        canonical_query,
        &canonical_headers,
        SIGNED_HEADERS,
        &sha256_hex(payload.as_bytes()),
    ]
    .join("\n")
}

/// Build the string to sign from a canonical request.
pub fn build_string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        AWS_ALGORITHM,
        amz_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    )
}

/// Compute the V4 `Authorization` header value.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::http::HttpMethod;
/// use integrations_aws_ses_query::signing::{authorization_v4, SigningParams};
/// use chrono::{TimeZone, Utc};
///
/// let params = SigningParams::new("email.us-east-1.amazonaws.com")
///     .with_access_key("AKIDEXAMPLE")
///     .with_secret_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
/// let ts = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
///
/// let auth = authorization_v4(
///     &params,
///     HttpMethod::GET,
///     "Action=ListVerifiedEmailAddresses",
///     &ts,
/// )
/// .unwrap();
/// assert!(auth.starts_with(
///     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/email/aws4_request"
/// ));
/// ```
pub fn authorization_v4(
    params: &SigningParams,
    method: HttpMethod,
    query: &str,
    timestamp: &DateTime<Utc>,
) -> Result<String, SigningError> {
    params.validate()?;

    let (service, region) = service_and_region(&params.host)?;
    let amz_date = format_datetime(timestamp);
    let date_stamp = format_date_stamp(timestamp);
    let scope = build_credential_scope(&date_stamp, region, service);

    let canonical_request = build_canonical_request(method, &params.host, &amz_date, query);
    let string_to_sign = build_string_to_sign(&amz_date, &scope, &canonical_request);

    let signing_key = Zeroizing::new(derive_signing_key(
        &params.secret_access_key,
        &date_stamp,
        region,
        service,
    )?);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        AWS_ALGORITHM, params.access_key_id, scope, SIGNED_HEADERS, signature
    ))
}

/// Sign a request with V4, inserting `X-Amz-Date` and `Authorization`.
pub fn sign_v4(
    params: &SigningParams,
    method: HttpMethod,
    query: &str,
    headers: &mut HeaderMap,
    timestamp: &DateTime<Utc>,
) -> Result<(), SigningError> {
    let authorization = authorization_v4(params, method, query, timestamp)?;

    insert_header(headers, HeaderName::from_static(X_AMZ_DATE), &format_datetime(timestamp))?;
    insert_header(headers, http::header::AUTHORIZATION, &authorization)?;
    Ok(())
}

pub(crate) fn insert_header(
    headers: &mut HeaderMap,
    name: HeaderName,
    value: &str,
) -> Result<(), SigningError> {
    let value = HeaderValue::from_str(value).map_err(|e| SigningError::InvalidHeader {
        header: name.to_string(),
        message: e.to_string(),
    })?;
    headers.insert(name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const HOST: &str = "email.us-east-1.amazonaws.com";
    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn params() -> SigningParams {
        SigningParams::new(HOST)
            .with_access_key("AKIDEXAMPLE")
            .with_secret_key(SECRET)
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    #[test]
    fn test_derive_signing_key_known_vector() {
        let key = derive_signing_key(SECRET, "20120215", "us-east-1", "iam").unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_service_and_region() {
        assert_eq!(service_and_region(HOST).unwrap(), ("email", "us-east-1"));
        assert!(service_and_region("localhost").is_err());
        assert!(service_and_region(".eu-west-1").is_err());
    }

    #[test]
    fn test_canonical_request_get() {
        let canonical = build_canonical_request(
            HttpMethod::GET,
            HOST,
            "20150830T123600Z",
            "Action=ListVerifiedEmailAddresses",
        );
        assert_eq!(
            canonical,
            "GET\n/\nAction=ListVerifiedEmailAddresses\n\
             host:email.us-east-1.amazonaws.com\nx-amz-date:20150830T123600Z\n\n\
             host;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_canonical_request_post_moves_query_into_payload() {
        let canonical = build_canonical_request(
            HttpMethod::POST,
            HOST,
            "20150830T123600Z",
            "Action=VerifyEmailAddress&EmailAddress=user%40example.com",
        );
        assert!(canonical.starts_with("POST\n/\n\nhost:"));
        assert!(canonical.ends_with(
            "12b2b17237e9b755b7e9bfb167dd3eb3b0736c67101b43a38aaccc51d3f58726"
        ));
    }

    #[test]
    fn test_string_to_sign() {
        let canonical = build_canonical_request(
            HttpMethod::GET,
            HOST,
            "20150830T123600Z",
            "Action=ListVerifiedEmailAddresses",
        );
        let sts = build_string_to_sign(
            "20150830T123600Z",
            "20150830/us-east-1/email/aws4_request",
            &canonical,
        );
        assert_eq!(
            sts,
            "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/email/aws4_request\n\
             34fc9b2114a28b1e9bf6f8a2aa712e52f06508521f0c7af1b2219fb7f13a6cf3"
        );
    }

    #[test]
    fn test_authorization_golden_get() {
        let auth = authorization_v4(
            &params(),
            HttpMethod::GET,
            "Action=ListVerifiedEmailAddresses",
            &timestamp(),
        )
        .unwrap();
        assert_eq!(
            auth,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/email/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=07bac5c084c5ae296a70b341f15d3e7e8a2afc8d49341f78b9c523e55cc713d8"
        );
    }

    #[test]
    fn test_authorization_golden_post() {
        let auth = authorization_v4(
            &params(),
            HttpMethod::POST,
            "Action=VerifyEmailAddress&EmailAddress=user%40example.com",
            &timestamp(),
        )
        .unwrap();
        assert!(auth.ends_with(
            "Signature=e5e524f885882caf8004ea1ff999a433a9709f98f4b9bbb2778ad4d567e123c7"
        ));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let query = "Action=GetSendQuota";
        let a = authorization_v4(&params(), HttpMethod::GET, query, &timestamp()).unwrap();
        let b = authorization_v4(&params(), HttpMethod::GET, query, &timestamp()).unwrap();
        assert_eq!(a, b);

        let later = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 1).unwrap();
        let c = authorization_v4(&params(), HttpMethod::GET, query, &later).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_sign_v4_inserts_headers() {
        let mut headers = HeaderMap::new();
        sign_v4(
            &params(),
            HttpMethod::DELETE,
            "Action=DeleteVerifiedEmailAddress",
            &mut headers,
            &timestamp(),
        )
        .unwrap();

        assert_eq!(headers.get("x-amz-date").unwrap(), "20150830T123600Z");
        assert!(headers
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with(AWS_ALGORITHM));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let params = SigningParams::new(HOST).with_access_key("AKIDEXAMPLE");
        let result = authorization_v4(&params, HttpMethod::GET, "", &timestamp());
        assert!(matches!(
            result,
            Err(SigningError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn test_single_label_host_is_rejected() {
        let params = SigningParams::new("localhost")
            .with_access_key("AKIDEXAMPLE")
            .with_secret_key(SECRET);
        let result = authorization_v4(&params, HttpMethod::GET, "", &timestamp());
        assert!(matches!(result, Err(SigningError::InvalidHost { .. })));
    }
}
