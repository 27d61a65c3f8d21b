//! AWS Signature Version 3 (`AWS3-HTTPS`) for the SES query API.
//!
//! V3 signs only the `Date` header value: the signature is the base64
//! HMAC-SHA256 of the RFC 1123 date string keyed by the secret.

use super::error::SigningError;
use super::v4::{hmac_sha256, insert_header};
use super::SigningParams;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use http::{HeaderMap, HeaderName};

/// Header carrying the V3 authorization.
pub const X_AMZN_AUTHORIZATION: &str = "x-amzn-authorization";

/// Scheme prefix of the V3 authorization header.
pub const AWS3_SCHEME: &str = "AWS3-HTTPS";

/// Format a timestamp the way HTTP `Date` headers expect.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_query::signing::format_http_date;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
/// assert_eq!(format_http_date(&dt), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Compute the V3 signature over a date string.
pub fn signature_v3(secret_key: &str, date: &str) -> Result<String, SigningError> {
    let mac = hmac_sha256(secret_key.as_bytes(), date.as_bytes())?;
    Ok(STANDARD.encode(mac))
}

/// Compute the `X-Amzn-Authorization` header value.
pub fn authorization_v3(params: &SigningParams, date: &str) -> Result<String, SigningError> {
    params.validate()?;
    let signature = signature_v3(&params.secret_access_key, date)?;
    Ok(format!(
        "{} AWSAccessKeyId={},Algorithm=HmacSHA256,Signature={}",
        AWS3_SCHEME, params.access_key_id, signature
    ))
}

/// Sign a request with V3, inserting `Date` and `X-Amzn-Authorization`.
pub fn sign_v3(
    params: &SigningParams,
    headers: &mut HeaderMap,
    timestamp: &DateTime<Utc>,
) -> Result<(), SigningError> {
    let date = format_http_date(timestamp);
    let authorization = authorization_v3(params, &date)?;

    insert_header(headers, http::header::DATE, &date)?;
    insert_header(
        headers,
        HeaderName::from_static(X_AMZN_AUTHORIZATION),
        &authorization,
    )?;
    Ok(())
}
