//! Typed results of the query API actions.
//!
//! Each type reads itself from the parsed response document. Absent elements
//! become empty strings or zero; elements that are present but unreadable are
//! reported as [`SesError::Serialization`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{SesError, SesResult};
use crate::xml::XmlElement;

use super::SesAction;

const REQUEST_ID: [&str; 2] = ["ResponseMetadata", "RequestId"];

fn request_id(doc: &XmlElement) -> String {
    doc.text_at(&REQUEST_ID)
}

fn number<T: FromStr + Default>(element: &XmlElement, name: &str) -> SesResult<T> {
    let text = element.text_at(&[name]);
    let text = text.trim();
    if text.is_empty() {
        return Ok(T::default());
    }
    text.parse().map_err(|_| SesError::Serialization {
        message: format!("Invalid number in <{}>: {}", name, text),
    })
}

fn timestamp(element: &XmlElement, name: &str) -> SesResult<DateTime<Utc>> {
    let text = element.text_at(&[name]);
    let text = text.trim();
    if text.is_empty() {
        return Ok(DateTime::<Utc>::default());
    }
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| SesError::Serialization {
            message: format!("Invalid timestamp in <{}>: {}: {}", name, text, e),
        })
}

/// Result of `SendEmail` or `SendRawEmail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendEmailResponse {
    /// Message ID assigned by SES.
    pub message_id: String,
    /// Request ID.
    pub request_id: String,
}

impl SendEmailResponse {
    /// Read from a send response; `action` names the result element.
    pub fn from_xml(doc: &XmlElement, action: SesAction) -> SesResult<Self> {
        let result = action.result_element();
        Ok(Self {
            message_id: doc.text_at(&[result.as_str(), "MessageId"]),
            request_id: request_id(doc),
        })
    }
}

/// Result of an action that only returns a request ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestIdResponse {
    /// Request ID.
    pub request_id: String,
}

impl RequestIdResponse {
    /// Read from any response document.
    pub fn from_xml(doc: &XmlElement) -> SesResult<Self> {
        Ok(Self {
            request_id: request_id(doc),
        })
    }
}

/// Result of `ListVerifiedEmailAddresses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListVerifiedEmailAddressesResponse {
    /// Verified addresses in response order.
    pub addresses: Vec<String>,
    /// Request ID.
    pub request_id: String,
}

impl ListVerifiedEmailAddressesResponse {
    /// Read from a `ListVerifiedEmailAddressesResponse` document.
    pub fn from_xml(doc: &XmlElement) -> SesResult<Self> {
        let addresses = doc
            .path(&["ListVerifiedEmailAddressesResult", "VerifiedEmailAddresses"])
            .map(|list| list.children("member").map(|m| m.text().to_string()).collect())
            .unwrap_or_default();

        Ok(Self {
            addresses,
            request_id: request_id(doc),
        })
    }
}

/// Result of `GetSendQuota`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendQuota {
    /// Messages allowed per 24 hours.
    #[serde(rename = "Max24HourSend")]
    pub max_24_hour_send: f64,
    /// Messages allowed per second.
    pub max_send_rate: f64,
    /// Messages sent in the last 24 hours.
    #[serde(rename = "SentLast24Hours")]
    pub sent_last_24_hours: f64,
    /// Request ID.
    pub request_id: String,
}

impl SendQuota {
    /// Read from a `GetSendQuotaResponse` document.
    pub fn from_xml(doc: &XmlElement) -> SesResult<Self> {
        let empty = XmlElement::default();
        let result = doc.child("GetSendQuotaResult").unwrap_or(&empty);

        Ok(Self {
            max_24_hour_send: number(result, "Max24HourSend")?,
            max_send_rate: number(result, "MaxSendRate")?,
            sent_last_24_hours: number(result, "SentLast24Hours")?,
            request_id: request_id(doc),
        })
    }
}

/// One 15-minute interval of sending activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendDataPoint {
    /// Hard bounces.
    pub bounces: u64,
    /// Complaints.
    pub complaints: u64,
    /// Messages accepted for delivery.
    pub delivery_attempts: u64,
    /// Messages rejected by SES.
    pub rejects: u64,
    /// Start of the interval.
    pub timestamp: DateTime<Utc>,
}

impl SendDataPoint {
    fn from_xml(member: &XmlElement) -> SesResult<Self> {
        Ok(Self {
            bounces: number(member, "Bounces")?,
            complaints: number(member, "Complaints")?,
            delivery_attempts: number(member, "DeliveryAttempts")?,
            rejects: number(member, "Rejects")?,
            timestamp: timestamp(member, "Timestamp")?,
        })
    }
}

/// Result of `GetSendStatistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendStatistics {
    /// Data points in response order.
    pub send_data_points: Vec<SendDataPoint>,
    /// Request ID.
    pub request_id: String,
}

impl SendStatistics {
    /// Read from a `GetSendStatisticsResponse` document.
    pub fn from_xml(doc: &XmlElement) -> SesResult<Self> {
        let send_data_points = match doc.path(&["GetSendStatisticsResult", "SendDataPoints"]) {
            Some(points) => points
                .children("member")
                .map(SendDataPoint::from_xml)
                .collect::<SesResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            send_data_points,
            request_id: request_id(doc),
        })
    }
}
