//! Query API actions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::http::HttpMethod;

/// An action of the SES query API, sent as the `Action` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SesAction {
    /// Send a message built from structured fields.
    SendEmail,
    /// Send a raw MIME message.
    SendRawEmail,
    /// Start verification of a sender address.
    VerifyEmailAddress,
    /// List verified sender addresses.
    ListVerifiedEmailAddresses,
    /// Remove a verified sender address.
    DeleteVerifiedEmailAddress,
    /// Read sending limits.
    GetSendQuota,
    /// Read sending activity for the last two weeks.
    GetSendStatistics,
}

impl SesAction {
    /// Value of the `Action` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SesAction::SendEmail => "SendEmail",
            SesAction::SendRawEmail => "SendRawEmail",
            SesAction::VerifyEmailAddress => "VerifyEmailAddress",
            SesAction::ListVerifiedEmailAddresses => "ListVerifiedEmailAddresses",
            SesAction::DeleteVerifiedEmailAddress => "DeleteVerifiedEmailAddress",
            SesAction::GetSendQuota => "GetSendQuota",
            SesAction::GetSendStatistics => "GetSendStatistics",
        }
    }

    /// Verb the action is sent with.
    pub fn http_method(&self) -> HttpMethod {
        match self {
            SesAction::SendEmail | SesAction::SendRawEmail | SesAction::VerifyEmailAddress => {
                HttpMethod::POST
            }
            SesAction::DeleteVerifiedEmailAddress => HttpMethod::DELETE,
            SesAction::ListVerifiedEmailAddresses
            | SesAction::GetSendQuota
            | SesAction::GetSendStatistics => HttpMethod::GET,
        }
    }

    /// Name of the result element in the response, e.g. `GetSendQuotaResult`.
    pub fn result_element(&self) -> String {
        format!("{}Result", self.as_str())
    }
}

impl fmt::Display for SesAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
