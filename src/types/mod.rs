//! Actions and typed results of the SES query API.

mod action;
mod responses;

pub use action::SesAction;
pub use responses::{
    ListVerifiedEmailAddressesResponse, RequestIdResponse, SendDataPoint, SendEmailResponse,
    SendQuota, SendStatistics,
};
