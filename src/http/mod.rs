//! HTTP layer for the SES query API.
//!
//! - **Request handler**: [`SesHttpClient`] signs and sends one call at a time
//! - **Transport Layer**: pluggable senders, reqwest by default
//! - **Request/Response**: wire types and the per-call [`ResponseEnvelope`]
//! - **Parameters**: the `name=value` set behind every query action
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  SesHttpClient  │  - Parameters and verb
//! │                 │  - Canonicalization and signing
//! │                 │  - XML parsing, service errors
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Transport     │  - HTTP transport abstraction
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   reqwest       │  - Connection pool, TLS
//! └─────────────────┘
//! ```

mod client;
mod params;
mod request;
mod response;
mod transport;

pub use client::{Clock, SesHttpClient};
pub use params::{ParameterValue, RequestParameters};
pub use request::{HttpMethod, HttpRequest};
pub use response::{ErrorInfo, HttpResponse, ResponseEnvelope, SUCCESS_CODES};
pub use transport::{
    ReqwestTransport, Transport, TransportFailure, TransportOptions, DEFAULT_USER_AGENT,
};
