//! Blocking client SDK for the Lenddo network service.
//!
//! # Overview
//! Partners post OAuth-derived social network tokens (`PartnerToken`) and
//! then commit the resulting profile IDs for scoring (`CommitPartnerJob`).
//! Every operation issues a single synchronous POST and either returns the
//! parsed JSON reply or a `LenddoError`.
//!
//! # Design
//! - `WhiteLabelClient` validates arguments and shapes payloads.
//! - `ApiClient::post_json` adds the `Date` and `Content-Type` headers and
//!   handles JSON on both sides of the wire.
//! - `RequestHandler` performs one call through a `Transport` and wraps the
//!   outcome in a `NormalizedResponse`; the router turns failures into one
//!   of a closed set of error kinds.
//! - `UreqTransport` is the shipped transport. Tests substitute their own.
//! - No retries, no background work, no shared mutable state.

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod router;
pub mod transport;
pub mod types;
pub mod white_label;

pub use client::{http_date, ApiClient};
pub use config::ClientConfig;
pub use error::{ErrorKind, LenddoError};
pub use handler::RequestHandler;
pub use http::{HttpMethod, HttpRequest, HttpResponse, NormalizedResponse};
pub use transport::{
    bundled_ca_path, with_default_ca_bundle, FailureKind, Transport, TransportFailure, TransportOptions,
    UreqTransport, Verify, MAX_BODY_BYTES,
};
pub use types::{Address, EmploymentPeriod, Export, Name, Provider, Verification};
pub use white_label::{merge_token_data, WhiteLabelClient};
