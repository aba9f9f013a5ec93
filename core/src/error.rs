//! Error taxonomy for the Lenddo client.
//!
//! # Design
//! A closed enum replaces a class hierarchy of exceptions. Every variant
//! that involves the network carries the `NormalizedResponse` so callers can
//! inspect the request that was sent and whatever came back. The response is
//! boxed to keep `Result<_, LenddoError>` small.

use thiserror::Error;

use crate::http::NormalizedResponse;
use crate::transport::FailureKind;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum LenddoError {
    /// Caller input was rejected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No usable HTTP response: DNS, refused connection, timeout, TLS.
    #[error("transport error ({kind:?}): {message}")]
    Transport {
        kind: FailureKind,
        message: String,
        response: Box<NormalizedResponse>,
    },

    /// The service answered with a 4xx status.
    #[error("client error (HTTP {status}): {message}")]
    Client {
        status: u16,
        message: String,
        response: Box<NormalizedResponse>,
    },

    /// The service answered with a 5xx status.
    #[error("server error (HTTP {status}): {message}")]
    Server {
        status: u16,
        message: String,
        response: Box<NormalizedResponse>,
    },

    /// A response arrived but its body is not valid JSON.
    #[error("could not parse response: {message}")]
    ResponseParsing {
        message: String,
        response: Box<NormalizedResponse>,
    },
}

/// Discriminant of `LenddoError`, convenient for matching in tests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Transport,
    Client,
    Server,
    ResponseParsing,
}

impl LenddoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LenddoError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            LenddoError::Transport { .. } => ErrorKind::Transport,
            LenddoError::Client { .. } => ErrorKind::Client,
            LenddoError::Server { .. } => ErrorKind::Server,
            LenddoError::ResponseParsing { .. } => ErrorKind::ResponseParsing,
        }
    }

    pub fn response(&self) -> Option<&NormalizedResponse> {
        match self {
            LenddoError::InvalidArgument(_) => None,
            LenddoError::Transport { response, .. }
            | LenddoError::Client { response, .. }
            | LenddoError::Server { response, .. }
            | LenddoError::ResponseParsing { response, .. } => Some(response),
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        self.response().and_then(NormalizedResponse::status)
    }

    /// Raw response body bytes, when one was received.
    pub fn body(&self) -> Option<&[u8]> {
        self.response().and_then(NormalizedResponse::body)
    }
}
