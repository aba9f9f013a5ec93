//! Maps a failed round-trip onto exactly one `LenddoError` variant.

use crate::error::LenddoError;
use crate::http::NormalizedResponse;
use crate::transport::TransportFailure;

/// Classify `failure` using the status on `response`.
///
/// 4xx is `Client`, 5xx is `Server`. Everything else, including a
/// failure with no response at all, is `Transport`. Never panics.
pub fn route(failure: &TransportFailure, response: NormalizedResponse) -> LenddoError {
    let message = failure.message.clone();
    let response = Box::new(response);
    match response.status() {
        Some(status @ 400..=499) => LenddoError::Client {
            status,
            message,
            response,
        },
        Some(status @ 500..=599) => LenddoError::Server {
            status,
            message,
            response,
        },
        _ => LenddoError::Transport {
            kind: failure.kind,
            message,
            response,
        },
    }
}
