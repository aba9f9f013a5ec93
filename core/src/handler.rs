//! Request handler: one request in, one `NormalizedResponse` or error out.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::LenddoError;
use crate::http::{HttpMethod, HttpRequest, NormalizedResponse};
use crate::router;
use crate::transport::{with_default_ca_bundle, FailureKind, Transport, TransportFailure, TransportOptions};

/// Issues requests relative to a fixed base URI over a shared transport.
#[derive(Debug)]
pub struct RequestHandler<T> {
    base_uri: String,
    transport: Arc<T>,
}

impl<T> Clone for RequestHandler<T> {
    fn clone(&self) -> Self {
        Self {
            base_uri: self.base_uri.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> RequestHandler<T> {
    pub fn new(base_uri: &str, transport: Arc<T>) -> Self {
        Self {
            base_uri: base_uri.to_string(),
            transport,
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Absolute URLs pass through; anything else is appended to the base URI.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_uri, path)
        }
    }

    /// Options as they will reach the transport.
    pub fn effective_options(&self, options: TransportOptions) -> TransportOptions {
        with_default_ca_bundle(options)
    }

    /// Perform exactly one HTTP call.
    ///
    /// Any non-2xx response is a failure. Failures are wrapped together
    /// with the request in a `NormalizedResponse` and classified by the
    /// router.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        headers: Vec<(String, String)>,
        body: Option<String>,
        options: TransportOptions,
    ) -> Result<NormalizedResponse, LenddoError> {
        let options = self.effective_options(options);
        let url = self.resolve(path);
        let request = HttpRequest {
            method,
            path: path.to_string(),
            query,
            headers,
            body,
        };

        debug!(method = method.as_str(), %url, "sending request");

        let outcome = match self.transport.send(&url, &request, &options) {
            Ok(raw) if raw.is_success() => Ok(raw),
            Ok(raw) => Err(
                TransportFailure::new(FailureKind::Status, format!("HTTP {} from {url}", raw.status))
                    .with_response(raw),
            ),
            Err(failure) => Err(failure),
        };

        match outcome {
            Ok(raw) => {
                debug!(status = raw.status, %url, "request succeeded");
                Ok(NormalizedResponse::new(request, Some(raw)))
            }
            Err(failure) => {
                warn!(kind = ?failure.kind, %url, message = %failure.message, "request failed");
                let response = NormalizedResponse::new(request, failure.response.clone());
                Err(router::route(&failure, response))
            }
        }
    }
}
