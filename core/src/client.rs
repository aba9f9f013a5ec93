//! Base API client: JSON-over-POST on top of `RequestHandler`.
//!
//! # Design
//! `ApiClient` holds the transport and the transport options and nothing
//! else; a `RequestHandler` bound to the target host is created per call.
//! Every request carries `Content-Type: application/json` and a `Date`
//! header in HTTP-date format.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::LenddoError;
use crate::handler::RequestHandler;
use crate::http::HttpMethod;
use crate::transport::{Transport, TransportOptions, UreqTransport};

/// Format a timestamp as an RFC 7231 HTTP-date, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[derive(Debug)]
pub struct ApiClient<T = UreqTransport> {
    transport: Arc<T>,
    options: TransportOptions,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            options: self.options.clone(),
        }
    }
}

impl ApiClient<UreqTransport> {
    pub fn new(options: TransportOptions) -> Self {
        Self::with_transport(UreqTransport, options)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, options: TransportOptions) -> Self {
        Self {
            transport: Arc::new(transport),
            options,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    pub fn handler(&self, host: &str) -> RequestHandler<T> {
        RequestHandler::new(host, Arc::clone(&self.transport))
    }

    /// POST `payload` as JSON to `host + operation` and parse the JSON reply.
    pub fn post_json(&self, host: &str, operation: &str, payload: &Value) -> Result<Value, LenddoError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| LenddoError::InvalidArgument(format!("payload is not serializable: {e}")))?;
        let headers = vec![
            ("Date".to_string(), http_date(Utc::now())),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];

        let response = self.handler(host).request(
            HttpMethod::Post,
            operation,
            Vec::new(),
            headers,
            Some(body),
            self.options.clone(),
        )?;
        response.json()
    }
}
