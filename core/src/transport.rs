//! Pluggable HTTP transport and its per-request options.
//!
//! # Design
//! `Transport` performs exactly one round-trip and reports any HTTP
//! response as data, 4xx/5xx included. Status interpretation and error
//! classification happen above it in `RequestHandler` and the router, so a
//! fake transport in tests exercises the same error paths as the real one.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ureq::tls::{PemItem, RootCerts, TlsConfig};

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// CA bundle shipped with the crate, embedded so the default trust anchor
/// works outside the source tree.
const BUNDLED_CA: &[u8] = include_bytes!("../resources/ca-bundle.crt");

/// Location of the bundled CA file.
pub fn bundled_ca_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("resources")
        .join("ca-bundle.crt")
}

/// Certificate verification setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verify {
    /// Accept any certificate.
    Disabled,
    /// Verify against the transport's built-in roots.
    Enabled,
    /// Verify against the PEM bundle at this path.
    CaBundle(PathBuf),
}

/// Transport-level options passed through to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    pub verify: Option<Verify>,
    /// Whole-request timeout. `None` means the call may block indefinitely.
    pub timeout: Option<Duration>,
}

impl TransportOptions {
    pub fn with_verify(mut self, verify: Verify) -> Self {
        self.verify = Some(verify);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Point verification at the bundled CA file unless the caller already
/// chose a setting. A caller's choice, `Disabled` included, is kept as is.
pub fn with_default_ca_bundle(mut options: TransportOptions) -> TransportOptions {
    if options.verify.is_none() {
        options.verify = Some(Verify::CaBundle(bundled_ca_path()));
    }
    options
}

/// Broad cause of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// DNS resolution failed or the connection was refused.
    Connect,
    Timeout,
    /// A response arrived with a non-2xx status.
    Status,
    Io,
    Other,
}

/// A failed round-trip, with the response if one was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
    pub response: Option<HttpResponse>,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(mut self, response: HttpResponse) -> Self {
        self.response = Some(response);
        self
    }
}

/// Executes a single HTTP request. No retries, no caching.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        url: &str,
        request: &HttpRequest,
        options: &TransportOptions,
    ) -> Result<HttpResponse, TransportFailure>;
}

/// Largest response body `UreqTransport` will read.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Blocking transport backed by `ureq`.
///
/// An agent is built per call so each request honours its own options.
/// Bodies are read as raw bytes up to `MAX_BODY_BYTES`; a longer body is a
/// transport failure that keeps the status and headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn send(
        &self,
        url: &str,
        request: &HttpRequest,
        options: &TransportOptions,
    ) -> Result<HttpResponse, TransportFailure> {
        let agent = agent(options)?;

        let result = match request.method {
            HttpMethod::Get => with_parts(agent.get(url), request).call(),
            HttpMethod::Delete => with_parts(agent.delete(url), request).call(),
            HttpMethod::Post => {
                let builder = with_parts(agent.post(url), request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_parts(agent.put(url), request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(failure_from_ureq)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect::<Vec<_>>();

        match response.body_mut().with_config().limit(MAX_BODY_BYTES).read_to_vec() {
            Ok(body) => Ok(HttpResponse {
                status,
                headers,
                body,
            }),
            // Keep status and headers even when the body is unreadable.
            Err(e) => Err(failure_from_ureq(e).with_response(HttpResponse {
                status,
                headers,
                body: Vec::new(),
            })),
        }
    }
}

fn with_parts<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn agent(options: &TransportOptions) -> Result<ureq::Agent, TransportFailure> {
    let config = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(options.timeout)
        .tls_config(tls_config(options.verify.as_ref())?)
        .build();
    Ok(config.new_agent())
}

fn tls_config(verify: Option<&Verify>) -> Result<TlsConfig, TransportFailure> {
    let builder = TlsConfig::builder();
    let config = match verify {
        None | Some(Verify::Enabled) => builder.build(),
        Some(Verify::Disabled) => builder.disable_verification(true).build(),
        Some(Verify::CaBundle(path)) => builder.root_certs(load_root_certs(path)?).build(),
    };
    Ok(config)
}

fn load_root_certs(path: &Path) -> Result<RootCerts, TransportFailure> {
    let pem: Cow<'_, [u8]> = if path == bundled_ca_path() {
        Cow::Borrowed(BUNDLED_CA)
    } else {
        let bytes = std::fs::read(path).map_err(|e| {
            TransportFailure::new(
                FailureKind::Io,
                format!("reading CA bundle {}: {e}", path.display()),
            )
        })?;
        Cow::Owned(bytes)
    };

    let mut certs = Vec::new();
    for item in ureq::tls::parse_pem(&pem) {
        let item = item.map_err(|e| {
            TransportFailure::new(
                FailureKind::Other,
                format!("parsing CA bundle {}: {e}", path.display()),
            )
        })?;
        if let PemItem::Certificate(cert) = item {
            certs.push(cert.to_owned());
        }
    }

    if certs.is_empty() {
        return Err(TransportFailure::new(
            FailureKind::Other,
            format!("CA bundle {} contains no certificates", path.display()),
        ));
    }
    Ok(RootCerts::new_with_certs(&certs))
}

fn failure_from_ureq(err: ureq::Error) -> TransportFailure {
    let kind = match &err {
        ureq::Error::Timeout(_) => FailureKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => FailureKind::Connect,
        ureq::Error::Io(e) => match e.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted => FailureKind::Connect,
            io::ErrorKind::TimedOut => FailureKind::Timeout,
            _ => FailureKind::Io,
        },
        _ => FailureKind::Other,
    };
    TransportFailure::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bundle_fills_unset_verify() {
        let options = with_default_ca_bundle(TransportOptions::default());
        assert_eq!(options.verify, Some(Verify::CaBundle(bundled_ca_path())));
    }

    #[test]
    fn caller_verify_is_never_overwritten() {
        for verify in [
            Verify::Disabled,
            Verify::Enabled,
            Verify::CaBundle(PathBuf::from("/etc/custom/ca.pem")),
        ] {
            let options = TransportOptions::default().with_verify(verify.clone());
            assert_eq!(with_default_ca_bundle(options).verify, Some(verify));
        }
    }

    #[test]
    fn default_bundle_keeps_timeout() {
        let options = TransportOptions::default().with_timeout(Duration::from_secs(5));
        let options = with_default_ca_bundle(options);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn bundled_ca_is_shipped_and_parses() {
        assert!(bundled_ca_path().is_file());
        assert!(load_root_certs(&bundled_ca_path()).is_ok());
    }

    #[test]
    fn missing_ca_bundle_is_io_failure() {
        let err = load_root_certs(Path::new("/nonexistent/ca.pem")).unwrap_err();
        assert_eq!(err.kind, FailureKind::Io);
        assert!(err.response.is_none());
    }

    #[test]
    fn connection_errors_map_to_connect() {
        assert_eq!(failure_from_ureq(ureq::Error::HostNotFound).kind, FailureKind::Connect);
        assert_eq!(failure_from_ureq(ureq::Error::ConnectionFailed).kind, FailureKind::Connect);
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(failure_from_ureq(ureq::Error::Io(refused)).kind, FailureKind::Connect);
    }

    #[test]
    fn refused_connection_has_no_response() {
        let request = HttpRequest {
            method: HttpMethod::Post,
            path: "PartnerToken".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Some("{}".to_string()),
        };
        // Bind then drop to obtain a port nothing listens on.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let options = TransportOptions::default().with_timeout(Duration::from_secs(5));
        let err = UreqTransport
            .send(&format!("http://{addr}/PartnerToken"), &request, &options)
            .unwrap_err();
        assert!(err.response.is_none());
        assert_ne!(err.kind, FailureKind::Status);
    }
}
