//! Client configuration, fixed at construction.

use std::time::Duration;

use crate::error::LenddoError;
use crate::transport::TransportOptions;

pub const DEFAULT_NETWORK_SERVICE_HOST: &str = "https://networkservice.lenddo.com/";

pub const ENV_NETWORK_SERVICE_URL: &str = "LENDDO_NETWORK_SERVICE_URL";
pub const ENV_TIMEOUT_SECS: &str = "LENDDO_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    network_service_host: String,
    transport_options: TransportOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network_service_host: DEFAULT_NETWORK_SERVICE_HOST.to_string(),
            transport_options: TransportOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Host is used verbatim as a prefix; keep the trailing slash.
    pub fn with_network_service_host(mut self, host: &str) -> Self {
        self.network_service_host = host.to_string();
        self
    }

    pub fn with_transport_options(mut self, options: TransportOptions) -> Self {
        self.transport_options = options;
        self
    }

    /// Defaults overridden by `LENDDO_NETWORK_SERVICE_URL` and
    /// `LENDDO_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, LenddoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LenddoError> {
        let mut config = Self::default();
        if let Some(host) = lookup(ENV_NETWORK_SERVICE_URL) {
            config = config.with_network_service_host(&host);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                LenddoError::InvalidArgument(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            config.transport_options.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn network_service_host(&self) -> &str {
        &self.network_service_host
    }

    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }
}
