//! White-label scoring client.
//!
//! Submits network tokens with `PartnerToken` to obtain profile IDs, then
//! commits those profile IDs for scoring with `CommitPartnerJob`, without
//! the applicant ever seeing the Lenddo brand.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::LenddoError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Export, Provider};

/// Build the `token_data` object: `key` and `secret` first, then every
/// caller entry. Caller entries win on conflicting keys.
pub fn merge_token_data(oauth_key: &str, oauth_secret: &str, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::new();
    merged.insert("key".to_string(), Value::String(oauth_key.to_string()));
    merged.insert("secret".to_string(), Value::String(oauth_secret.to_string()));
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[derive(Debug, Clone)]
pub struct WhiteLabelClient<T = UreqTransport> {
    api: ApiClient<T>,
    config: ClientConfig,
}

impl WhiteLabelClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport)
    }
}

impl<T: Transport> WhiteLabelClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let api = ApiClient::with_transport(transport, config.transport_options().clone());
        Self { api, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    /// Post an OAuth token for `provider`. On success the reply carries the
    /// profile ID to pass to `commit_partner_job`.
    ///
    /// `provider` must be one of `Facebook`, `LinkedIn`, `Yahoo`,
    /// `WindowsLive`, `Google`; anything else fails before a request is made.
    pub fn partner_token(
        &self,
        client_id: &str,
        provider: &str,
        oauth_key: &str,
        oauth_secret: &str,
        token_data: &Map<String, Value>,
    ) -> Result<Value, LenddoError> {
        let provider: Provider = provider.parse()?;
        debug!(client_id, %provider, "posting partner token");

        let payload = json!({
            "token_data": merge_token_data(oauth_key, oauth_secret, token_data),
            "provider": provider.as_str(),
            "client_id": client_id,
        });
        self.api
            .post_json(self.config.network_service_host(), "PartnerToken", &payload)
    }

    /// Submit an application for scoring.
    ///
    /// * `partner_script_id` - defined in the partner dashboard; controls how
    ///   results are displayed and where webhooks and notifications go.
    /// * `client_id` - single-use transaction ID used to look up results.
    /// * `profile_ids` - IDs returned by `partner_token`; at least one.
    /// * `verification` - optional probes to verify the applicant against.
    pub fn commit_partner_job<S: AsRef<str>>(
        &self,
        partner_script_id: &str,
        client_id: &str,
        profile_ids: &[S],
        verification: Option<&dyn Export>,
    ) -> Result<Value, LenddoError> {
        if profile_ids.is_empty() {
            return Err(LenddoError::InvalidArgument(
                "profile_ids must contain at least one entry".to_string(),
            ));
        }
        debug!(client_id, partner_script_id, count = profile_ids.len(), "committing partner job");

        let profile_ids: Vec<&str> = profile_ids.iter().map(|id| id.as_ref()).collect();
        let verification_data = verification.map(|v| v.export()).unwrap_or_default();
        let payload = json!({
            "client_id": client_id,
            "profile_ids": profile_ids,
            "partner_script_id": partner_script_id,
            "verification_data": verification_data,
        });
        self.api
            .post_json(self.config.network_service_host(), "CommitPartnerJob", &payload)
    }
}
