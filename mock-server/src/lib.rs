use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const PROVIDERS: [&str; 5] = ["Facebook", "LinkedIn", "Yahoo", "WindowsLive", "Google"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerToken {
    pub token_data: Map<String, Value>,
    pub provider: String,
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitPartnerJob {
    pub client_id: String,
    pub profile_ids: Vec<String>,
    pub partner_script_id: String,
    #[serde(default)]
    pub verification_data: Map<String, Value>,
}

/// Profile IDs minted by `PartnerToken`.
pub type Db = Arc<RwLock<HashSet<String>>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashSet::new()));
    Router::new()
        .route("/PartnerToken", post(partner_token))
        .route("/CommitPartnerJob", post(commit_partner_job))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock network service listening");
    }
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "error": message })))
}

/// Every call must carry a `Date` header and a JSON content type.
fn check_headers(headers: &HeaderMap) -> Result<(), Reply> {
    if !headers.contains_key(header::DATE) {
        return Err(error(StatusCode::BAD_REQUEST, "missing Date header"));
    }
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return Err(error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected application/json"));
    }
    Ok(())
}

fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, Reply> {
    serde_json::from_str(body).map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))
}

async fn partner_token(State(db): State<Db>, headers: HeaderMap, body: String) -> Reply {
    let input: PartnerToken = match check_headers(&headers).and_then(|()| parse(&body)) {
        Ok(input) => input,
        Err(reply) => return reply,
    };
    if !PROVIDERS.contains(&input.provider.as_str()) {
        return error(StatusCode::BAD_REQUEST, "unknown provider");
    }
    if !input.token_data.contains_key("key") || !input.token_data.contains_key("secret") {
        return error(StatusCode::BAD_REQUEST, "token_data requires key and secret");
    }

    let profile_id = format!("{}{}", Uuid::new_v4().simple(), provider_suffix(&input.provider));
    db.write().await.insert(profile_id.clone());
    debug!(client_id = %input.client_id, %profile_id, "issued profile id");
    (
        StatusCode::OK,
        Json(json!({ "profile_id": profile_id, "client_id": input.client_id })),
    )
}

async fn commit_partner_job(State(db): State<Db>, headers: HeaderMap, body: String) -> Reply {
    let input: CommitPartnerJob = match check_headers(&headers).and_then(|()| parse(&body)) {
        Ok(input) => input,
        Err(reply) => return reply,
    };
    if input.profile_ids.is_empty() {
        return error(StatusCode::BAD_REQUEST, "profile_ids must not be empty");
    }
    let known = db.read().await;
    if input.profile_ids.iter().any(|id| !known.contains(id)) {
        return error(StatusCode::NOT_FOUND, "not found");
    }
    debug!(client_id = %input.client_id, jobs = input.profile_ids.len(), "committed partner job");
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "client_id": input.client_id,
            "partner_script_id": input.partner_script_id,
            "verified_probes": verified_fields(&input.verification_data),
        })),
    )
}

/// Verification field names in sorted order, independent of map ordering.
fn verified_fields(data: &Map<String, Value>) -> Vec<&str> {
    let mut fields: Vec<&str> = data.keys().map(String::as_str).collect();
    fields.sort_unstable();
    fields
}

/// Profile IDs end in a short network tag, e.g. `...FB`.
fn provider_suffix(provider: &str) -> &'static str {
    match provider {
        "Facebook" => "FB",
        "LinkedIn" => "LI",
        "Yahoo" => "YH",
        "WindowsLive" => "WL",
        _ => "GO",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_token_parses_wire_body() {
        let input: PartnerToken = serde_json::from_str(
            r#"{"token_data":{"key":"k","secret":"s"},"provider":"Facebook","client_id":"c1"}"#,
        )
        .unwrap();
        assert_eq!(input.provider, "Facebook");
        assert_eq!(input.token_data["key"], "k");
    }

    #[test]
    fn commit_partner_job_defaults_verification() {
        let input: CommitPartnerJob = serde_json::from_str(
            r#"{"client_id":"c1","profile_ids":["p1"],"partner_script_id":"s1"}"#,
        )
        .unwrap();
        assert!(input.verification_data.is_empty());
    }

    #[test]
    fn commit_partner_job_rejects_missing_profile_ids() {
        let result: Result<CommitPartnerJob, _> =
            serde_json::from_str(r#"{"client_id":"c1","partner_script_id":"s1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn headers_require_date_and_json() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(check_headers(&headers).unwrap_err().0, StatusCode::BAD_REQUEST);

        headers.insert(header::DATE, "Sun, 06 Nov 1994 08:49:37 GMT".parse().unwrap());
        assert!(check_headers(&headers).is_ok());

        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        assert_eq!(
            check_headers(&headers).unwrap_err().0,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn verified_fields_are_sorted() {
        let data: Map<String, Value> =
            serde_json::from_str(r#"{"name":{},"employer":"Acme","address":{}}"#).unwrap();
        assert_eq!(verified_fields(&data), ["address", "employer", "name"]);
        assert!(verified_fields(&Map::new()).is_empty());
    }

    #[test]
    fn suffix_per_provider() {
        assert_eq!(provider_suffix("Facebook"), "FB");
        assert_eq!(provider_suffix("Google"), "GO");
    }
}
