//! Verify the white-label operations against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each case describes the operation input, the request expected on the
//! wire, a simulated response, and either the parsed result or the expected
//! error kind. A scripted transport replays the simulated response and
//! records the request. Bodies are compared as parsed JSON.

use std::sync::Mutex;

use lenddo_core::{
    ClientConfig, ErrorKind, HttpMethod, HttpRequest, HttpResponse, LenddoError, Transport,
    TransportFailure, TransportOptions, Verification, WhiteLabelClient,
};
use serde_json::{Map, Value};

const HOST: &str = "https://networkservice.lenddo.com/";

/// Replays a fixed response and records every request it is given.
struct Scripted {
    response: Option<HttpResponse>,
    seen: Mutex<Vec<(String, HttpRequest)>>,
}

impl Transport for Scripted {
    fn send(
        &self,
        url: &str,
        request: &HttpRequest,
        _options: &TransportOptions,
    ) -> Result<HttpResponse, TransportFailure> {
        self.seen.lock().unwrap().push((url.to_string(), request.clone()));
        self.response
            .clone()
            .ok_or_else(|| TransportFailure::new(lenddo_core::FailureKind::Other, "no scripted response"))
    }
}

fn client_for(case: &Value) -> WhiteLabelClient<Scripted> {
    let response = case.get("simulated_response").map(|sim| HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
    });
    let transport = Scripted {
        response,
        seen: Mutex::new(Vec::new()),
    };
    WhiteLabelClient::with_transport(ClientConfig::default(), transport)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "InvalidArgument" => ErrorKind::InvalidArgument,
        "Transport" => ErrorKind::Transport,
        "Client" => ErrorKind::Client,
        "Server" => ErrorKind::Server,
        "ResponseParsing" => ErrorKind::ResponseParsing,
        other => panic!("unknown error kind: {other}"),
    }
}

/// Check the recorded request and the outcome against one case.
fn check_case(case: &Value, client: &WhiteLabelClient<Scripted>, result: Result<Value, LenddoError>) {
    let name = case["name"].as_str().unwrap();
    let seen = client.api().transport().seen.lock().unwrap();

    let expected_req = &case["expected_request"];
    if expected_req.is_null() {
        assert!(seen.is_empty(), "{name}: no request should be sent");
    } else {
        assert_eq!(seen.len(), 1, "{name}: exactly one request");
        let (url, req) = &seen[0];
        let path = expected_req["path"].as_str().unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, path, "{name}: path");
        assert_eq!(url, &format!("{HOST}{path}"), "{name}: url");
        assert_eq!(req.header("Content-Type"), Some("application/json"), "{name}: content type");
        assert!(req.header("Date").is_some(), "{name}: date header");

        let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");
    }

    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        let kind = parse_kind(expected_error["kind"].as_str().unwrap());
        assert_eq!(err.kind(), kind, "{name}: error kind");
        let status = expected_error["status"].as_u64().map(|s| s as u16);
        assert_eq!(err.status(), status, "{name}: error status");
    } else {
        assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// PartnerToken
// ---------------------------------------------------------------------------

#[test]
fn partner_token_test_vectors() {
    let raw = include_str!("../../test-vectors/partner_token.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let input = &case["input"];
        let token_data: Map<String, Value> = input["token_data"].as_object().cloned().unwrap_or_default();

        let client = client_for(case);
        let result = client.partner_token(
            input["client_id"].as_str().unwrap(),
            input["provider"].as_str().unwrap(),
            input["oauth_key"].as_str().unwrap(),
            input["oauth_secret"].as_str().unwrap(),
            &token_data,
        );
        check_case(case, &client, result);
    }
}

// ---------------------------------------------------------------------------
// CommitPartnerJob
// ---------------------------------------------------------------------------

#[test]
fn commit_partner_job_test_vectors() {
    let raw = include_str!("../../test-vectors/commit_partner_job.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let input = &case["input"];
        let profile_ids: Vec<String> = serde_json::from_value(input["profile_ids"].clone()).unwrap();
        let verification: Option<Verification> = serde_json::from_value(input["verification"].clone()).unwrap();

        let client = client_for(case);
        let result = client.commit_partner_job(
            input["partner_script_id"].as_str().unwrap(),
            input["client_id"].as_str().unwrap(),
            &profile_ids,
            verification.as_ref().map(|v| v as &dyn lenddo_core::Export),
        );
        check_case(case, &client, result);
    }
}
