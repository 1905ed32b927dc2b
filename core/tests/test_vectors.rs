//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected envelope contents or errors. Request bodies are compared as
//! parsed JSON unless a case pins the exact `raw_body` text.

use resource_core::{
    ApiError, Envelope, HttpMethod, HttpRequest, HttpResponse, Payload, RequestBody, ResourceEndpoint,
    ResourceId,
};
use serde_json::Value;

const BASE_URL: &str = "https://api.example.com";

fn endpoint(vectors: &Value) -> ResourceEndpoint {
    ResourceEndpoint::new(BASE_URL, vectors["resource"].as_str().unwrap())
}

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
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

fn parse_id(value: &Value) -> ResourceId {
    match value {
        Value::Null => ResourceId::Missing,
        Value::Number(n) => ResourceId::from(n.as_i64().unwrap()),
        Value::String(s) => ResourceId::from(s.as_str()),
        other => panic!("unsupported id: {other}"),
    }
}

fn token(case: &Value) -> Option<&str> {
    case["token"].as_str()
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    let body = req.body.as_ref().and_then(RequestBody::as_json);
    if let Some(raw) = expected.get("raw_body") {
        assert_eq!(body, raw.as_str(), "{name}: raw body");
    } else if expected["body"].is_null() {
        assert!(req.body.is_none(), "{name}: body should be None");
    } else {
        let parsed: Value = serde_json::from_str(body.unwrap()).unwrap();
        assert_eq!(parsed, expected["body"], "{name}: body");
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_error(name: &str, err: &ApiError, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "InvalidArgument" => assert!(matches!(err, ApiError::InvalidArgument(_)), "{name}: {err:?}"),
        "Parse" => assert!(matches!(err, ApiError::Parse(_)), "{name}: {err:?}"),
        "HttpStatus" => {
            let status = expected["status"].as_u64().unwrap() as u16;
            assert_eq!(err.status(), Some(status), "{name}: status");
            assert!(err.to_string().contains(&status.to_string()), "{name}: message");
        }
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

/// Parse the simulated response and compare with `expected_result` /
/// `expected_msg` or `expected_error`.
fn check_response(name: &str, e: &ResourceEndpoint, case: &Value) {
    let result = e.parse_envelope::<Value>(simulated(case));
    match case.get("expected_error") {
        Some(expected) => check_error(name, &result.unwrap_err(), expected),
        None => {
            let envelope: Envelope<Value> = result.unwrap();
            let expected = &case["expected_result"];
            let expected = (!expected.is_null()).then(|| expected.clone());
            assert_eq!(envelope.result, expected, "{name}: result");
            if let Some(msg) = case.get("expected_msg") {
                assert_eq!(envelope.msg.as_deref(), msg.as_str(), "{name}: msg");
            }
        }
    }
}

/// Cases without `expected_request` must fail while building.
fn check_build<F>(name: &str, case: &Value, e: &ResourceEndpoint, build: F)
where
    F: FnOnce() -> Result<HttpRequest, ApiError>,
{
    match case.get("expected_request") {
        Some(expected) => {
            let req = build().unwrap();
            check_request(name, &req, expected);
            check_response(name, e, case);
        }
        None => check_error(name, &build().unwrap_err(), &case["expected_error"]),
    }
}

#[test]
fn list_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/list.json"));
    let e = endpoint(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        check_build(name, case, &e, || Ok(e.build_list(case["query"].as_str(), token(case))));
    }
}

#[test]
fn get_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/get.json"));
    let e = endpoint(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = parse_id(&case["id"]);
        check_build(name, case, &e, || e.build_get(&id, token(case)));
    }
}

#[test]
fn create_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/create.json"));
    let e = endpoint(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = Payload::Json(case["input"].clone());
        check_build(name, case, &e, || {
            e.build_create(input, case["sub_path"].as_str(), token(case))
        });
    }
}

#[test]
fn update_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/update.json"));
    let e = endpoint(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = parse_id(&case["id"]);
        let input = Payload::Json(case["input"].clone());
        check_build(name, case, &e, || e.build_update(&id, input, token(case)));
    }
}

#[test]
fn remove_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/remove.json"));
    let e = endpoint(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = parse_id(&case["id"]);
        check_build(name, case, &e, || e.build_remove(&id, token(case)));
    }
}
