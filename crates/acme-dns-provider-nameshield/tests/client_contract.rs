//! Contract Test: NameShield Record Client
//!
//! Drives the record client against a mock NameShield API.
//!
//! Constraints verified:
//! - Search: 404 and `total == 0` mean "absent", not an error
//! - Create/update succeed on 200/201, delete on 200/204; anything else fails
//! - Any other status surfaces with its status code and body
//! - Malformed bodies are parse errors, network failures transport errors
//! - Create is NOT idempotent; only the composed operations check first
//! - The bearer token is sent but never reaches the exchange logger

use acme_dns_core::Error;
use acme_dns_core::traits::{ExchangeLogger, RequestSnapshot, ResponseSnapshot};
use acme_dns_provider_nameshield::{NameShieldClient, build_http_client};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "secret_token_12345";
const RECORDS_PATH: &str = "/dns/v2/zones/example.com/records";
const TXT_PATH: &str = "/dns/v2/zones/example.com/records/_acme-challenge/TXT";

fn client_for(server: &MockServer) -> NameShieldClient {
    NameShieldClient::with_http_client(
        API_KEY,
        format!("{}/dns/v2", server.uri()),
        build_http_client().unwrap(),
    )
    .unwrap()
}

fn search_body(records: serde_json::Value) -> serde_json::Value {
    let total = records.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "message": "OK",
        "data": { "total": total, "limit": 50, "offset": 0, "results": records }
    })
}

fn txt_record(id: u64, data: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "_acme-challenge",
        "type": "TXT",
        "data": data,
        "ttl": 300,
        "created_at": "2026-10-18T10:00:00Z",
        "modified_at": "2026-10-18T10:00:00Z",
        "modified_by": "api"
    })
}

async fn mount_search(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("name", "_acme-challenge"))
        .and(query_param("type", "TXT"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[derive(Default)]
struct RecordingLogger {
    requests: Mutex<Vec<RequestSnapshot>>,
    responses: Mutex<Vec<ResponseSnapshot>>,
}

impl ExchangeLogger for RecordingLogger {
    fn on_request(&self, request: &RequestSnapshot) {
        self.requests.lock().unwrap().push(request.clone());
    }

    fn on_response(&self, response: &ResponseSnapshot) {
        self.responses.lock().unwrap().push(response.clone());
    }
}

#[tokio::test]
async fn search_not_found_means_absent() {
    let server = MockServer::start().await;
    mount_search(&server, ResponseTemplate::new(404).set_body_string("zone has no such record")).await;

    let client = client_for(&server);

    assert!(!client.record_exists("example.com", "_acme-challenge").await.unwrap());
    assert!(client.find_txt_records("example.com", "_acme-challenge").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_with_zero_total_means_absent() {
    let server = MockServer::start().await;
    mount_search(&server, ResponseTemplate::new(200).set_body_json(search_body(json!([])))).await;

    let client = client_for(&server);
    assert!(!client.record_exists("example.com", "_acme-challenge").await.unwrap());
}

#[tokio::test]
async fn search_with_results_means_present() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        ResponseTemplate::new(200).set_body_json(search_body(json!([txt_record(7, "token")]))),
    )
    .await;

    let client = client_for(&server);
    assert!(client.record_exists("example.com", "_acme-challenge").await.unwrap());

    let records = client.find_txt_records("example.com", "_acme-challenge").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "7");
    assert_eq!(records[0].data, "token");
}

#[tokio::test]
async fn search_server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    mount_search(&server, ResponseTemplate::new(503).set_body_string("maintenance")).await;

    let client = client_for(&server);
    let err = client.record_exists("example.com", "_acme-challenge").await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn search_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    mount_search(&server, ResponseTemplate::new(200).set_body_string("<html>gateway</html>")).await;

    let client = client_for(&server);
    let err = client.record_exists("example.com", "_acme-challenge").await.unwrap_err();

    assert!(matches!(err, Error::Parse(_)), "got {err}");
}

#[tokio::test]
async fn create_sends_authenticated_txt_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .and(body_json(json!({
            "name": "_acme-challenge",
            "type": "TXT",
            "data": "token",
            "ttl": 300,
            "comment": "Created by acme-dns"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .create_txt_record("example.com", "_acme-challenge", "token", 300)
        .await
        .unwrap();
}

#[tokio::test]
async fn create_rejection_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid record data" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .create_txt_record("example.com", "_acme-challenge", "token", 300)
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("400"), "{msg}");
    assert!(msg.contains("invalid record data"), "{msg}");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn create_is_not_idempotent() {
    // Two identical creates are two POSTs; whether the provider keeps a
    // duplicate or rejects the second one is up to the provider.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for _ in 0..2 {
        client
            .create_txt_record("example.com", "_acme-challenge", "token", 300)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn update_addresses_record_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TXT_PATH))
        .and(body_json(json!({
            "data": "new-token",
            "ttl": 120,
            "comment": "Created by acme-dns"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .update_txt_record("example.com", "_acme-challenge", "new-token", 120)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_rejection_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(TXT_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("record not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .update_txt_record("example.com", "_acme-challenge", "new-token", 120)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProviderApi { .. }), "got {err}");
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("record not found"));
}

#[tokio::test]
async fn delete_accepts_ok() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(TXT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_txt_record("example.com", "_acme-challenge").await.unwrap();
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(TXT_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_txt_record("example.com", "_acme-challenge").await.unwrap();
}

#[tokio::test]
async fn delete_failure_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(TXT_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .delete_txt_record("example.com", "_acme-challenge")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(429));
    assert!(err.is_transient());
}

#[tokio::test]
async fn ensure_skips_create_when_value_present() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(search_body(json!([txt_record(7, "\"token\"")]))),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .ensure_txt_record("example.com", "_acme-challenge", "token", 300)
        .await
        .unwrap();
    assert!(!created);
}

#[tokio::test]
async fn ensure_creates_alongside_other_values() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        ResponseTemplate::new(200).set_body_json(search_body(json!([txt_record(7, "other")]))),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .ensure_txt_record("example.com", "_acme-challenge", "token", 300)
        .await
        .unwrap();
    assert!(created);
}

#[tokio::test]
async fn remove_skips_delete_when_absent() {
    let server = MockServer::start().await;
    mount_search(&server, ResponseTemplate::new(404)).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.remove_txt_record("example.com", "_acme-challenge").await.unwrap());
}

#[tokio::test]
async fn exchange_logger_never_sees_the_token() {
    let server = MockServer::start().await;
    mount_search(&server, ResponseTemplate::new(200).set_body_json(search_body(json!([])))).await;

    let logger = Arc::new(RecordingLogger::default());
    let client = client_for(&server).with_exchange_logger(logger.clone());
    client.record_exists("example.com", "_acme-challenge").await.unwrap();

    let requests = logger.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert!(requests[0].url.contains("type=TXT"));
    assert!(!format!("{:?}", requests[0]).contains(API_KEY));
    assert!(
        requests[0]
            .headers
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case("authorization") && v == "<REDACTED>")
    );

    let responses = logger.responses.lock().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].status, 200);
}

#[tokio::test]
async fn network_failure_is_transport_error() {
    // Nothing listens on port 1
    let client = NameShieldClient::with_http_client(
        API_KEY,
        "http://127.0.0.1:1/dns/v2",
        build_http_client().unwrap(),
    )
    .unwrap();

    let err = client.record_exists("example.com", "_acme-challenge").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }), "got {err}");
    assert!(err.is_transient());
}
