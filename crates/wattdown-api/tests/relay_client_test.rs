#![allow(clippy::unwrap_used)]
// Integration tests for `RelayClient` using wiremock.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wattdown_api::{Error, RelayClient};

/// The mock server's `host:port`, as it would appear in an `ip_address`
/// metric label.
fn addr(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

#[tokio::test]
async fn test_turn_off_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/relay/0"))
        .and(query_param("turn", "off"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ison\":false}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = RelayClient::with_client(reqwest::Client::new(), false);
    client.turn_off(&addr(&server)).await.unwrap();
}

#[tokio::test]
async fn test_dry_run_makes_no_network_call() {
    let server = MockServer::start().await;

    // Any request at all would violate the expectation.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = RelayClient::with_client(reqwest::Client::new(), true);
    assert!(client.dry_run());
    client.turn_off(&addr(&server)).await.unwrap();
}

#[tokio::test]
async fn test_non_2xx_is_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/relay/0"))
        .respond_with(ResponseTemplate::new(401).set_body_string("auth required"))
        .mount(&server)
        .await;

    let client = RelayClient::with_client(reqwest::Client::new(), false);
    let result = client.turn_off(&addr(&server)).await;

    match result {
        Err(Error::Relay { status, ref body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "auth required");
        }
        other => panic!("expected Relay error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_device_is_transport_error() {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(500))
        .build()
        .unwrap();
    let client = RelayClient::with_client(http, false);
    // Reserved TEST-NET address, nothing listens there.
    let result = client.turn_off("192.0.2.1:9").await;

    match result {
        Err(e @ Error::Transport(_)) => assert!(e.is_transient()),
        other => panic!("expected Transport error, got: {other:?}"),
    }
}
