// HTTP transport against a mock engine

mod common;

use common::busy_status_json;
use hayalet_dashboard::{
    Command, Config, EngineMode, GuardLevel, HttpTransport, Side, Transport, TransportError,
};
use mockito::Matcher;
use serde_json::json;

fn transport_for(server: &mockito::Server) -> HttpTransport {
    let mut config = Config::default();
    config.api.base_url = server.url();
    HttpTransport::new(&config).expect("client builds")
}

#[tokio::test]
async fn test_fetch_status_decodes_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/status")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(busy_status_json().to_string())
        .create_async()
        .await;

    let snapshot = transport_for(&server).fetch_status().await.unwrap();
    assert_eq!(snapshot.mode, Some(EngineMode::Paused));
    assert_eq!(snapshot.guard_level, Some(GuardLevel::Orange));
    assert_eq!(snapshot.snapshot.positions.len(), 2);
    assert!(snapshot.grid_states.is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_status_http_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/status")
        .with_status(503)
        .create_async()
        .await;

    let err = transport_for(&server).fetch_status().await.unwrap_err();
    assert_eq!(err, TransportError::Http(503));
}

#[tokio::test]
async fn test_fetch_status_bad_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/status")
        .with_status(200)
        .with_body(json!({"mode": "RUNNING"}).to_string())
        .create_async()
        .await;

    let err = transport_for(&server).fetch_status().await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn test_health_unwraps_envelope() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_body(json!({"data": {"status": "ok"}, "timestamp": "2026-01-05T10:00:00Z"}).to_string())
        .create_async()
        .await;

    let health = transport_for(&server).fetch_health().await.unwrap();
    assert!(health.is_ok());
}

#[tokio::test]
async fn test_health_accepts_bare_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_body(json!({"status": "degraded"}).to_string())
        .create_async()
        .await;

    let health = transport_for(&server).fetch_health().await.unwrap();
    assert_eq!(health.status, "degraded");
    assert!(!health.is_ok());
}

#[tokio::test]
async fn test_send_posts_flat_body_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/command")
        .match_body(Matcher::Json(json!({
            "type": "OPEN",
            "symbol": "EURUSD",
            "side": "BUY",
            "volume": 0.1
        })))
        .with_status(200)
        .with_body(json!({"data": {"accepted": true}}).to_string())
        .expect(1)
        .create_async()
        .await;

    transport_for(&server)
        .send(&Command::open("EURUSD", Side::Buy, 0.1))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_rejected_command() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/command")
        .match_body(Matcher::Json(json!({"type": "PAUSE"})))
        .with_status(400)
        .expect(1)
        .create_async()
        .await;

    let err = transport_for(&server).send(&Command::Pause).await.unwrap_err();
    assert_eq!(err, TransportError::Http(400));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_engine_is_network_error() {
    let mut config = Config::default();
    config.api.base_url = "http://127.0.0.1:1".to_string();
    let transport = HttpTransport::new(&config).unwrap();

    let err = transport.fetch_status().await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_) | TransportError::Timeout(_)));
}
