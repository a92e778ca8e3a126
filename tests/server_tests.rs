mod common;

use axum::body::{to_bytes, Body};
use http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{mock_gateway, MockLedger};
use eth_gateway::server::router;

async fn post(body: &'static str) -> (StatusCode, Option<String>, Vec<u8>) {
    let (gateway, _) = mock_gateway(MockLedger::default());
    let response = router(gateway)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, bytes.to_vec())
}

#[tokio::test]
async fn test_rpc_success_is_json() {
    let (status, content_type, body) =
        post(r#"{"jsonrpc":"2.0","method":"eth_chainId","id":7}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"jsonrpc": "2.0", "id": 7, "result": "0x22b8"}));
}

#[tokio::test]
async fn test_raw_error_is_plain_text_with_ok_status() {
    let (status, content_type, body) =
        post(r#"{"jsonrpc":"2.0","method":"eth_accounts","id":7}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, b"Unsupport method:eth_accounts".to_vec());
}

#[tokio::test]
async fn test_body_need_not_be_labelled_json() {
    let (gateway, _) = mock_gateway(MockLedger::default());
    let response = router(gateway)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/")
                .body(Body::from(r#"{"jsonrpc":"2.0","method":"net_version","id":1}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["result"], "8888");
}

#[tokio::test]
async fn test_health() {
    let (gateway, ledger) = mock_gateway(MockLedger::default());
    let response = router(gateway)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
    assert!(ledger.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cors_preflight() {
    let (gateway, _) = mock_gateway(MockLedger::default());
    let response = router(gateway)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/")
                .header(header::ORIGIN, "http://wallet.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
