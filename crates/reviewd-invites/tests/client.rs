//! Integration tests for `InvitesClient` using wiremock HTTP mocks.

use reviewd_invites::{InviteError, InvitesClient};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> InvitesClient {
    InvitesClient::new(base_url, 30).expect("client construction should not fail")
}

#[tokio::test]
async fn validate_returns_upstream_payload_unmodified() {
    let server = MockServer::start().await;

    let upstream = serde_json::json!({
        "valid": true,
        "invitation": {
            "productId": "prod-1",
            "shop": "store.example",
            "customerEmail": "buyer@example.com"
        }
    });

    Mock::given(method("POST"))
        .and(path("/api/validate-invitation"))
        .and(body_json(serde_json::json!({
            "token": "tok-123",
            "productId": "prod-1",
            "shop": "store.example"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&upstream))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client
        .validate("tok-123", Some("prod-1"), Some("store.example"))
        .await
        .expect("validation should succeed");

    assert_eq!(payload, upstream);
}

#[tokio::test]
async fn validate_preserves_upstream_status_and_body_on_failure() {
    let server = MockServer::start().await;

    let upstream = serde_json::json!({ "valid": false, "error": "Invitation expired" });

    Mock::given(method("POST"))
        .and(path("/api/validate-invitation"))
        .respond_with(ResponseTemplate::new(410).set_body_json(&upstream))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .validate("tok-expired", None, None)
        .await
        .expect_err("should surface the upstream failure");

    match err {
        InviteError::Upstream { status, body } => {
            assert_eq!(status, 410);
            assert_eq!(body["error"], "Invitation expired");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/validate-invitation"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .validate("tok", None, None)
        .await
        .expect_err("html body should not parse");

    assert!(matches!(err, InviteError::Deserialize { .. }));
}

#[tokio::test]
async fn mark_responded_posts_token_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/mark-responded"))
        .and(body_json(serde_json::json!({ "token": "tok-123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client
        .mark_responded("tok-123")
        .await
        .expect("mark responded should succeed");

    assert_eq!(payload["ok"], true);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    // Port 9 (discard) is a safe dead endpoint.
    let client = test_client("http://127.0.0.1:9");
    let err = client
        .mark_responded("tok")
        .await
        .expect_err("connection should fail");
    assert!(matches!(err, InviteError::Http(_)));
}
