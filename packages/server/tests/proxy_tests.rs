//! Proxy wire-contract tests: routed against a stub upstream bound to an
//! ephemeral local port.

use axum::{
    body::Body,
    extract::Path,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use server_core::server::{build_app, AppState};

/// Spawn a fake mail upstream; returns its base URL.
async fn spawn_upstream() -> String {
    async fn letter(Path(id): Path<String>) -> impl IntoResponse {
        Json(json!({ "letter": { "id": id, "status": "mailed" } }))
    }

    async fn mark_mailed(Path(id): Path<String>) -> impl IntoResponse {
        if id == "ltr!gone404" {
            (StatusCode::NOT_FOUND, "letter not found").into_response()
        } else {
            Json(json!({ "ok": true })).into_response()
        }
    }

    let app = Router::new()
        .route("/api/v1/letters/:id", get(letter))
        .route("/api/v1/letters/:id/mark_mailed", post(mark_mailed));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

async fn proxy_against(upstream: &str) -> Router {
    build_app(AppState::new(upstream).unwrap())
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn missing_auth_header_is_rejected() {
    let app = proxy_against(&spawn_upstream().await).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/letters/ltr!abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(response).await, "Unauthorized");
}

#[tokio::test]
async fn malformed_auth_header_is_rejected() {
    let app = proxy_against(&spawn_upstream().await).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/letters/ltr!abc")
                .header(header::AUTHORIZATION, "Basic dXNlcg==")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_id_is_rejected_before_forwarding() {
    let app = proxy_against(&spawn_upstream().await).await;

    for bad in ["..", "bad*id", "with.dots%21"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/letters/{bad}"))
                    .header(header::AUTHORIZATION, "Bearer th_api_live_x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "id {bad}");
        assert_eq!(body_string(response).await, "Invalid id");
    }
}

#[tokio::test]
async fn get_letter_relays_upstream_body() {
    let app = proxy_against(&spawn_upstream().await).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/letters/ltr!abc")
                .header(header::AUTHORIZATION, "Bearer th_api_live_x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["letter"]["id"], "ltr!abc");
    assert_eq!(body["letter"]["status"], "mailed");
}

#[tokio::test]
async fn mark_mailed_relays_upstream_status_verbatim() {
    let app = proxy_against(&spawn_upstream().await).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/letters/ltr!gone404/mark_mailed")
                .header(header::AUTHORIZATION, "Bearer th_api_live_x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "letter not found");
}

#[tokio::test]
async fn dead_upstream_becomes_502() {
    // Nothing listens on port 9 on loopback.
    let app = proxy_against("http://127.0.0.1:9").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/letters/ltr!abc/mark_mailed")
                .header(header::AUTHORIZATION, "Bearer th_api_live_x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_string(response).await, "Upstream error");
}

#[tokio::test]
async fn isolation_headers_present_on_every_response() {
    let app = proxy_against(&spawn_upstream().await).await;

    for uri in ["/api/letters/ltr!abc", "/api/health", "/", "/some/route"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::AUTHORIZATION, "Bearer th_api_live_x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["cross-origin-opener-policy"],
            "same-origin",
            "uri {uri}"
        );
        assert_eq!(
            response.headers()["cross-origin-embedder-policy"],
            "require-corp",
            "uri {uri}"
        );
    }
}

#[tokio::test]
async fn static_fallback_and_dotted_404() {
    let app = proxy_against(&spawn_upstream().await).await;

    // Client-side routes fall back to the entry document.
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");

    // Missing assets do not: a dotted path is a file, not a route.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/assets/missing.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Not found");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = proxy_against(&spawn_upstream().await).await;

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}
