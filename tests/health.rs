mod common;

use axum::http::StatusCode;
use bistro_api::routes::health::LIVENESS_MESSAGE;
use common::TestApp;

#[tokio::test]
async fn root_reports_liveness() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::Value::String(LIVENESS_MESSAGE.into()));
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Health check");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["store"], "ok");
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nope");
}
