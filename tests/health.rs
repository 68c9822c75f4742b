use axum::http::{Method, StatusCode};
use storefront_api::routes::health::health_check;

mod common;

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert!(response.0.success);

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn unknown_path_is_a_404_envelope() {
    let app = common::TestApp::new();
    let resp = app.send(Method::GET, "/nope", None, None).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["success"], false);
}
