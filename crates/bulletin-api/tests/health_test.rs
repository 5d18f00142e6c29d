mod helpers;

use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_openapi_spec_served() {
    let app = setup_test_app().await;

    let response = app.server.get("/api/openapi.json").await;
    response.assert_status_ok();
    let spec: Value = response.json();
    assert_eq!(spec["info"]["title"], "Bulletin API");
    assert!(spec["paths"]["/api/upload/images"].is_object());
}
