mod helpers;

use helpers::{bare_request, body_json, make_test_app};
use tower::ServiceExt;

#[tokio::test]
async fn health_endpoint_is_public() {
    let (app, _state) = make_test_app().await;

    let response = app
        .oneshot(bare_request("GET", "/api/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
}
