mod common;

use axum::http::StatusCode;

use common::app::spawn_test_app;
use common::http::get_json;

#[tokio::test]
async fn it_health_reports_version_and_uptime() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptimeSecs"].is_u64());
}

#[tokio::test]
async fn it_health_probes() {
    let app = spawn_test_app().await;
    let (live, _) = get_json(&app.app, "/health/live").await;
    assert_eq!(live, StatusCode::OK);
    let (ready, _) = get_json(&app.app, "/health/ready").await;
    assert_eq!(ready, StatusCode::OK);

    let (status, db) = get_json(&app.app, "/health/database").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db["healthy"], true);
}

#[tokio::test]
async fn it_unknown_route_is_json_404() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}
