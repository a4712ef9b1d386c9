use agenda_api::handlers::availability::AvailabilityResponse;
use axum::http::StatusCode;
use crate::test_utils::{monday, TestApp};
use pretty_assertions::assert_eq;
use uuid::Uuid;

#[test_log::test(tokio::test)]
async fn test_monday_lists_half_hour_slots() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get(&format!("/api/professionals/{}/availability", app.professional.id))
        .add_query_param("service_id", app.service.id)
        .add_query_param("date", monday())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: AvailabilityResponse = response.json();
    assert_eq!(body.status, "open");
    assert_eq!(body.timezone, "UTC");
    assert_eq!(
        body.slots,
        vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
    );
}

#[tokio::test]
async fn test_day_without_blocks_reports_no_working_hours() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get(&format!("/api/professionals/{}/availability", app.professional.id))
        .add_query_param("service_id", app.service.id)
        .add_query_param("date", "2026-10-20")
        .await;

    let body: AvailabilityResponse = response.json();
    assert_eq!(body.status, "no_working_hours");
    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn test_malformed_date_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get(&format!("/api/professionals/{}/availability", app.professional.id))
        .add_query_param("service_id", app.service.id)
        .add_query_param("date", "19/10/2026")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALIDATION");
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get(&format!("/api/professionals/{}/availability", app.professional.id))
        .add_query_param("service_id", Uuid::new_v4())
        .add_query_param("date", monday())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_version() {
    let app = TestApp::new().await;

    let health: serde_json::Value = app.server.get("/health").await.json();
    let version: serde_json::Value = app.server.get("/version").await.json();

    assert_eq!(health["status"], "ok");
    assert_eq!(version["name"], "agenda-api");
}
