use agenda_api::handlers::appointments::UpdateStatusRequest;
use agenda_api::handlers::booking::BookingRequest;
use agenda_core::models::appointment::{Appointment, AppointmentStatus};
use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use crate::test_utils::{as_client, as_professional, at, monday, TestApp};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

async fn book(app: &TestApp, start: DateTime<Utc>) -> Appointment {
    as_client(app.server.post("/api/bookings"), app.client.id)
        .json(&BookingRequest {
            professional_id: app.professional.id,
            service_id: app.service.id,
            appointment_time: start,
            guest: None,
        })
        .await
        .json()
}

#[rstest]
#[case::five_hours_ahead(5, StatusCode::UNPROCESSABLE_ENTITY)]
#[case::nine_hours_ahead(9, StatusCode::OK)]
#[tokio::test]
async fn test_client_cancellation_notice(#[case] hours_ahead: i64, #[case] expected: StatusCode) {
    let start = at(monday(), 10, 0);
    let app = TestApp::with_clock(start - Duration::hours(hours_ahead)).await;
    let appointment = book(&app, start).await;

    let response = as_client(
        app.server
            .post(&format!("/api/appointments/{}/cancel", appointment.id)),
        app.client.id,
    )
    .await;

    assert_eq!(response.status_code(), expected);
}

#[tokio::test]
async fn test_professional_confirms_appointment() {
    let app = TestApp::new().await;
    let appointment = book(&app, at(monday(), 10, 0)).await;

    let response = as_professional(
        app.server
            .put(&format!("/api/appointments/{}/status", appointment.id)),
        app.professional.id,
    )
    .json(&UpdateStatusRequest {
        status: AppointmentStatus::Confirmed,
    })
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Appointment = response.json();
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn test_status_accepts_wire_names() {
    let app = TestApp::new().await;
    let appointment = book(&app, at(monday(), 10, 0)).await;

    let response = as_professional(
        app.server
            .put(&format!("/api/appointments/{}/status", appointment.id)),
        app.professional.id,
    )
    .json(&serde_json::json!({ "status": "completada" }))
    .await;

    // agendada cannot jump straight to completada
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_client_cannot_confirm() {
    let app = TestApp::new().await;
    let appointment = book(&app, at(monday(), 10, 0)).await;

    let response = as_client(
        app.server
            .put(&format!("/api/appointments/{}/status", appointment.id)),
        app.client.id,
    )
    .json(&UpdateStatusRequest {
        status: AppointmentStatus::Confirmed,
    })
    .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_other_professional_is_forbidden() {
    let app = TestApp::new().await;
    let appointment = book(&app, at(monday(), 10, 0)).await;

    let view = as_professional(
        app.server.get(&format!("/api/appointments/{}", appointment.id)),
        Uuid::new_v4(),
    )
    .await;
    let cancel = as_professional(
        app.server
            .post(&format!("/api/appointments/{}/cancel", appointment.id)),
        Uuid::new_v4(),
    )
    .await;

    assert_eq!(view.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(cancel.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_claims_are_unauthorized() {
    let app = TestApp::new().await;
    let appointment = book(&app, at(monday(), 10, 0)).await;

    let response = app
        .server
        .get(&format!("/api/appointments/{}", appointment.id))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_appointment_is_not_found() {
    let app = TestApp::new().await;

    let response = as_client(
        app.server.get(&format!("/api/appointments/{}", Uuid::new_v4())),
        app.client.id,
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agenda_filters_by_status() {
    let app = TestApp::new().await;
    let first = book(&app, at(monday(), 9, 0)).await;
    book(&app, at(monday(), 11, 0)).await;
    as_professional(
        app.server.put(&format!("/api/appointments/{}/status", first.id)),
        app.professional.id,
    )
    .json(&UpdateStatusRequest {
        status: AppointmentStatus::Confirmed,
    })
    .await;

    let confirmed: Vec<Appointment> = as_professional(
        app.server
            .get(&format!("/api/professionals/{}/appointments", app.professional.id))
            .add_query_param("status", "confirmada"),
        app.professional.id,
    )
    .await
    .json();
    let all: Vec<Appointment> = as_professional(
        app.server
            .get(&format!("/api/professionals/{}/appointments", app.professional.id)),
        app.professional.id,
    )
    .await
    .json();

    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].id, first.id);
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_client_sees_upcoming_appointments() {
    let app = TestApp::new().await;
    let appointment = book(&app, at(monday(), 9, 0)).await;

    let body: serde_json::Value = as_client(
        app.server.get("/api/clients/me/appointments"),
        app.client.id,
    )
    .await
    .json();

    assert_eq!(body["upcoming"].as_array().unwrap().len(), 1);
    assert_eq!(body["upcoming"][0]["id"], appointment.id.to_string());
    assert!(body["past"].as_array().unwrap().is_empty());
}
