use agenda_api::handlers::booking::BookingRequest;
use agenda_core::models::appointment::{Appointment, AppointmentStatus, ClientIdentity, GuestContact};
use axum::http::StatusCode;
use crate::test_utils::{as_client, as_professional, at, monday, TestApp};
use pretty_assertions::assert_eq;

fn booking(app: &TestApp, h: u32, m: u32) -> BookingRequest {
    BookingRequest {
        professional_id: app.professional.id,
        service_id: app.service.id,
        appointment_time: at(monday(), h, m),
        guest: None,
    }
}

#[tokio::test]
async fn test_client_books_open_slot() {
    let app = TestApp::new().await;

    let response = as_client(app.server.post("/api/bookings"), app.client.id)
        .json(&booking(&app, 10, 0))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let appointment: Appointment = response.json();
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    assert_eq!(
        appointment.client,
        ClientIdentity::Registered {
            client_id: app.client.id
        }
    );
}

#[tokio::test]
async fn test_second_booking_of_slot_conflicts() {
    let app = TestApp::new().await;
    as_client(app.server.post("/api/bookings"), app.client.id)
        .json(&booking(&app, 10, 0))
        .await;

    let response = as_client(app.server.post("/api/bookings"), app.client.id)
        .json(&booking(&app, 10, 0))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SLOT_TAKEN");
}

#[tokio::test]
async fn test_guest_books_without_session() {
    let app = TestApp::new().await;
    let mut request = booking(&app, 11, 0);
    request.guest = Some(GuestContact {
        name: "Pedro Sánchez".to_string(),
        email: "pedro@example.com".to_string(),
        phone: "600111222".to_string(),
    });

    let response = app.server.post("/api/bookings").json(&request).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let appointment: Appointment = response.json();
    assert!(matches!(appointment.client, ClientIdentity::Guest(_)));
}

#[tokio::test]
async fn test_anonymous_booking_without_guest_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.server.post("/api/bookings").json(&booking(&app, 10, 0)).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_professional_cannot_book_as_client() {
    let app = TestApp::new().await;

    let response = as_professional(app.server.post("/api/bookings"), app.professional.id)
        .json(&booking(&app, 10, 0))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_off_schedule_time_is_bad_request() {
    let app = TestApp::new().await;

    let response = as_client(app.server.post("/api/bookings"), app.client.id)
        .json(&booking(&app, 12, 0))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booked_slot_leaves_availability() {
    let app = TestApp::new().await;
    as_client(app.server.post("/api/bookings"), app.client.id)
        .json(&booking(&app, 9, 30))
        .await;

    let body: serde_json::Value = app
        .server
        .get(&format!("/api/professionals/{}/availability", app.professional.id))
        .add_query_param("service_id", app.service.id)
        .add_query_param("date", monday())
        .await
        .json();

    let slots: Vec<&str> = body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot.as_str().unwrap())
        .collect();
    assert_eq!(slots, vec!["09:00", "10:00", "10:30", "11:00", "11:30"]);
}
