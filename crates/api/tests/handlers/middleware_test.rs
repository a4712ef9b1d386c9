use agenda_api::middleware::auth::{actor_from_headers, ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
use agenda_api::middleware::error_handling::{map_error, AppError};
use agenda_core::errors::TimeError;
use agenda_core::policy::{Actor, Role};
use axum::body::to_bytes;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

#[rstest]
#[case(TimeError::NotFound("appointment".into()), StatusCode::NOT_FOUND)]
#[case(TimeError::Validation("bad date".into()), StatusCode::BAD_REQUEST)]
#[case(TimeError::SlotTaken("10:00".into()), StatusCode::CONFLICT)]
#[case(TimeError::PolicyViolation("too late".into()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(TimeError::Authentication("no claims".into()), StatusCode::UNAUTHORIZED)]
#[case(TimeError::Authorization("not yours".into()), StatusCode::FORBIDDEN)]
#[case(TimeError::Database(eyre::eyre!("pool timed out")), StatusCode::SERVICE_UNAVAILABLE)]
#[case(
    TimeError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: TimeError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_slot_taken_body_carries_code() {
    let response = AppError(TimeError::SlotTaken("10:00".into())).into_response();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "SLOT_TAKEN");
}

#[tokio::test]
async fn test_store_error_details_are_not_exposed() {
    let response = AppError(TimeError::Database(eyre::eyre!("password authentication failed")))
        .into_response();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(!text.contains("password authentication failed"));
    assert!(text.contains("STORE_UNAVAILABLE"));
}

fn headers(id: &str, role: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACTOR_ID_HEADER, HeaderValue::from_str(id).unwrap());
    headers.insert(ACTOR_ROLE_HEADER, HeaderValue::from_str(role).unwrap());
    headers
}

#[test]
fn test_claims_resolve_to_actor() {
    let id = Uuid::new_v4();

    let actor = actor_from_headers(&headers(&id.to_string(), "professional")).unwrap();

    assert_eq!(actor, Actor { id, role: Role::Professional });
}

#[rstest]
#[case::bad_id("not-a-uuid", "client")]
#[case::unknown_role("6f1c1f0e-54a2-4c55-9d1e-2b8f0c1f9a10", "admin")]
#[case::blank_role("6f1c1f0e-54a2-4c55-9d1e-2b8f0c1f9a10", " ")]
fn test_malformed_claims_are_unauthenticated(#[case] id: &str, #[case] role: &str) {
    let result = actor_from_headers(&headers(id, role));

    assert!(matches!(result, Err(TimeError::Authentication(_))));
}

#[test]
fn test_missing_claims_are_unauthenticated() {
    assert!(matches!(
        actor_from_headers(&HeaderMap::new()),
        Err(TimeError::Authentication(_))
    ));
}
