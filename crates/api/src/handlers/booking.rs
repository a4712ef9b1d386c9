use std::sync::Arc;

use agenda_core::booking::ReserveSlotRequest;
use agenda_core::errors::TimeError;
use agenda_core::models::appointment::{
    Appointment, ClientIdentity, GuestContact, ReservationOutcome,
};
use agenda_core::policy::Role;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    middleware::{auth::SessionActor, error_handling::AppError},
    ApiState,
};

/// Body of `POST /api/bookings`.
///
/// Without `guest` the booking is made for the signed-in client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub appointment_time: DateTime<Utc>,
    #[serde(default)]
    pub guest: Option<GuestContact>,
}

fn client_identity(
    guest: Option<GuestContact>,
    actor: Option<SessionActor>,
) -> Result<ClientIdentity, TimeError> {
    match (guest, actor) {
        (Some(guest), _) => Ok(ClientIdentity::Guest(guest)),
        (None, Some(SessionActor(actor))) if actor.role == Role::Client => {
            Ok(ClientIdentity::Registered { client_id: actor.id })
        }
        (None, Some(_)) => Err(TimeError::Authorization(
            "Only clients can book for themselves; provide guest details instead".to_string(),
        )),
        (None, None) => Err(TimeError::Authentication(
            "Sign in as a client or provide guest contact details".to_string(),
        )),
    }
}

/// `POST /api/bookings`: 201 with the appointment, or 409 `SLOT_TAKEN`.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    actor: Option<SessionActor>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let Json(payload) = payload.map_err(|e| AppError(TimeError::Validation(e.body_text())))?;
    let client = client_identity(payload.guest, actor)?;

    let request = ReserveSlotRequest {
        professional_id: payload.professional_id,
        service_id: payload.service_id,
        appointment_time: payload.appointment_time,
        client,
    };

    match state.coordinator.reserve_slot(request, state.now()).await? {
        ReservationOutcome::Booked(appointment) => Ok((StatusCode::CREATED, Json(appointment))),
        ReservationOutcome::SlotTaken => Err(AppError(TimeError::SlotTaken(
            "This time was just booked by someone else; pick another slot".to_string(),
        ))),
    }
}
