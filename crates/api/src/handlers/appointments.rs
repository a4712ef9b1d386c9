//! # Appointment Handlers
//!
//! Lookup, listings and status changes. Every endpoint requires session
//! claims; the coordinator decides what the caller may see or change.

use std::sync::Arc;

use agenda_core::errors::TimeError;
use agenda_core::models::appointment::{Appointment, AppointmentStatus, ClientAppointments};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    middleware::{auth::SessionActor, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgendaQuery {
    pub status: Option<AppointmentStatus>,
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    SessionActor(actor): SessionActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.coordinator.appointment(id, &actor).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    SessionActor(actor): SessionActor,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError(TimeError::Validation(e.body_text())))?;

    let appointment = state
        .coordinator
        .transition(id, &actor, payload.status, state.now())
        .await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    SessionActor(actor): SessionActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.coordinator.cancel(id, &actor, state.now()).await?;
    Ok(Json(appointment))
}

/// `GET /api/professionals/:id/appointments?status=`
#[axum::debug_handler]
pub async fn professional_agenda(
    State(state): State<Arc<ApiState>>,
    SessionActor(actor): SessionActor,
    Path(professional_id): Path<Uuid>,
    query: Result<Query<AgendaQuery>, QueryRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let Query(query) = query.map_err(|e| AppError(TimeError::Validation(e.body_text())))?;

    let appointments = state
        .coordinator
        .professional_agenda(&actor, professional_id, query.status)
        .await?;
    Ok(Json(appointments))
}

/// `GET /api/clients/me/appointments`
#[axum::debug_handler]
pub async fn client_appointments(
    State(state): State<Arc<ApiState>>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ClientAppointments>, AppError> {
    let appointments = state
        .coordinator
        .client_appointments(&actor, state.now())
        .await?;
    Ok(Json(appointments))
}
