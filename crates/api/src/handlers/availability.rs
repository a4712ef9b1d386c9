//! # Availability Handlers
//!
//! Open start times of a professional for one service on one date. Slots
//! are `HH:MM` wall-clock times in the platform timezone.

use std::sync::Arc;

use agenda_core::availability::DayAvailability;
use agenda_core::errors::TimeError;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub service_id: Uuid,
    /// Calendar date, `YYYY-MM-DD`
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub timezone: String,
    /// `day_off`, `no_working_hours` or `open`
    pub status: String,
    pub slots: Vec<String>,
}

impl AvailabilityResponse {
    fn new(
        professional_id: Uuid,
        query: &AvailabilityQuery,
        timezone: String,
        availability: &DayAvailability,
    ) -> Self {
        let status = match availability {
            DayAvailability::DayOff => "day_off",
            DayAvailability::NoWorkingHours => "no_working_hours",
            DayAvailability::Open(_) => "open",
        };
        Self {
            professional_id,
            service_id: query.service_id,
            date: query.date,
            timezone,
            status: status.to_string(),
            slots: availability
                .slots()
                .iter()
                .map(|slot| slot.format("%H:%M").to_string())
                .collect(),
        }
    }
}

/// `GET /api/professionals/:id/availability?service_id=&date=`
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(professional_id): Path<Uuid>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError(TimeError::Validation(e.body_text())))?;

    let availability = state
        .coordinator
        .available_slots(professional_id, query.service_id, query.date, state.now())
        .await?;

    Ok(Json(AvailabilityResponse::new(
        professional_id,
        &query,
        state.coordinator.timezone().name().to_string(),
        &availability,
    )))
}
