use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::appointments, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/appointments/:id", get(appointments::get_appointment))
        .route("/api/appointments/:id/status", put(appointments::update_status))
        .route("/api/appointments/:id/cancel", post(appointments::cancel_appointment))
        .route(
            "/api/professionals/:id/appointments",
            get(appointments::professional_agenda),
        )
        .route(
            "/api/clients/me/appointments",
            get(appointments::client_appointments),
        )
}
