//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a JSON body of the form
//! `{ "error": "...", "code": "..." }`. The `code` is stable; clients
//! switch on it (for instance `SLOT_TAKEN` means "refresh availability and
//! pick again").

use agenda_core::errors::TimeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use agenda_api::middleware::error_handling::AppError;
/// use agenda_core::errors::TimeError;
/// use axum::Json;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(TimeError::NotFound("appointment".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TimeError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TimeError::NotFound(_) => StatusCode::NOT_FOUND,
            TimeError::Validation(_) => StatusCode::BAD_REQUEST,
            TimeError::SlotTaken(_) => StatusCode::CONFLICT,
            TimeError::PolicyViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TimeError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TimeError::Authorization(_) => StatusCode::FORBIDDEN,
            TimeError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            TimeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store and internal details stay in the log.
        let message = match &self.0 {
            TimeError::Database(e) => {
                error!("Store error: {:#}", e);
                "The booking store is temporarily unavailable, please retry".to_string()
            }
            TimeError::Internal(e) => {
                error!("Internal error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "error": message, "code": self.0.code() }));

        (status, body).into_response()
    }
}

impl From<TimeError> for AppError {
    fn from(err: TimeError) -> Self {
        AppError(err)
    }
}

/// Wraps the eyre error in a `TimeError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TimeError::Database(err))
    }
}

pub fn map_error(err: TimeError) -> Response {
    AppError(err).into_response()
}
