//! # Session Claims
//!
//! The identity gateway in front of the API authenticates the caller and
//! forwards the verified claims as headers. This module only reads them;
//! it never issues or checks credentials.

use agenda_core::errors::TimeError;
use agenda_core::policy::{Actor, Role};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use uuid::Uuid;

use super::error_handling::AppError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for SessionActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_headers(&parts.headers).map(SessionActor).map_err(AppError)
    }
}

pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, TimeError> {
    let id = header_value(headers, ACTOR_ID_HEADER)?;
    let id = Uuid::parse_str(id).map_err(|_| {
        TimeError::Authentication(format!("{} is not a valid identifier", ACTOR_ID_HEADER))
    })?;

    let role = match header_value(headers, ACTOR_ROLE_HEADER)? {
        "client" => Role::Client,
        "professional" => Role::Professional,
        other => {
            return Err(TimeError::Authentication(format!(
                "Unknown role '{}'",
                other
            )));
        }
    };

    Ok(Actor { id, role })
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, TimeError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| TimeError::Authentication(format!("Missing {} header", name)))
}
