//! Rules for moving an appointment between statuses.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TimeError, TimeResult};
use crate::models::appointment::{Appointment, AppointmentStatus};

/// Minimum lead time for a client-initiated cancellation.
pub const CLIENT_CANCELLATION_NOTICE_HOURS: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Professional,
}

/// The party requesting a change, as asserted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn client(id: Uuid) -> Self {
        Self { id, role: Role::Client }
    }

    pub fn professional(id: Uuid) -> Self {
        Self { id, role: Role::Professional }
    }
}

/// Checks whether `actor` may move `appointment` to `target` at `now`.
///
/// Clients may only cancel their own appointments, and only more than
/// [`CLIENT_CANCELLATION_NOTICE_HOURS`] before the start. Professionals may
/// confirm or cancel an `agendada` appointment and complete a `confirmada`
/// one once its start has passed.
pub fn check_transition(
    appointment: &Appointment,
    actor: &Actor,
    target: AppointmentStatus,
    now: DateTime<Utc>,
) -> TimeResult<()> {
    use AppointmentStatus::*;

    match actor.role {
        Role::Client => {
            if appointment.client.client_id() != Some(actor.id) {
                return Err(TimeError::Authorization(
                    "Clients may only change their own appointments".to_string(),
                ));
            }
            if target != Cancelled {
                return Err(TimeError::PolicyViolation(format!(
                    "Clients may only cancel appointments, not move them to '{}'",
                    target
                )));
            }
            if !matches!(appointment.status, Scheduled | Confirmed) {
                return Err(TimeError::PolicyViolation(format!(
                    "A '{}' appointment cannot be cancelled",
                    appointment.status
                )));
            }
            let notice = Duration::hours(CLIENT_CANCELLATION_NOTICE_HOURS);
            if appointment.appointment_time - now <= notice {
                return Err(TimeError::PolicyViolation(format!(
                    "Appointments can only be cancelled more than {} hours in advance",
                    CLIENT_CANCELLATION_NOTICE_HOURS
                )));
            }
            Ok(())
        }
        Role::Professional => {
            if appointment.professional_id != actor.id {
                return Err(TimeError::Authorization(
                    "Professionals may only change their own appointments".to_string(),
                ));
            }
            match (appointment.status, target) {
                (Scheduled, Confirmed) | (Scheduled, Cancelled) => Ok(()),
                (Confirmed, Completed) if appointment.appointment_time < now => Ok(()),
                (Confirmed, Completed) => Err(TimeError::PolicyViolation(
                    "An appointment cannot be completed before it starts".to_string(),
                )),
                (from, to) => Err(TimeError::PolicyViolation(format!(
                    "Invalid status transition from '{}' to '{}'",
                    from, to
                ))),
            }
        }
    }
}
