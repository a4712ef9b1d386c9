use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TimeError;

/// Lifecycle of an appointment. Serialized with the platform's Spanish
/// status names, which are also the values stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "agendada")]
    Scheduled,
    #[serde(rename = "confirmada")]
    Confirmed,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "agendada",
            AppointmentStatus::Confirmed => "confirmada",
            AppointmentStatus::Completed => "completada",
            AppointmentStatus::Cancelled => "cancelada",
        }
    }

    /// Whether the appointment still occupies its interval.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agendada" => Ok(AppointmentStatus::Scheduled),
            "confirmada" => Ok(AppointmentStatus::Confirmed),
            "completada" => Ok(AppointmentStatus::Completed),
            "cancelada" => Ok(AppointmentStatus::Cancelled),
            other => Err(TimeError::Validation(format!(
                "Unknown appointment status '{}'",
                other
            ))),
        }
    }
}

/// Contact details of a client booking without an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl GuestContact {
    pub fn validate(&self) -> Result<(), TimeError> {
        if self.name.trim().is_empty() {
            return Err(TimeError::Validation("Guest name is required".to_string()));
        }
        let email = self.email.trim();
        let plausible = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !plausible {
            return Err(TimeError::Validation(format!(
                "Guest email '{}' is not valid",
                self.email
            )));
        }
        if self.phone.trim().is_empty() {
            return Err(TimeError::Validation("Guest phone is required".to_string()));
        }
        Ok(())
    }
}

/// Who the appointment is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientIdentity {
    Registered { client_id: Uuid },
    Guest(GuestContact),
}

impl ClientIdentity {
    pub fn client_id(&self) -> Option<Uuid> {
        match self {
            ClientIdentity::Registered { client_id } => Some(*client_id),
            ClientIdentity::Guest(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub client: ClientIdentity,
    pub appointment_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// An appointment about to be inserted, with the duration of its service so
/// the store can check the full interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub client: ClientIdentity,
    pub appointment_time: DateTime<Utc>,
    pub duration_minutes: i32,
}

impl NewAppointment {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.appointment_time + Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn into_appointment(self, id: Uuid, created_at: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            professional_id: self.professional_id,
            service_id: self.service_id,
            client: self.client,
            appointment_time: self.appointment_time,
            status: AppointmentStatus::Scheduled,
            created_at,
        }
    }
}

/// An existing appointment joined with its own service duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAppointment {
    pub appointment: Appointment,
    pub duration_minutes: i32,
}

impl ScheduledAppointment {
    pub fn start(&self) -> DateTime<Utc> {
        self.appointment.appointment_time
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start() + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Closed-open overlap with `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.appointment.status.holds_slot() && start < self.end() && end > self.start()
    }
}

/// Result of an atomic reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOutcome {
    Booked(Appointment),
    SlotTaken,
}

/// A client's appointments split around the current instant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientAppointments {
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}
