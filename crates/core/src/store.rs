//! Storage seams for the booking core.
//!
//! Reads are idempotent. `insert_if_free` is the only write that must be
//! atomic: the overlap check and the insert run as one unit per
//! professional, so two reservations for overlapping intervals of the same
//! professional can never both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::TimeResult;
use crate::models::{
    appointment::{
        Appointment, AppointmentStatus, NewAppointment, ReservationOutcome, ScheduledAppointment,
    },
    profile::{ClientProfile, ProfessionalProfile},
    schedule::{ScheduleOverride, WorkScheduleBlock},
    service::Service,
};

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn work_blocks(&self, professional_id: Uuid) -> TimeResult<Vec<WorkScheduleBlock>>;

    async fn overrides(&self, professional_id: Uuid) -> TimeResult<Vec<ScheduleOverride>>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Appointments of any status whose start lies in `[from, to)`, each
    /// joined with its service duration, ordered by start.
    async fn appointments_between(
        &self,
        professional_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TimeResult<Vec<ScheduledAppointment>>;

    /// Inserts the appointment in `agendada` unless a non-cancelled
    /// appointment of the same professional overlaps its interval.
    async fn insert_if_free(&self, appointment: NewAppointment) -> TimeResult<ReservationOutcome>;

    async fn appointment(&self, id: Uuid) -> TimeResult<Option<Appointment>>;

    /// Compare-and-set status write. Returns `None` when the appointment
    /// no longer has status `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> TimeResult<Option<Appointment>>;

    async fn appointments_for_professional(
        &self,
        professional_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> TimeResult<Vec<Appointment>>;

    async fn appointments_for_client(&self, client_id: Uuid) -> TimeResult<Vec<Appointment>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn service(&self, id: Uuid) -> TimeResult<Option<Service>>;

    async fn professional(&self, id: Uuid) -> TimeResult<Option<ProfessionalProfile>>;

    async fn client(&self, id: Uuid) -> TimeResult<Option<ClientProfile>>;
}

/// Everything the booking coordinator reads and writes.
pub trait BookingStore: ScheduleStore + AppointmentStore + ProfileStore {}

impl<T> BookingStore for T where T: ScheduleStore + AppointmentStore + ProfileStore {}
