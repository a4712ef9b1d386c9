//! Postgres implementation of the booking store traits.

use std::time::Duration;

use agenda_core::booking::DEFAULT_RESERVE_TIMEOUT;
use agenda_core::errors::TimeResult;
use agenda_core::models::{
    appointment::{
        Appointment, AppointmentStatus, NewAppointment, ReservationOutcome, ScheduledAppointment,
    },
    profile::{ClientProfile, ProfessionalProfile},
    schedule::{ScheduleOverride, WorkScheduleBlock},
    service::Service,
};
use agenda_core::store::{AppointmentStore, ProfileStore, ScheduleStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repositories::{appointment, profile, schedule};
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
    lock_timeout: Duration,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            lock_timeout: DEFAULT_RESERVE_TIMEOUT,
        }
    }

    /// Caps how long a reservation waits for the professional's booking
    /// lock. Keep it equal to the coordinator's reserve timeout.
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn work_blocks(&self, professional_id: Uuid) -> TimeResult<Vec<WorkScheduleBlock>> {
        let rows =
            schedule::get_work_schedules_by_professional_id(&self.pool, professional_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn overrides(&self, professional_id: Uuid) -> TimeResult<Vec<ScheduleOverride>> {
        let rows = schedule::get_overrides_by_professional_id(&self.pool, professional_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn appointments_between(
        &self,
        professional_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TimeResult<Vec<ScheduledAppointment>> {
        let rows =
            appointment::get_appointments_between(&self.pool, professional_id, from, to).await?;
        let scheduled = rows
            .into_iter()
            .map(|row| row.into_scheduled())
            .collect::<eyre::Result<Vec<_>>>()?;
        Ok(scheduled)
    }

    async fn insert_if_free(&self, new_appointment: NewAppointment) -> TimeResult<ReservationOutcome> {
        let inserted =
            appointment::insert_appointment_if_free(&self.pool, &new_appointment, self.lock_timeout)
                .await?;
        let outcome = match inserted {
            Some(row) => ReservationOutcome::Booked(row.into_appointment()?),
            None => ReservationOutcome::SlotTaken,
        };
        Ok(outcome)
    }

    async fn appointment(&self, id: Uuid) -> TimeResult<Option<Appointment>> {
        let row = appointment::get_appointment_by_id(&self.pool, id).await?;
        Ok(row.map(|r| r.into_appointment()).transpose()?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> TimeResult<Option<Appointment>> {
        let row =
            appointment::update_appointment_status(&self.pool, id, from.as_str(), to.as_str())
                .await?;
        Ok(row.map(|r| r.into_appointment()).transpose()?)
    }

    async fn appointments_for_professional(
        &self,
        professional_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> TimeResult<Vec<Appointment>> {
        let rows = appointment::get_appointments_by_professional_id(
            &self.pool,
            professional_id,
            status.as_ref().map(AppointmentStatus::as_str),
        )
        .await?;
        let appointments = rows
            .into_iter()
            .map(|r| r.into_appointment())
            .collect::<eyre::Result<Vec<_>>>()?;
        Ok(appointments)
    }

    async fn appointments_for_client(&self, client_id: Uuid) -> TimeResult<Vec<Appointment>> {
        let rows = appointment::get_appointments_by_client_id(&self.pool, client_id).await?;
        let appointments = rows
            .into_iter()
            .map(|r| r.into_appointment())
            .collect::<eyre::Result<Vec<_>>>()?;
        Ok(appointments)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn service(&self, id: Uuid) -> TimeResult<Option<Service>> {
        let row = profile::get_service_by_id(&self.pool, id).await?;
        Ok(row.map(Into::into))
    }

    async fn professional(&self, id: Uuid) -> TimeResult<Option<ProfessionalProfile>> {
        let Some(row) = profile::get_profile_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        if row.role != profile::ROLE_PROFESSIONAL {
            return Ok(None);
        }

        let locale = match row.local_id {
            Some(local_id) => profile::get_locale_by_id(&self.pool, local_id)
                .await?
                .map(Into::into),
            None => None,
        };

        Ok(Some(ProfessionalProfile {
            professional: row.into(),
            locale,
        }))
    }

    async fn client(&self, id: Uuid) -> TimeResult<Option<ClientProfile>> {
        let row = profile::get_profile_by_id(&self.pool, id).await?;
        Ok(row.map(Into::into))
    }
}
