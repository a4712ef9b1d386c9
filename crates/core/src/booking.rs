//! # Booking Coordinator
//!
//! Turns a chosen slot into a persisted appointment and drives later status
//! changes.
//!
//! A reservation is validated against the professional's schedule first,
//! then handed to [`AppointmentStore::insert_if_free`], which re-checks for
//! overlapping live appointments and inserts as one atomic unit. Losing that
//! race yields [`ReservationOutcome::SlotTaken`], an expected outcome rather
//! than a failure. The confirmation message is sent on a detached task after
//! the commit.
//!
//! [`AppointmentStore::insert_if_free`]: crate::store::AppointmentStore::insert_if_free

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use eyre::eyre;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::availability::{self, DayAvailability, SlotQuery};
use crate::errors::{TimeError, TimeResult};
use crate::models::{
    appointment::{
        Appointment, AppointmentStatus, ClientAppointments, ClientIdentity, NewAppointment,
        ReservationOutcome,
    },
    profile::ProfessionalProfile,
    service::Service,
};
use crate::notify::{self, BookingConfirmation, Notifier};
use crate::policy::{self, Actor, Role};
use crate::store::{AppointmentStore, BookingStore, ProfileStore, ScheduleStore};

/// Upper bound for one reservation attempt, lock wait included.
pub const DEFAULT_RESERVE_TIMEOUT: StdDuration = StdDuration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSlotRequest {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub appointment_time: DateTime<Utc>,
    pub client: ClientIdentity,
}

pub struct BookingCoordinator {
    store: Arc<dyn BookingStore>,
    notifier: Arc<dyn Notifier>,
    timezone: Tz,
    reserve_timeout: StdDuration,
}

impl BookingCoordinator {
    pub fn new(store: Arc<dyn BookingStore>, notifier: Arc<dyn Notifier>, timezone: Tz) -> Self {
        Self {
            store,
            notifier,
            timezone,
            reserve_timeout: DEFAULT_RESERVE_TIMEOUT,
        }
    }

    pub fn with_reserve_timeout(mut self, reserve_timeout: StdDuration) -> Self {
        self.reserve_timeout = reserve_timeout;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Open slots for `service_id` with `professional_id` on `date`.
    pub async fn available_slots(
        &self,
        professional_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> TimeResult<DayAvailability> {
        let (_, service) = self.offered_service(professional_id, service_id).await?;

        let blocks = self.store.work_blocks(professional_id).await?;
        let overrides = self.store.overrides(professional_id).await?;
        let (from, to) = availability::appointment_window(date, self.timezone)?;
        let appointments = self
            .store
            .appointments_between(professional_id, from, to)
            .await?;

        debug!(
            "Computing availability: professional={}, service={}, date={}, blocks={}, appointments={}",
            professional_id,
            service_id,
            date,
            blocks.len(),
            appointments.len()
        );

        availability::compute_available_slots(&SlotQuery {
            professional_id,
            service_duration_minutes: service.duration_minutes,
            target_date: date,
            schedule_blocks: &blocks,
            overrides: &overrides,
            existing_appointments: &appointments,
            now,
            timezone: self.timezone,
        })
    }

    /// Reserves the slot starting at `request.appointment_time`.
    ///
    /// Returns `SlotTaken` when a live appointment of the professional
    /// overlaps the requested interval at commit time.
    pub async fn reserve_slot(
        &self,
        request: ReserveSlotRequest,
        now: DateTime<Utc>,
    ) -> TimeResult<ReservationOutcome> {
        let (client_name, client_email) = self.client_contact(&request.client).await?;

        if request.appointment_time <= now {
            return Err(TimeError::Validation(
                "Appointments cannot be booked in the past".to_string(),
            ));
        }

        let (profile, service) = self
            .offered_service(request.professional_id, request.service_id)
            .await?;
        self.ensure_bookable(&request, &service, now).await?;

        let new_appointment = NewAppointment {
            professional_id: request.professional_id,
            service_id: request.service_id,
            client: request.client,
            appointment_time: request.appointment_time,
            duration_minutes: service.duration_minutes,
        };

        let outcome = tokio::time::timeout(
            self.reserve_timeout,
            self.store.insert_if_free(new_appointment),
        )
        .await
        .map_err(|_| {
            TimeError::Database(eyre!(
                "Reservation did not complete within {:?}",
                self.reserve_timeout
            ))
        })??;

        match &outcome {
            ReservationOutcome::Booked(appointment) => {
                info!(
                    "Appointment booked: id={}, professional={}, start={}",
                    appointment.id, appointment.professional_id, appointment.appointment_time
                );
                let local = appointment
                    .appointment_time
                    .with_timezone(&self.timezone)
                    .naive_local();
                let confirmation = BookingConfirmation {
                    client_email,
                    client_name,
                    professional_name: profile.professional.full_name.clone(),
                    service_name: service.name.clone(),
                    appointment_time: notify::format_appointment_time(local),
                    location_address: profile.locale.as_ref().and_then(|l| l.address.clone()),
                    location_phone: profile.locale.as_ref().and_then(|l| l.phone.clone()),
                };
                self.dispatch_confirmation(appointment.id, confirmation);
            }
            ReservationOutcome::SlotTaken => {
                info!(
                    "Slot taken: professional={}, start={}",
                    request.professional_id, request.appointment_time
                );
            }
        }

        Ok(outcome)
    }

    /// Moves an appointment to `target` if the policy allows it.
    pub async fn transition(
        &self,
        appointment_id: Uuid,
        actor: &Actor,
        target: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> TimeResult<Appointment> {
        let appointment = self.find_appointment(appointment_id).await?;
        policy::check_transition(&appointment, actor, target, now)?;

        let updated = self
            .store
            .update_status(appointment_id, appointment.status, target)
            .await?
            .ok_or_else(|| {
                TimeError::PolicyViolation(format!(
                    "Appointment {} changed status concurrently; reload and retry",
                    appointment_id
                ))
            })?;

        info!(
            "Appointment {} moved from '{}' to '{}' by {:?} {}",
            appointment_id, appointment.status, updated.status, actor.role, actor.id
        );
        Ok(updated)
    }

    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> TimeResult<Appointment> {
        self.transition(appointment_id, actor, AppointmentStatus::Cancelled, now)
            .await
    }

    /// An appointment, visible to its client and its professional.
    pub async fn appointment(&self, appointment_id: Uuid, actor: &Actor) -> TimeResult<Appointment> {
        let appointment = self.find_appointment(appointment_id).await?;
        let is_party = match actor.role {
            Role::Client => appointment.client.client_id() == Some(actor.id),
            Role::Professional => appointment.professional_id == actor.id,
        };
        if !is_party {
            return Err(TimeError::Authorization(
                "Only the client or the professional may view this appointment".to_string(),
            ));
        }
        Ok(appointment)
    }

    /// A professional's own agenda, optionally filtered by status.
    pub async fn professional_agenda(
        &self,
        actor: &Actor,
        professional_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> TimeResult<Vec<Appointment>> {
        if actor.role != Role::Professional || actor.id != professional_id {
            return Err(TimeError::Authorization(
                "Only the professional may view their agenda".to_string(),
            ));
        }
        let mut appointments = self
            .store
            .appointments_for_professional(professional_id, status)
            .await?;
        appointments.sort_by_key(|a| a.appointment_time);
        Ok(appointments)
    }

    /// The acting client's appointments: upcoming soonest first, past most
    /// recent first.
    pub async fn client_appointments(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> TimeResult<ClientAppointments> {
        if actor.role != Role::Client {
            return Err(TimeError::Authorization(
                "Only clients have a booking history".to_string(),
            ));
        }
        let (mut upcoming, mut past): (Vec<_>, Vec<_>) = self
            .store
            .appointments_for_client(actor.id)
            .await?
            .into_iter()
            .partition(|a| a.appointment_time >= now);
        upcoming.sort_by_key(|a| a.appointment_time);
        past.sort_by(|a, b| b.appointment_time.cmp(&a.appointment_time));
        Ok(ClientAppointments { upcoming, past })
    }

    async fn find_appointment(&self, appointment_id: Uuid) -> TimeResult<Appointment> {
        self.store
            .appointment(appointment_id)
            .await?
            .ok_or_else(|| {
                TimeError::NotFound(format!("Appointment with ID {} not found", appointment_id))
            })
    }

    async fn offered_service(
        &self,
        professional_id: Uuid,
        service_id: Uuid,
    ) -> TimeResult<(ProfessionalProfile, Service)> {
        let profile = self
            .store
            .professional(professional_id)
            .await?
            .ok_or_else(|| {
                TimeError::NotFound(format!("Professional with ID {} not found", professional_id))
            })?;
        let service = self
            .store
            .service(service_id)
            .await?
            .ok_or_else(|| TimeError::NotFound(format!("Service with ID {} not found", service_id)))?;

        if !service.is_offered_by(&profile.professional) {
            return Err(TimeError::Validation(format!(
                "Service {} is not offered by professional {}",
                service_id, professional_id
            )));
        }
        if service.duration_minutes <= 0 {
            return Err(TimeError::Validation(format!(
                "Service {} has an invalid duration of {} minutes",
                service_id, service.duration_minutes
            )));
        }
        Ok((profile, service))
    }

    async fn client_contact(&self, client: &ClientIdentity) -> TimeResult<(String, String)> {
        match client {
            ClientIdentity::Guest(guest) => {
                guest.validate()?;
                Ok((guest.name.trim().to_string(), guest.email.trim().to_string()))
            }
            ClientIdentity::Registered { client_id } => {
                let profile = self.store.client(*client_id).await?.ok_or_else(|| {
                    TimeError::NotFound(format!("Client with ID {} not found", client_id))
                })?;
                Ok((profile.full_name, profile.email))
            }
        }
    }

    /// The requested start must be one of the slots the schedule offers,
    /// bookings aside. Conflicts are left to the atomic insert.
    async fn ensure_bookable(
        &self,
        request: &ReserveSlotRequest,
        service: &Service,
        now: DateTime<Utc>,
    ) -> TimeResult<()> {
        let local = request
            .appointment_time
            .with_timezone(&self.timezone)
            .naive_local();
        let date = local.date();

        let blocks = self.store.work_blocks(request.professional_id).await?;
        let overrides = self.store.overrides(request.professional_id).await?;
        let offered = availability::compute_available_slots(&SlotQuery {
            professional_id: request.professional_id,
            service_duration_minutes: service.duration_minutes,
            target_date: date,
            schedule_blocks: &blocks,
            overrides: &overrides,
            existing_appointments: &[],
            now,
            timezone: self.timezone,
        })?;

        match offered {
            DayAvailability::DayOff => Err(TimeError::Validation(format!(
                "The professional is not available on {}",
                date
            ))),
            DayAvailability::NoWorkingHours => Err(TimeError::Validation(format!(
                "The professional does not work on {}",
                date
            ))),
            open if !open.contains(local.time()) => Err(TimeError::Validation(format!(
                "{} is not a bookable slot for this service",
                local
            ))),
            _ => Ok(()),
        }
    }

    fn dispatch_confirmation(&self, appointment_id: Uuid, confirmation: BookingConfirmation) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match notifier.send_booking_confirmation(&confirmation).await {
                Ok(()) => debug!("Confirmation sent for appointment {}", appointment_id),
                Err(e) => warn!(
                    "Failed to send confirmation for appointment {}: {:#}",
                    appointment_id, e
                ),
            }
        });
    }
}
