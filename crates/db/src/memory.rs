//! In-process store used by tests and local runs without Postgres.
//!
//! Each professional's appointments sit behind their own async mutex. A
//! reservation holds that mutex across the overlap check and the insert, so
//! reservations for one professional are serialized and different
//! professionals never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;

use agenda_core::errors::TimeResult;
use agenda_core::models::{
    appointment::{
        Appointment, AppointmentStatus, NewAppointment, ReservationOutcome, ScheduledAppointment,
    },
    profile::{ClientProfile, Locale, Professional, ProfessionalProfile},
    schedule::{ScheduleOverride, WorkScheduleBlock},
    service::Service,
};
use agenda_core::store::{AppointmentStore, ProfileStore, ScheduleStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

type Agenda = Arc<Mutex<Vec<ScheduledAppointment>>>;

#[derive(Default)]
pub struct InMemoryStore {
    blocks: RwLock<HashMap<Uuid, Vec<WorkScheduleBlock>>>,
    overrides: RwLock<HashMap<Uuid, Vec<ScheduleOverride>>>,
    services: RwLock<HashMap<Uuid, Service>>,
    professionals: RwLock<HashMap<Uuid, Professional>>,
    locales: RwLock<HashMap<Uuid, Locale>>,
    clients: RwLock<HashMap<Uuid, ClientProfile>>,
    agendas: RwLock<HashMap<Uuid, Agenda>>,
    appointment_owner: RwLock<HashMap<Uuid, Uuid>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_professional(&self, professional: Professional) {
        self.professionals
            .write()
            .await
            .insert(professional.id, professional);
    }

    pub async fn add_locale(&self, locale: Locale) {
        self.locales.write().await.insert(locale.id, locale);
    }

    pub async fn add_client(&self, client: ClientProfile) {
        self.clients.write().await.insert(client.id, client);
    }

    pub async fn add_service(&self, service: Service) {
        self.services.write().await.insert(service.id, service);
    }

    pub async fn add_work_block(&self, block: WorkScheduleBlock) {
        self.blocks
            .write()
            .await
            .entry(block.professional_id)
            .or_default()
            .push(block);
    }

    pub async fn add_override(&self, schedule_override: ScheduleOverride) {
        self.overrides
            .write()
            .await
            .entry(schedule_override.professional_id)
            .or_default()
            .push(schedule_override);
    }

    /// Number of professionals holding at least one reservation attempt.
    pub async fn agenda_count(&self) -> usize {
        self.agendas.read().await.len()
    }

    async fn existing_agenda(&self, professional_id: Uuid) -> Option<Agenda> {
        self.agendas.read().await.get(&professional_id).cloned()
    }

    /// Only reservations create an agenda; reads never do.
    async fn agenda_or_create(&self, professional_id: Uuid) -> Agenda {
        if let Some(agenda) = self.existing_agenda(professional_id).await {
            return agenda;
        }
        let mut agendas = self.agendas.write().await;
        Arc::clone(agendas.entry(professional_id).or_default())
    }

    async fn owner_of(&self, appointment_id: Uuid) -> Option<Uuid> {
        self.appointment_owner
            .read()
            .await
            .get(&appointment_id)
            .copied()
    }

    async fn all_appointments(&self) -> Vec<Appointment> {
        let agendas: Vec<Agenda> = self.agendas.read().await.values().cloned().collect();
        let mut appointments = Vec::new();
        for agenda in agendas {
            appointments.extend(agenda.lock().await.iter().map(|s| s.appointment.clone()));
        }
        appointments
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn work_blocks(&self, professional_id: Uuid) -> TimeResult<Vec<WorkScheduleBlock>> {
        Ok(self
            .blocks
            .read()
            .await
            .get(&professional_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn overrides(&self, professional_id: Uuid) -> TimeResult<Vec<ScheduleOverride>> {
        Ok(self
            .overrides
            .read()
            .await
            .get(&professional_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn appointments_between(
        &self,
        professional_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TimeResult<Vec<ScheduledAppointment>> {
        let Some(agenda) = self.existing_agenda(professional_id).await else {
            return Ok(Vec::new());
        };
        let mut appointments: Vec<ScheduledAppointment> = agenda
            .lock()
            .await
            .iter()
            .filter(|s| s.start() >= from && s.start() < to)
            .cloned()
            .collect();
        appointments.sort_by_key(|s| s.start());
        Ok(appointments)
    }

    async fn insert_if_free(&self, new_appointment: NewAppointment) -> TimeResult<ReservationOutcome> {
        let agenda = self.agenda_or_create(new_appointment.professional_id).await;
        let mut booked = agenda.lock().await;

        let start = new_appointment.appointment_time;
        let end = new_appointment.end_time();
        if booked.iter().any(|existing| existing.overlaps(start, end)) {
            return Ok(ReservationOutcome::SlotTaken);
        }

        let duration_minutes = new_appointment.duration_minutes;
        let appointment = new_appointment.into_appointment(Uuid::new_v4(), Utc::now());
        booked.push(ScheduledAppointment {
            appointment: appointment.clone(),
            duration_minutes,
        });
        self.appointment_owner
            .write()
            .await
            .insert(appointment.id, appointment.professional_id);

        Ok(ReservationOutcome::Booked(appointment))
    }

    async fn appointment(&self, id: Uuid) -> TimeResult<Option<Appointment>> {
        let Some(professional_id) = self.owner_of(id).await else {
            return Ok(None);
        };
        let Some(agenda) = self.existing_agenda(professional_id).await else {
            return Ok(None);
        };
        let found = agenda
            .lock()
            .await
            .iter()
            .find(|s| s.appointment.id == id)
            .map(|s| s.appointment.clone());
        Ok(found)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> TimeResult<Option<Appointment>> {
        let Some(professional_id) = self.owner_of(id).await else {
            return Ok(None);
        };
        let Some(agenda) = self.existing_agenda(professional_id).await else {
            return Ok(None);
        };
        let mut booked = agenda.lock().await;
        let updated = booked
            .iter_mut()
            .find(|s| s.appointment.id == id && s.appointment.status == from)
            .map(|s| {
                s.appointment.status = to;
                s.appointment.clone()
            });
        Ok(updated)
    }

    async fn appointments_for_professional(
        &self,
        professional_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> TimeResult<Vec<Appointment>> {
        let Some(agenda) = self.existing_agenda(professional_id).await else {
            return Ok(Vec::new());
        };
        let mut appointments: Vec<Appointment> = agenda
            .lock()
            .await
            .iter()
            .map(|s| s.appointment.clone())
            .filter(|a| status.is_none_or(|wanted| a.status == wanted))
            .collect();
        appointments.sort_by_key(|a| a.appointment_time);
        Ok(appointments)
    }

    async fn appointments_for_client(&self, client_id: Uuid) -> TimeResult<Vec<Appointment>> {
        let mut appointments: Vec<Appointment> = self
            .all_appointments()
            .await
            .into_iter()
            .filter(|a| a.client.client_id() == Some(client_id))
            .collect();
        appointments.sort_by(|a, b| b.appointment_time.cmp(&a.appointment_time));
        Ok(appointments)
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn service(&self, id: Uuid) -> TimeResult<Option<Service>> {
        Ok(self.services.read().await.get(&id).cloned())
    }

    async fn professional(&self, id: Uuid) -> TimeResult<Option<ProfessionalProfile>> {
        let Some(professional) = self.professionals.read().await.get(&id).cloned() else {
            return Ok(None);
        };
        let locale = match professional.locale_id {
            Some(locale_id) => self.locales.read().await.get(&locale_id).cloned(),
            None => None,
        };
        Ok(Some(ProfessionalProfile {
            professional,
            locale,
        }))
    }

    async fn client(&self, id: Uuid) -> TimeResult<Option<ClientProfile>> {
        Ok(self.clients.read().await.get(&id).cloned())
    }
}
