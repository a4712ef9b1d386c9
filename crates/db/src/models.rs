use agenda_core::models::{
    appointment::{Appointment, ClientIdentity, GuestContact, ScheduledAppointment},
    profile::{ClientProfile, Locale, Professional},
    schedule::{ScheduleOverride, WorkScheduleBlock},
    service::Service,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWorkSchedule {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<DbWorkSchedule> for WorkScheduleBlock {
    fn from(row: DbWorkSchedule) -> Self {
        Self {
            id: row.id,
            professional_id: row.professional_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleOverride {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub override_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl From<DbScheduleOverride> for ScheduleOverride {
    fn from(row: DbScheduleOverride) -> Self {
        Self {
            id: row.id,
            professional_id: row.professional_id,
            override_date: row.override_date,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub professional_id: Option<Uuid>,
    pub local_id: Option<Uuid>,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Self {
            id: row.id,
            professional_id: row.professional_id,
            locale_id: row.local_id,
            name: row.name,
            duration_minutes: row.duration_minutes,
            price_cents: row.price_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub local_id: Option<Uuid>,
}

impl From<DbProfile> for Professional {
    fn from(row: DbProfile) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            locale_id: row.local_id,
        }
    }
}

impl From<DbProfile> for ClientProfile {
    fn from(row: DbProfile) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLocale {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<DbLocale> for Locale {
    fn from(row: DbLocale) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub client_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub service_id: Uuid,
    pub appointment_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn into_appointment(self) -> Result<Appointment> {
        let client = match (self.client_id, self.guest_name, self.guest_email, self.guest_phone) {
            (Some(client_id), _, _, _) => ClientIdentity::Registered { client_id },
            (None, Some(name), Some(email), phone) => ClientIdentity::Guest(GuestContact {
                name,
                email,
                phone: phone.unwrap_or_default(),
            }),
            _ => return Err(eyre!("Appointment {} has neither a client nor guest contact", self.id)),
        };
        let status = self
            .status
            .parse()
            .map_err(|e| eyre!("{}", e))
            .wrap_err_with(|| format!("Appointment {} has an unreadable status", self.id))?;

        Ok(Appointment {
            id: self.id,
            professional_id: self.professional_id,
            service_id: self.service_id,
            client,
            appointment_time: self.appointment_time,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduledAppointment {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub appointment: DbAppointment,
    pub duration_minutes: i32,
}

impl DbScheduledAppointment {
    pub fn into_scheduled(self) -> Result<ScheduledAppointment> {
        Ok(ScheduledAppointment {
            appointment: self.appointment.into_appointment()?,
            duration_minutes: self.duration_minutes,
        })
    }
}
