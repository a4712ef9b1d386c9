#![allow(dead_code)]

use std::sync::Arc;

use agenda_core::booking::{BookingCoordinator, ReserveSlotRequest};
use agenda_core::models::{
    appointment::{ClientIdentity, GuestContact},
    profile::{ClientProfile, Locale, Professional},
    schedule::WorkScheduleBlock,
    service::Service,
};
use agenda_core::notify::{BookingConfirmation, Notifier};
use agenda_db::InMemoryStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(hm(h, m)))
}

/// Wednesday before the test Monday, 09:00.
pub fn now() -> DateTime<Utc> {
    at(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(), 9, 0)
}

pub struct RecordingNotifier {
    sender: mpsc::UnboundedSender<BookingConfirmation>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BookingConfirmation>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_booking_confirmation(&self, confirmation: &BookingConfirmation) -> eyre::Result<()> {
        self.sender
            .send(confirmation.clone())
            .map_err(|e| eyre::eyre!("receiver dropped: {}", e))
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_booking_confirmation(&self, _: &BookingConfirmation) -> eyre::Result<()> {
        Err(eyre::eyre!("email provider rejected the message"))
    }
}

/// A salon with one professional working Monday 09:00-12:00, a 30 minute
/// haircut offered through the salon and one registered client.
pub struct Salon {
    pub store: Arc<InMemoryStore>,
    pub professional: Professional,
    pub locale: Locale,
    pub haircut: Service,
    pub client: ClientProfile,
}

impl Salon {
    pub async fn open() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let locale = Locale {
            id: Uuid::new_v4(),
            name: "Peluquería Centro".to_string(),
            address: Some("Calle Mayor 1, Madrid".to_string()),
            phone: Some("910000000".to_string()),
        };
        let professional = Professional {
            id: Uuid::new_v4(),
            full_name: "Marta Ruiz".to_string(),
            email: "marta@example.com".to_string(),
            locale_id: Some(locale.id),
        };
        let haircut = Service {
            id: Uuid::new_v4(),
            professional_id: None,
            locale_id: Some(locale.id),
            name: "Corte de pelo".to_string(),
            duration_minutes: 30,
            price_cents: 1800,
        };
        let client = ClientProfile {
            id: Uuid::new_v4(),
            full_name: "Lucía Gómez".to_string(),
            email: "lucia@example.com".to_string(),
        };

        store.add_locale(locale.clone()).await;
        store.add_professional(professional.clone()).await;
        store.add_service(haircut.clone()).await;
        store.add_client(client.clone()).await;
        store
            .add_work_block(WorkScheduleBlock {
                id: Uuid::new_v4(),
                professional_id: professional.id,
                day_of_week: 1,
                start_time: hm(9, 0),
                end_time: hm(12, 0),
            })
            .await;

        Self {
            store,
            professional,
            locale,
            haircut,
            client,
        }
    }

    pub async fn add_service(&self, name: &str, duration_minutes: i32) -> Service {
        let service = Service {
            id: Uuid::new_v4(),
            professional_id: Some(self.professional.id),
            locale_id: None,
            name: name.to_string(),
            duration_minutes,
            price_cents: 2500,
        };
        self.store.add_service(service.clone()).await;
        service
    }

    pub fn coordinator(&self, notifier: Arc<dyn Notifier>) -> BookingCoordinator {
        BookingCoordinator::new(self.store.clone(), notifier, chrono_tz::UTC)
    }

    pub fn silent_coordinator(&self) -> BookingCoordinator {
        self.coordinator(Arc::new(FailingNotifier))
    }

    pub fn request(&self, start: DateTime<Utc>) -> ReserveSlotRequest {
        ReserveSlotRequest {
            professional_id: self.professional.id,
            service_id: self.haircut.id,
            appointment_time: start,
            client: ClientIdentity::Registered {
                client_id: self.client.id,
            },
        }
    }

    pub fn guest_request(&self, start: DateTime<Utc>, guest: GuestContact) -> ReserveSlotRequest {
        ReserveSlotRequest {
            client: ClientIdentity::Guest(guest),
            ..self.request(start)
        }
    }
}
