use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Content of the message sent to a client after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub client_email: String,
    pub client_name: String,
    pub professional_name: String,
    pub service_name: String,
    pub appointment_time: String,
    pub location_address: Option<String>,
    pub location_phone: Option<String>,
}

/// Delivery channel for booking confirmations.
///
/// Called after the appointment is committed; an error here is logged by
/// the caller and never affects the booking.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_booking_confirmation(&self, confirmation: &BookingConfirmation) -> eyre::Result<()>;
}

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Formats a local date-time the way confirmations show it, e.g.
/// `19 de octubre de 2026, 09:30`.
pub fn format_appointment_time(local: NaiveDateTime) -> String {
    let month = MONTHS[local.month0() as usize];
    format!(
        "{} de {} de {}, {:02}:{:02}",
        local.day(),
        month,
        local.year(),
        local.hour(),
        local.minute()
    )
}
