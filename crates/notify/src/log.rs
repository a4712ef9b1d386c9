use agenda_core::notify::{BookingConfirmation, Notifier};
use async_trait::async_trait;
use eyre::Result;
use tracing::info;

/// Writes confirmations to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_booking_confirmation(&self, confirmation: &BookingConfirmation) -> Result<()> {
        info!(
            "Booking confirmation for {} <{}>: {} with {} on {}",
            confirmation.client_name,
            confirmation.client_email,
            confirmation.service_name,
            confirmation.professional_name,
            confirmation.appointment_time
        );
        Ok(())
    }
}
