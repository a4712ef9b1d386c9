//! Booking confirmations delivered through an HTTP email API.

use agenda_core::notify::{BookingConfirmation, Notifier};
use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use serde::Serialize;
use tracing::debug;

use crate::config::NotifyConfig;

pub const CONFIRMATION_SUBJECT: &str = "✅ ¡Tu cita ha sido agendada!";

/// Request body accepted by the email API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct EmailNotifier {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    from: String,
}

impl EmailNotifier {
    pub fn new(api_key: String, config: &NotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url: config.api_url().to_string(),
            from: config.from_address().to_string(),
        }
    }

    pub fn message(&self, confirmation: &BookingConfirmation) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: vec![confirmation.client_email.clone()],
            subject: CONFIRMATION_SUBJECT.to_string(),
            html: render_confirmation(confirmation),
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_booking_confirmation(&self, confirmation: &BookingConfirmation) -> Result<()> {
        let message = self.message(confirmation);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
            .wrap_err("Failed to reach the email API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(eyre!("Email API returned {}: {}", status, error_text));
        }

        debug!("Confirmation email accepted for {}", confirmation.client_email);
        Ok(())
    }
}

/// HTML body of the confirmation email.
pub fn render_confirmation(confirmation: &BookingConfirmation) -> String {
    let mut html = format!(
        "<h1>¡Hola {}!</h1>\n\
         <p>Tu cita ha sido agendada con éxito.</p>\n\
         <p><strong>Servicio:</strong> {}</p>\n\
         <p><strong>Profesional:</strong> {}</p>\n\
         <p><strong>Fecha y Hora:</strong> {}</p>\n",
        escape(&confirmation.client_name),
        escape(&confirmation.service_name),
        escape(&confirmation.professional_name),
        escape(&confirmation.appointment_time),
    );

    if let Some(address) = &confirmation.location_address {
        html.push_str(&format!(
            "<p><strong>Dirección:</strong> {}</p>\n",
            escape(address)
        ));
    }
    if let Some(phone) = &confirmation.location_phone {
        html.push_str(&format!(
            "<p><strong>Teléfono:</strong> {}</p>\n",
            escape(phone)
        ));
    }

    html.push_str("<p>¡Te esperamos!</p>\n");
    html
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
