use std::sync::Arc;

use agenda_core::notify::Notifier;
use tracing::info;

pub mod config;
pub mod email;
pub mod log;

pub use email::EmailNotifier;
pub use log::LogNotifier;

/// Picks the delivery channel for booking confirmations.
///
/// An API key selects the email provider; otherwise confirmations are only
/// written to the log.
pub fn build_notifier(config: &config::NotifyConfig) -> Arc<dyn Notifier> {
    match config.api_key() {
        Some(api_key) => {
            info!("Sending booking confirmations through {}", config.api_url());
            Arc::new(EmailNotifier::new(api_key.to_string(), config))
        }
        None => {
            info!("NOTIFY_API_KEY not set, booking confirmations will only be logged");
            Arc::new(LogNotifier)
        }
    }
}
