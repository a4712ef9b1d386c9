use serde::Deserialize;
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.resend.com/emails";
pub const DEFAULT_FROM: &str = "AgendaPro <onboarding@resend.dev>";

/// Settings for the transactional email provider.
///
/// Without an API key confirmations are only logged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    /// Bearer token for the email API
    pub api_key: Option<String>,
    /// Endpoint that accepts the message JSON (defaults to Resend)
    pub api_url: Option<String>,
    /// Sender shown to the client
    pub from: Option<String>,
}

impl NotifyConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("NOTIFY_API_KEY").ok(),
            api_url: env::var("NOTIFY_API_URL").ok(),
            from: env::var("NOTIFY_FROM").ok(),
        }
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn from_address(&self) -> &str {
        self.from.as_deref().unwrap_or(DEFAULT_FROM)
    }

    /// The provider key, unless it is missing or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}
