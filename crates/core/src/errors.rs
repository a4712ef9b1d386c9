use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested interval overlaps a live appointment. Callers should
    /// refresh availability and let the user pick again.
    #[error("Slot taken: {0}")]
    SlotTaken(String),

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Store unavailable or failing. Reads may be retried by the caller;
    /// reservations must be re-validated first.
    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TimeError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            TimeError::NotFound(_) => "NOT_FOUND",
            TimeError::Validation(_) => "VALIDATION",
            TimeError::SlotTaken(_) => "SLOT_TAKEN",
            TimeError::PolicyViolation(_) => "POLICY_VIOLATION",
            TimeError::Authentication(_) => "UNAUTHENTICATED",
            TimeError::Authorization(_) => "FORBIDDEN",
            TimeError::Database(_) => "STORE_UNAVAILABLE",
            TimeError::Internal(_) => "INTERNAL",
        }
    }
}

pub type TimeResult<T> = Result<T, TimeError>;
