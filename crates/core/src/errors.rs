use thiserror::Error;

use crate::models::appointment::AppointmentStatus;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: cannot {action} an appointment that is {from}")]
    InvalidTransition {
        action: &'static str,
        from: AppointmentStatus,
    },

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend timed out: {0}")]
    Timeout(String),

    #[error("Backend error: {0}")]
    Backend(#[from] eyre::Report),
}

impl BookingError {
    /// Stable label used in logs and in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::NotFound(_) => "not_found",
            BookingError::InvalidTransition { .. } => "invalid_transition",
            BookingError::SlotUnavailable(_) => "slot_unavailable",
            BookingError::InvalidInput(_) => "invalid_input",
            BookingError::Timeout(_) => "timeout",
            BookingError::Backend(_) => "backend",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    ///
    /// `create` is the exception: after a backend failure the caller must
    /// re-check for its own insert before retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Timeout(_) | BookingError::Backend(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
