// --- File: crates/mentora_gcal/src/error.rs ---
use mentora_common::{
    config_error, external_service_error, validation_error, HttpStatusCode, MentoraError,
};
use thiserror::Error;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),

    /// Meeting window rejected before any API call is made.
    #[error("Invalid meeting window: {0}")]
    InvalidTimeWindow(String),

    #[error("Missing Google Calendar configuration: {0}")]
    MissingConfig(String),

    /// Service-account key could not be read or the authenticator failed.
    #[error("Service account key error: {0}")]
    KeyError(#[from] std::io::Error),

    /// Google created the event but attached no Meet link.
    #[error("Created event carries no meeting link")]
    NoMeetingLink,
}

impl From<GcalError> for MentoraError {
    fn from(err: GcalError) -> Self {
        match err {
            GcalError::ApiError(e) => external_service_error("Google Calendar", e),
            GcalError::InvalidTimeWindow(msg) => validation_error(msg),
            GcalError::MissingConfig(msg) => config_error(msg),
            GcalError::KeyError(e) => config_error(format!("Service account key error: {}", e)),
            GcalError::NoMeetingLink => {
                external_service_error("Google Calendar", "created event carries no meeting link")
            }
        }
    }
}

impl HttpStatusCode for GcalError {
    fn status_code(&self) -> u16 {
        match self {
            GcalError::ApiError(_) => 502,
            GcalError::InvalidTimeWindow(_) => 400,
            GcalError::MissingConfig(_) => 500,
            GcalError::KeyError(_) => 500,
            GcalError::NoMeetingLink => 502,
        }
    }
}
