// --- File: crates/mentora_notify/src/error.rs ---
use mentora_common::{config_error, external_service_error, validation_error, HttpStatusCode, MentoraError};
use thiserror::Error;

/// Errors that can occur when sending a notification email.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// A from/to address did not parse as a mailbox.
    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Failed to build email message: {0}")]
    BuildError(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    TransportError(#[from] lettre::transport::smtp::Error),

    #[error("Missing SMTP configuration: {0}")]
    ConfigError(String),
}

impl From<NotifyError> for MentoraError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::AddressError(e) => validation_error(e),
            NotifyError::BuildError(e) => external_service_error("SMTP", e),
            NotifyError::TransportError(e) => external_service_error("SMTP", e),
            NotifyError::ConfigError(msg) => config_error(msg),
        }
    }
}

impl HttpStatusCode for NotifyError {
    fn status_code(&self) -> u16 {
        match self {
            NotifyError::AddressError(_) => 400,
            NotifyError::BuildError(_) => 500,
            NotifyError::TransportError(_) => 502,
            NotifyError::ConfigError(_) => 500,
        }
    }
}
