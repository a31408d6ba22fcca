// --- File: crates/mentora_booking/src/error.rs ---
use mentora_common::{
    conflict, external_service_error, internal_error, not_found, validation_error, HttpStatusCode,
    MentoraError,
};
use mentora_store::StoreError;
use thiserror::Error;

/// Errors raised by the booking domain.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    /// The slot exists but is no longer free.
    #[error("Slot is not available: {0}")]
    SlotUnavailable(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The checkout session could not be created.
    #[error("Checkout error: {0}")]
    Checkout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BookingError> for MentoraError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) => validation_error(msg),
            BookingError::Auth(msg) => MentoraError::AuthError(msg),
            BookingError::ServiceNotFound(msg)
            | BookingError::SlotNotFound(msg)
            | BookingError::ReservationNotFound(msg) => not_found(msg),
            BookingError::SlotUnavailable(msg) => conflict(msg),
            BookingError::Store(e) => MentoraError::DatabaseError(e.to_string()),
            BookingError::Checkout(msg) => external_service_error("Stripe", msg),
            BookingError::Config(msg) => MentoraError::ConfigError(msg),
            BookingError::Internal(msg) => internal_error(msg),
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::Auth(_) => 401,
            BookingError::ServiceNotFound(_)
            | BookingError::SlotNotFound(_)
            | BookingError::ReservationNotFound(_) => 404,
            BookingError::SlotUnavailable(_) => 409,
            // id-format errors from the store surface as 400, the rest as 5xx
            BookingError::Store(e) => e.status_code(),
            BookingError::Checkout(_) => 502,
            BookingError::Config(_) => 500,
            BookingError::Internal(_) => 500,
        }
    }
}
