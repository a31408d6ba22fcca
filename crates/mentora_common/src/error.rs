use std::fmt;
use thiserror::Error;

/// The base error type shared across all Mentora crates.
///
/// Feature crates define their own error enums and convert into this one
/// via `From<SpecificError> for MentoraError`.
#[derive(Error, Debug)]
pub enum MentoraError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or authorization
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during a store operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during an external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// Implemented by every error enum that surfaces through a handler so the
/// mapping to a response status lives next to the error definition.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for MentoraError {
    fn status_code(&self) -> u16 {
        match self {
            MentoraError::HttpError(_) => 500,
            MentoraError::ParseError(_) => 400,
            MentoraError::ConfigError(_) => 500,
            MentoraError::AuthError(_) => 401,
            MentoraError::ValidationError(_) => 400,
            MentoraError::DatabaseError(_) => 500,
            MentoraError::ExternalServiceError { .. } => 502,
            MentoraError::ConflictError(_) => 409,
            MentoraError::NotFoundError(_) => 404,
            MentoraError::InternalError(_) => 500,
        }
    }
}

// Utility constructors for error handling
pub fn config_error<T: fmt::Display>(message: T) -> MentoraError {
    MentoraError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> MentoraError {
    MentoraError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> MentoraError {
    MentoraError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> MentoraError {
    MentoraError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> MentoraError {
    MentoraError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> MentoraError {
    MentoraError::InternalError(message.to_string())
}
