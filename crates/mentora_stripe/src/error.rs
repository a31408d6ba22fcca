// --- File: crates/mentora_stripe/src/error.rs ---
use mentora_common::{external_service_error, HttpStatusCode, MentoraError};
use thiserror::Error;

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Stripe configuration
    #[error("Stripe configuration missing or incomplete")]
    ConfigError,

    /// Webhook signature verification failed
    #[error("Stripe webhook signature verification failed: {0}")]
    WebhookSignatureError(String),

    /// Webhook event processing error
    #[error("Stripe webhook event processing error: {0}")]
    WebhookProcessingError(String),

    /// Fulfillment of a paid reservation failed
    #[error("Fulfillment failed: {0}")]
    FulfillmentError(String),

    /// Checkout session metadata lacks the reservation or slot reference
    #[error("Missing reservation metadata on checkout session")]
    MissingReservationMetadata,

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Convert StripeError to MentoraError
impl From<StripeError> for MentoraError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => {
                MentoraError::HttpError(format!("Stripe request error: {}", e))
            }
            StripeError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => {
                MentoraError::ParseError(format!("Stripe response parse error: {}", e))
            }
            StripeError::ConfigError => {
                MentoraError::ConfigError("Stripe configuration missing or incomplete".to_string())
            }
            StripeError::WebhookSignatureError(msg) => {
                MentoraError::ValidationError(format!("Stripe webhook signature error: {}", msg))
            }
            StripeError::WebhookProcessingError(msg) => {
                external_service_error("Stripe webhook", msg)
            }
            StripeError::FulfillmentError(msg) => {
                MentoraError::InternalError(format!("Fulfillment error: {}", msg))
            }
            StripeError::MissingReservationMetadata => MentoraError::ValidationError(
                "Missing reservation metadata on checkout session".to_string(),
            ),
            StripeError::InternalError(msg) => {
                MentoraError::InternalError(format!("Stripe internal error: {}", msg))
            }
        }
    }
}

/// Implement HttpStatusCode for StripeError to provide a consistent way to convert
/// StripeError to HTTP status codes.
impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::RequestError(_) => 500,
            StripeError::ApiError { status_code, .. } => *status_code,
            StripeError::ParseError(_) => 400,
            StripeError::ConfigError => 500,
            // Bad or missing signatures are a malformed request, not an auth challenge.
            StripeError::WebhookSignatureError(_) => 400,
            StripeError::WebhookProcessingError(_) => 500,
            StripeError::FulfillmentError(_) => 500,
            StripeError::MissingReservationMetadata => 400,
            StripeError::InternalError(_) => 500,
        }
    }
}
