//! Service abstractions for external integrations.
//!
//! This module defines the trait seams between the booking domain and the
//! outside world: the payment checkout, the meeting scheduler and the
//! notification channel. Concrete adapters live in their own crates and are
//! injected by the backend, which keeps the domain logic testable against
//! in-memory fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for meeting scheduler operations.
///
/// Implementations create a video meeting for a confirmed booking and
/// return the join link. Backed by Google Calendar in production.
pub trait SchedulerService: Send + Sync {
    /// Error type returned by scheduler operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a meeting for the given window, inviting the listed attendees.
    fn create_meeting(
        &self,
        request: MeetingRequest,
    ) -> BoxFuture<'_, MeetingResult, Self::Error>;
}

/// A trait for hosted checkout operations.
///
/// Implementations create the payment page the customer is redirected to
/// and can report the payment state of an existing session.
pub trait CheckoutService: Send + Sync {
    /// Error type returned by checkout operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a hosted checkout session for a reservation.
    fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSessionInfo, Self::Error>;

    /// Look up the payment state of an existing checkout session.
    fn get_checkout(&self, session_id: &str) -> BoxFuture<'_, CheckoutStatus, Self::Error>;
}

/// A trait for notification service operations.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an email notification.
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// The confirmed-payment signal handed from the payment layer to the
/// booking domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    /// Reservation the payment belongs to.
    pub reservation_id: String,
    /// Slot held by that reservation.
    pub slot_id: String,
    /// Checkout session that was paid.
    pub checkout_session_id: String,
    /// Customer email as reported by the payment provider, if any.
    pub customer_email: Option<String>,
}

/// Post-payment fulfillment entry point.
///
/// The webhook and verification handlers call this once a checkout session
/// is known to be paid; the booking orchestrator implements it.
pub trait FulfillmentService: Send + Sync {
    /// Error type returned by fulfillment operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Mark the reservation paid, book the slot and run the side effects
    /// (meeting creation, confirmation email).
    fn fulfill_paid_reservation(
        &self,
        confirmation: PaymentConfirmation,
    ) -> BoxFuture<'_, (), Self::Error>;
}

/// A factory for creating service instances.
///
/// The backend builds one of these from configuration; `None` means the
/// corresponding integration is disabled.
pub trait ServiceFactory: Send + Sync {
    /// Get a meeting scheduler instance.
    fn scheduler_service(&self) -> Option<Arc<dyn SchedulerService<Error = BoxedError>>>;

    /// Get a checkout service instance.
    fn checkout_service(&self) -> Option<Arc<dyn CheckoutService<Error = BoxedError>>>;

    /// Get a notification service instance.
    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>>;
}

/// Data structures for scheduler operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    /// The summary or title of the meeting.
    pub summary: String,
    /// An optional description shown in the invite.
    pub description: Option<String>,
    /// The start of the meeting window.
    pub start_time: DateTime<Utc>,
    /// The end of the meeting window.
    pub end_time: DateTime<Utc>,
    /// Email addresses invited to the meeting.
    pub attendees: Vec<String>,
}

/// Represents the result of a meeting creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingResult {
    /// The ID of the created calendar event.
    pub event_id: Option<String>,
    /// The join link for the video meeting, when the provider attached one.
    pub meeting_link: Option<String>,
    /// The status of the event.
    pub status: String,
}

/// Data structures for checkout operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Product line shown on the hosted payment page.
    pub product_name: String,
    /// Amount in the smallest currency unit (e.g. cents).
    pub amount: i64,
    /// ISO currency code, lowercase (e.g. "usd").
    pub currency: String,
    /// Customer email prefilled on the payment page.
    pub customer_email: Option<String>,
    /// Reservation carried through session metadata.
    pub reservation_id: String,
    /// Slot carried through session metadata.
    pub slot_id: String,
}

/// Represents a created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionInfo {
    /// The ID of the checkout session.
    pub session_id: String,
    /// URL of the hosted payment page.
    pub url: String,
}

/// Represents the payment state of a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutStatus {
    /// The ID of the checkout session.
    pub session_id: String,
    /// Whether the session has been paid.
    pub paid: bool,
    /// Reservation id recovered from session metadata.
    pub reservation_id: Option<String>,
    /// Slot id recovered from session metadata.
    pub slot_id: Option<String>,
    /// Customer email as reported by the payment provider.
    pub customer_email: Option<String>,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The ID of the notification.
    pub id: String,
    /// The status of the notification.
    pub status: String,
}
