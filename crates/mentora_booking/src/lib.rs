// --- File: crates/mentora_booking/src/lib.rs ---
//! Booking domain for Mentora.
//!
//! Owns the slot-reservation/payment state machine: reservation creation
//! with an optimistic slot hold, the post-payment fulfillment
//! orchestration, the admin surface behind a bearer login and the public
//! availability queries. External collaborators (checkout, scheduler,
//! notifier) are reached only through the `mentora_common` trait seams.

pub mod auth;
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
pub mod routes;

// Re-export for main backend
pub use error::BookingError;
pub use handlers::BookingState;
pub use logic::ReservationOrchestrator;
pub use routes::routes;
