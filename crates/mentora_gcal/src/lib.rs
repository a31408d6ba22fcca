// --- File: crates/mentora_gcal/src/lib.rs ---
//! Google Calendar adapter for Mentora.
//!
//! Creates a calendar event with an attached Google Meet conference for a
//! confirmed booking. There is no HTTP surface here: availability comes
//! from the slot store, this crate only writes events.

pub mod auth;
pub mod error;
pub mod logic;
pub mod service;

pub use auth::{create_calendar_hub, HubType};
pub use error::GcalError;
pub use service::GoogleMeetScheduler;
