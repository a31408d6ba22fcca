// --- File: crates/mentora_notify/src/lib.rs ---
//! SMTP notifier for Mentora.
//!
//! Sends the booking confirmation email over STARTTLS. The message body is
//! produced by a pure builder in [`email`], so the content can be unit
//! tested without a transport.

pub mod email;
pub mod error;
pub mod service;

pub use email::{confirmation_email, ConfirmationEmail};
pub use error::NotifyError;
pub use service::SmtpNotifier;
