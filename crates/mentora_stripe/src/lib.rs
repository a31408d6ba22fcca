// --- File: crates/mentora_stripe/src/lib.rs ---

pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod routes;
pub mod service;

// Re-export for main backend
pub use error::StripeError;
pub use handlers::StripeState;
pub use routes::routes;
pub use service::StripeCheckoutService;
