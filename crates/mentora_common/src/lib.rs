// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Runtime feature flags
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, internal_error, not_found, validation_error,
    HttpStatusCode, MentoraError,
};

// Re-export HTTP utilities for easier access
pub use http::client::{create_client, HTTP_CLIENT};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

// Re-export feature flag handling for easier access
pub use features::is_feature_enabled;
