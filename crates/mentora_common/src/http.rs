//! HTTP utilities shared by the outbound integrations.

// Include the client module
pub mod client;
