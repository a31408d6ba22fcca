// --- File: crates/mentora_gcal/src/auth.rs ---
use crate::error::GcalError;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use mentora_config::GcalConfig;
use std::path::Path;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Builds an authenticated CalendarHub from the service-account key named
/// in the config. Called once at startup by the service factory.
pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalError> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or_else(|| GcalError::MissingConfig("key_path is not set".to_string()))?;

    let sa_key = read_service_account_key(Path::new(key_path)).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    // Create client without specifying body type
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    let hub = CalendarHub::new(client, auth);

    Ok(hub)
}
