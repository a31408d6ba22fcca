//! MongoDB client wrapper for the booking store.

use crate::error::StoreError;
use bson::doc;
use mentora_config::DatabaseConfig;
use mongodb::{Client, Database};
use tracing::info;

/// Store client holding the MongoDB connection.
///
/// Cheap to clone; the underlying driver client is a handle over a shared
/// connection pool.
#[derive(Debug, Clone)]
pub struct StoreClient {
    database: Database,
}

impl StoreClient {
    /// Connect using the database section of the application config.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is empty or the driver rejects it.
    /// The driver connects lazily, so an unreachable server surfaces on
    /// first use (or via [`StoreClient::is_healthy`]), not here.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        if config.url.is_empty() {
            return Err(StoreError::ConfigError("Database URL is empty".to_string()));
        }
        if config.name.is_empty() {
            return Err(StoreError::ConfigError(
                "Database name is empty".to_string(),
            ));
        }

        let client = Client::with_uri_str(&config.url)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        let database = client.database(&config.name);
        info!("Connected to MongoDB database: {}", config.name);

        Ok(Self { database })
    }

    /// The selected database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Check connectivity with a ping command.
    pub async fn is_healthy(&self) -> bool {
        self.database.run_command(doc! { "ping": 1 }).await.is_ok()
    }
}
