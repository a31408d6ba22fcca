use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
// MongoDB connection string plus database name.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. mongodb://localhost:27017, loaded via MENTORA__DATABASE__URL
    pub name: String,
}

// --- Stripe Config ---
// Holds non-secret Stripe config. Secrets loaded directly from env vars:
// STRIPE_SECRET_KEY, STRIPE_WEBHOOK_SECRET.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    pub success_url: String, // Mandatory
    pub cancel_url: String,  // Mandatory
    pub default_currency: Option<String>,
}

// --- Google Calendar Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
    /// IANA zone used to render slot times and group days, e.g. "Europe/Zurich".
    pub time_zone: Option<String>,
}

// --- SMTP Config ---
// Holds non-secret SMTP config. Credentials loaded directly from env vars:
// SMTP_USERNAME, SMTP_PASSWORD.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub from_email: String,
    pub from_name: Option<String>,
}

// --- Admin Auth Config ---
// Credentials and the token signing secret stay in env vars:
// ADMIN_USERNAME, ADMIN_PASSWORD, JWT_SECRET.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

fn default_token_ttl_minutes() -> i64 {
    60
}

// --- Frontend Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FrontendConfig {
    /// Origins the CORS layer accepts, e.g. "https://booking.example.com".
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// One bookable service, seeded into the store at startup.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceSeed {
    pub title: String,
    pub description: String,
    /// Duration in minutes.
    pub duration_minutes: i64,
    /// Price in the smallest currency unit (e.g. cents).
    pub price: i64,
    pub mentor_email: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingConfig {
    #[serde(default)]
    pub services: Vec<ServiceSeed>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server and database config are mandatory
    pub server: ServerConfig,
    pub database: DatabaseConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_stripe: bool,
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_notify: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,

    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}
