//! Runtime feature flag handling.
//!
//! Integrations are switched on per deployment through the `use_*` flags in
//! the configuration plus their config section. A flag without its section
//! (or the other way around) leaves the integration off.

use mentora_config::AppConfig;
use std::sync::Arc;

/// Check whether an integration is enabled at runtime.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `use_feature` - The configuration flag that enables the integration
/// * `feature_config` - The configuration section for the integration
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentora_config::{
        AppConfig, AuthConfig, BookingConfig, DatabaseConfig, FrontendConfig, ServerConfig,
        StripeConfig,
    };

    fn base_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "mongodb://localhost:27017".to_string(),
                name: "mentora_test".to_string(),
            },
            use_stripe: true,
            use_gcal: false,
            use_notify: false,
            stripe: Some(StripeConfig {
                success_url: "https://example.com/success".to_string(),
                cancel_url: "https://example.com/cancel".to_string(),
                default_currency: None,
            }),
            gcal: None,
            smtp: None,
            auth: AuthConfig::default(),
            frontend: FrontendConfig::default(),
            booking: BookingConfig::default(),
        })
    }

    #[test]
    fn enabled_needs_flag_and_section() {
        let config = base_config();
        assert!(is_feature_enabled(
            &config,
            config.use_stripe,
            config.stripe.as_ref()
        ));
        // flag without a section stays off
        assert!(!is_feature_enabled(&config, true, config.gcal.as_ref()));
        // section without a flag stays off
        assert!(!is_feature_enabled(
            &config,
            false,
            config.stripe.as_ref()
        ));
    }
}
