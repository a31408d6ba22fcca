#[cfg(test)]
mod tests {
    use crate::models::AppConfig;

    fn minimal_config_json() -> &'static str {
        r#"{
            "server": { "host": "127.0.0.1", "port": 8080 },
            "database": { "url": "mongodb://localhost:27017", "name": "mentora_test" }
        }"#
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(minimal_config_json()).expect("minimal config should parse");

        assert!(!config.use_stripe);
        assert!(!config.use_gcal);
        assert!(!config.use_notify);
        assert!(config.stripe.is_none());
        assert!(config.gcal.is_none());
        assert!(config.smtp.is_none());
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert!(config.frontend.allowed_origins.is_empty());
        assert!(config.booking.services.is_empty());
    }

    #[test]
    fn full_config_parses_feature_sections() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "server": { "host": "0.0.0.0", "port": 9000 },
                "database": { "url": "mongodb://db:27017", "name": "mentora" },
                "use_stripe": true,
                "use_gcal": true,
                "use_notify": true,
                "stripe": {
                    "success_url": "https://example.com/success",
                    "cancel_url": "https://example.com/cancel",
                    "default_currency": "chf"
                },
                "gcal": {
                    "key_path": "keys/service_account.json",
                    "calendar_id": "primary",
                    "time_zone": "Europe/Zurich"
                },
                "smtp": {
                    "host": "smtp.example.com",
                    "port": 587,
                    "from_email": "bookings@example.com",
                    "from_name": "Mentora"
                },
                "auth": { "token_ttl_minutes": 120 },
                "frontend": { "allowed_origins": ["https://booking.example.com"] },
                "booking": {
                    "services": [{
                        "title": "Career mentoring",
                        "description": "1:1 career session",
                        "duration_minutes": 60,
                        "price": 9000,
                        "mentor_email": "mentor@example.com"
                    }]
                }
            }"#,
        )
        .expect("full config should parse");

        assert!(config.use_stripe && config.use_gcal && config.use_notify);
        let stripe = config.stripe.expect("stripe section");
        assert_eq!(stripe.default_currency.as_deref(), Some("chf"));
        let gcal = config.gcal.expect("gcal section");
        assert_eq!(gcal.time_zone.as_deref(), Some("Europe/Zurich"));
        assert_eq!(config.auth.token_ttl_minutes, 120);
        assert_eq!(config.booking.services.len(), 1);
        assert_eq!(config.booking.services[0].duration_minutes, 60);
    }
}
