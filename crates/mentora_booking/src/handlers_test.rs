// --- File: crates/mentora_booking/src/handlers_test.rs ---
#[cfg(test)]
mod tests {
    use crate::handlers::BookingState;
    use crate::logic::ReservationOrchestrator;
    use crate::routes::routes;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use mentora_common::services::{
        BoxFuture, BoxedError, CheckoutRequest, CheckoutService, CheckoutSessionInfo,
        CheckoutStatus,
    };
    use mentora_config::{
        AppConfig, AuthConfig, BookingConfig, DatabaseConfig, FrontendConfig, ServerConfig,
        StripeConfig,
    };
    use mentora_store::{
        MemoryReservationRepository, MemoryServiceRepository, MemorySlotRepository,
        ReservationRepository, Service, ServiceRepository, Slot, SlotRepository, SlotStatus,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_config() -> Arc<AppConfig> {
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
                success_url: "https://booking.example.com/thanks".to_string(),
                cancel_url: "https://booking.example.com/cancel".to_string(),
                default_currency: Some("usd".to_string()),
            }),
            gcal: None, // display timezone defaults to UTC
            smtp: None,
            auth: AuthConfig::default(),
            frontend: FrontendConfig::default(),
            booking: BookingConfig::default(),
        })
    }

    struct StaticCheckout;

    impl CheckoutService for StaticCheckout {
        type Error = BoxedError;

        fn create_checkout(
            &self,
            _request: CheckoutRequest,
        ) -> BoxFuture<'_, CheckoutSessionInfo, Self::Error> {
            Box::pin(async move {
                Ok(CheckoutSessionInfo {
                    session_id: "cs_test_1".to_string(),
                    url: "https://checkout.stripe.com/pay/cs_test_1".to_string(),
                })
            })
        }

        fn get_checkout(&self, session_id: &str) -> BoxFuture<'_, CheckoutStatus, Self::Error> {
            let session_id = session_id.to_string();
            Box::pin(async move {
                Ok(CheckoutStatus {
                    session_id,
                    paid: false,
                    reservation_id: None,
                    slot_id: None,
                    customer_email: None,
                })
            })
        }
    }

    struct Fixture {
        router: axum::Router,
        slots: Arc<MemorySlotRepository>,
        service_id: String,
    }

    async fn fixture() -> Fixture {
        let config = test_config();
        let services = Arc::new(MemoryServiceRepository::new());
        let slots = Arc::new(MemorySlotRepository::new());
        let reservations = Arc::new(MemoryReservationRepository::new());

        let service = services
            .insert(Service {
                id: None,
                title: "Career mentoring".to_string(),
                description: "1:1 session".to_string(),
                duration_minutes: 60,
                price: 9000,
                mentor_email: "mentor@example.com".to_string(),
            })
            .await
            .unwrap();

        let checkout: Arc<dyn CheckoutService<Error = BoxedError>> = Arc::new(StaticCheckout);
        let orchestrator = Arc::new(ReservationOrchestrator::new(
            config.clone(),
            services.clone(),
            slots.clone(),
            reservations.clone(),
            None,
            None,
            Some(checkout),
        ));

        let services_repo: Arc<dyn ServiceRepository> = services;
        let slots_repo: Arc<dyn SlotRepository> = slots.clone();
        let reservations_repo: Arc<dyn ReservationRepository> = reservations;
        let router = routes(BookingState {
            config,
            services: services_repo,
            slots: slots_repo,
            reservations: reservations_repo,
            orchestrator,
        });

        Fixture {
            router,
            slots,
            service_id: service.id.unwrap(),
        }
    }

    async fn insert_slot(fx: &Fixture, day: u32, hour: u32, status: SlotStatus) -> String {
        fx.slots
            .insert(Slot {
                id: None,
                service_id: Some(fx.service_id.clone()),
                start_time: Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap(),
                end_time: None,
                status,
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn slots_by_date_filters_and_sorts() {
        let fx = fixture().await;
        insert_slot(&fx, 1, 14, SlotStatus::Free).await;
        insert_slot(&fx, 1, 9, SlotStatus::Free).await;
        insert_slot(&fx, 1, 11, SlotStatus::Booked).await;
        insert_slot(&fx, 2, 8, SlotStatus::Free).await;

        let response = fx
            .router
            .clone()
            .oneshot(get("/slots?date=2024-01-01"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listed = body_json(response).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 2, "only free slots on the requested day");
        assert_eq!(listed[0]["start_time"], "2024-01-01T09:00:00Z");
        assert_eq!(listed[1]["start_time"], "2024-01-01T14:00:00Z");

        // Missing or malformed date is a client error.
        let response = fx.router.clone().oneshot(get("/slots")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = fx
            .router
            .clone()
            .oneshot(get("/slots?date=january"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn summary_counts_free_slots_per_day() {
        let fx = fixture().await;
        insert_slot(&fx, 1, 9, SlotStatus::Free).await;
        insert_slot(&fx, 1, 14, SlotStatus::Free).await;
        insert_slot(&fx, 2, 9, SlotStatus::Booked).await;
        insert_slot(&fx, 3, 9, SlotStatus::Free).await;

        let response = fx
            .router
            .clone()
            .oneshot(get("/slots/summary"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let summary = body_json(response).await;
        assert_eq!(
            summary,
            json!([
                { "date": "2024-01-01", "free_count": 2 },
                { "date": "2024-01-03", "free_count": 1 }
            ])
        );
    }

    #[tokio::test]
    async fn reservation_created_with_checkout_url() {
        let fx = fixture().await;
        let slot_id = insert_slot(&fx, 1, 9, SlotStatus::Free).await;

        let response = fx
            .router
            .clone()
            .oneshot(post_json(
                "/reservations",
                json!({
                    "service_id": fx.service_id,
                    "slot_id": slot_id,
                    "name": "Ada Lovelace",
                    "email": "ada@example.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(
            body["checkout_url"],
            "https://checkout.stripe.com/pay/cs_test_1"
        );
        assert!(body["reservation_id"].as_str().is_some());

        // The hold is visible immediately: the slot is gone from the list.
        let response = fx
            .router
            .clone()
            .oneshot(get("/slots?date=2024-01-01"))
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);
    }

    // Admin auth cases share one test so the env vars are set exactly once.
    // Values match the auth module tests to keep parallel runs consistent.
    #[tokio::test]
    async fn admin_surface_requires_bearer_token() {
        std::env::set_var("ADMIN_USERNAME", "admin");
        std::env::set_var("ADMIN_PASSWORD", "hunter2");
        std::env::set_var("JWT_SECRET", "test-signing-secret");

        let fx = fixture().await;
        insert_slot(&fx, 1, 9, SlotStatus::Booked).await;

        // No token: rejected.
        let response = fx
            .router
            .clone()
            .oneshot(get("/admin/slots"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Bad login: rejected.
        let response = fx
            .router
            .clone()
            .oneshot(post_json(
                "/login",
                json!({ "username": "admin", "password": "wrong" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Good login yields a token that opens the admin surface.
        let response = fx
            .router
            .clone()
            .oneshot(post_json(
                "/login",
                json!({ "username": "admin", "password": "hunter2" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login = body_json(response).await;
        let token = login["token"].as_str().unwrap().to_string();

        let response = fx
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/admin/slots")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let slots = body_json(response).await;
        assert_eq!(
            slots.as_array().unwrap().len(),
            1,
            "admin sees booked slots too"
        );
    }
}
