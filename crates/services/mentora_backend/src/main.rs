// File: crates/services/mentora_backend/src/main.rs
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use mentora_common::services::{BoxedError, FulfillmentService, ServiceFactory};
use mentora_config::{ensure_dotenv_loaded, load_config, FrontendConfig};
use mentora_store::{
    seed_services, MongoReservationRepository, MongoServiceRepository, MongoSlotRepository,
    ReservationRepository, ServiceRepository, SlotRepository, StoreClient,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use mentora_booking::{BookingState, ReservationOrchestrator};

mod service_factory;
use service_factory::MentoraServiceFactory;

#[axum::debug_handler]
async fn health_handler(State(store): State<StoreClient>) -> impl IntoResponse {
    if store.is_healthy().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": "unreachable" })),
        )
    }
}

fn cors_layer(frontend: &FrontendConfig) -> CorsLayer {
    if frontend.allowed_origins.is_empty() {
        // Nothing configured: open up, useful for local development.
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = frontend
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tokio::main]
async fn main() {
    ensure_dotenv_loaded();
    let config = Arc::new(load_config().expect("Failed to load configuration"));
    mentora_common::logging::init();

    // Store + repositories
    let store = StoreClient::connect(&config.database)
        .await
        .expect("Failed to connect to MongoDB");
    let services: Arc<dyn ServiceRepository> = Arc::new(MongoServiceRepository::new(&store));
    let slots: Arc<dyn SlotRepository> = Arc::new(MongoSlotRepository::new(&store));
    let reservations: Arc<dyn ReservationRepository> =
        Arc::new(MongoReservationRepository::new(&store));

    match seed_services(services.as_ref(), &config.booking.services).await {
        Ok(0) => {}
        Ok(n) => info!("Seeded {} service(s) from configuration", n),
        Err(e) => error!("Service catalog seeding failed: {}", e),
    }

    // External adapters behind the trait seams
    let factory = MentoraServiceFactory::new(config.clone()).await;

    let orchestrator = Arc::new(ReservationOrchestrator::new(
        config.clone(),
        services.clone(),
        slots.clone(),
        reservations.clone(),
        factory.scheduler_service(),
        factory.notification_service(),
        factory.checkout_service(),
    ));

    let booking_router = mentora_booking::routes(BookingState {
        config: config.clone(),
        services,
        slots,
        reservations,
        orchestrator: orchestrator.clone(),
    });
    // The webhook hands paid sessions straight to the orchestrator.
    let fulfillment: Arc<dyn FulfillmentService<Error = BoxedError>> = orchestrator;
    let stripe_router = mentora_stripe::routes(config.clone(), fulfillment);

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Mentora API!" }))
        .merge(booking_router)
        .merge(stripe_router);

    let health_router = Router::new()
        .route("/health", get(health_handler))
        .with_state(store.clone());

    #[allow(unused_mut)] // mutable for the openapi feature
    let mut app = Router::new()
        .nest("/api", api_router)
        .merge(health_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use mentora_booking::doc::BookingApiDoc;
        use mentora_stripe::doc::StripeApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Mentora API",
                version = "0.1.0",
                description = "Mentora booking service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Mentora", description = "Core booking endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        openapi_doc.merge(StripeApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let app = app
        .layer(cors_layer(&config.frontend))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
