// --- File: crates/mentora_stripe/src/routes.rs ---

use crate::handlers::{stripe_webhook_handler, verify_session_handler, StripeState};
use axum::{routing::post, Router};
use mentora_common::services::{BoxedError, FulfillmentService};
use mentora_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the Stripe feature.
///
/// The fulfillment service is the booking orchestrator; the webhook and
/// verify handlers call into it once a session is known to be paid.
pub fn routes(
    config: Arc<AppConfig>,
    fulfillment: Arc<dyn FulfillmentService<Error = BoxedError>>,
) -> Router {
    let stripe_state = Arc::new(StripeState {
        config,
        fulfillment,
    });

    Router::new()
        .route("/stripe/webhook", post(stripe_webhook_handler))
        .route("/stripe/verify", post(verify_session_handler))
        .with_state(stripe_state)
}
