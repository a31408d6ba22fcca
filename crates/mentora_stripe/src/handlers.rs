// --- File: crates/mentora_stripe/src/handlers.rs ---
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use mentora_common::services::{BoxedError, FulfillmentService};
use mentora_common::HttpStatusCode;
use mentora_config::AppConfig;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::logic::{
    confirmation_from_session, get_checkout_session, process_webhook_event,
    verify_stripe_signature, StripeEvent,
};

// --- State for Stripe Handlers ---
// Carries the config plus the fulfillment hand-off the webhook drives.
#[derive(Clone)]
pub struct StripeState {
    pub config: Arc<AppConfig>,
    pub fulfillment: Arc<dyn FulfillmentService<Error = BoxedError>>,
}

/// Axum handler for Stripe server-to-server webhook notifications.
///
/// The body is taken raw so the signature can be verified over the exact
/// bytes Stripe signed; nothing is parsed or persisted before that check.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/stripe/webhook", // Path relative to /api
    responses(
        (status = 200, description = "Webhook received and acknowledged"),
        (status = 400, description = "Bad Request (e.g., invalid signature, bad payload)"),
        (status = 500, description = "Internal Server Error processing webhook")
    ),
    tag = "Stripe Webhooks"
))]
pub async fn stripe_webhook_handler(
    State(state): State<Arc<StripeState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.config.use_stripe {
        return (StatusCode::SERVICE_UNAVAILABLE, "Stripe service disabled.").into_response();
    }

    // Webhook signing secret comes from the environment, never from config files.
    let webhook_secret = match std::env::var("STRIPE_WEBHOOK_SECRET") {
        Ok(s) => s,
        Err(_) => {
            error!("STRIPE_WEBHOOK_SECRET environment variable not set!");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let sig_header = headers.get("Stripe-Signature").and_then(|h| h.to_str().ok());

    // Verify BEFORE deserializing; a bad signature must not change any state.
    if let Err(e) = verify_stripe_signature(&body, sig_header, &webhook_secret) {
        warn!("Stripe webhook signature verification failed: {}", e);
        return (StatusCode::BAD_REQUEST, format!("Invalid signature: {}", e)).into_response();
    }

    let event: StripeEvent = match serde_json::from_slice(&body) {
        Ok(ev) => ev,
        Err(e) => {
            warn!("Failed to deserialize Stripe webhook event: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid payload format".to_string()).into_response();
        }
    };

    match process_webhook_event(event, state.fulfillment.as_ref()).await {
        Ok(()) => {
            info!("Stripe webhook processed successfully.");
            (StatusCode::OK, Json(json!({ "received": true }))).into_response()
        }
        Err(e) => {
            // Stripe retries on 5xx, so a failed fulfillment gets another delivery.
            error!("Error processing Stripe webhook: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Webhook processing error: {}", e),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VerifySessionRequest {
    #[cfg_attr(feature = "openapi", schema(example = "cs_test_a1..."))]
    pub session_id: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VerifySessionResponse {
    pub session_id: String,
    pub paid: bool,
    pub reservation_id: Option<String>,
}

/// Axum handler that re-checks a checkout session against the Stripe API.
///
/// Fallback for missed webhooks: when the session turns out paid and carries
/// reservation metadata, the same fulfillment path runs. Fulfillment is
/// idempotent, so racing the webhook is harmless.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/stripe/verify", // Path relative to /api
    request_body = VerifySessionRequest,
    responses(
        (status = 200, description = "Session state retrieved", body = VerifySessionResponse),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Stripe"
))]
pub async fn verify_session_handler(
    State(state): State<Arc<StripeState>>,
    Json(payload): Json<VerifySessionRequest>,
) -> Result<Json<VerifySessionResponse>, (StatusCode, String)> {
    if !state.config.use_stripe {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Stripe service is disabled.".to_string(),
        ));
    }

    let session = get_checkout_session(&payload.session_id).await.map_err(|e| {
        error!("Failed to verify session {}: {}", payload.session_id, e);
        (
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_GATEWAY),
            e.to_string(),
        )
    })?;

    let paid = session.payment_status.as_deref() == Some("paid");
    let reservation_id = session
        .metadata
        .as_ref()
        .and_then(|m| m.get("reservation_id").cloned());

    if paid {
        match confirmation_from_session(&session) {
            Ok(confirmation) => {
                if let Err(e) = state.fulfillment.fulfill_paid_reservation(confirmation).await {
                    error!(
                        "Fulfillment failed while verifying session {}: {}",
                        session.id, e
                    );
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Fulfillment error: {}", e),
                    ));
                }
            }
            Err(e) => {
                // Paid session created outside this system; report the state only.
                warn!(
                    "Session {} is paid but carries no reservation metadata: {}",
                    session.id, e
                );
            }
        }
    }

    Ok(Json(VerifySessionResponse {
        session_id: session.id,
        paid,
        reservation_id,
    }))
}
