// --- File: crates/mentora_stripe/src/logic.rs ---
use hmac::{Hmac, Mac};
use mentora_common::services::{
    BoxedError, CheckoutRequest, CheckoutSessionInfo, FulfillmentService, PaymentConfirmation,
};
use mentora_common::HTTP_CLIENT;
use mentora_config::StripeConfig;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{error, info, warn};

use crate::error::StripeError;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Data Structures ---

/// Response FROM Stripe API when creating a session.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
struct StripeCheckoutSessionApiResponse {
    pub id: String,
    pub url: Option<String>,
}

/// Represents the `data` field within a Stripe Event.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeEventData {
    /// The actual object related to the event, e.g., a Checkout Session.
    /// Using serde_json::Value because the structure of 'object' varies by event type.
    pub object: serde_json::Value,
}

/// Represents the `request` field within a Stripe Event (useful for idempotency).
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeEventRequest {
    pub id: Option<String>,
    pub idempotency_key: Option<String>,
}

/// Represents the outer Stripe Event object.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeEvent {
    pub id: String,
    pub object: String, // "event"
    pub api_version: Option<String>,
    pub created: i64, // Unix timestamp
    pub livemode: bool,
    #[serde(rename = "type")]
    pub event_type: String, // e.g., "checkout.session.completed"
    pub data: StripeEventData,
    pub request: Option<StripeEventRequest>,
}

/// The `data.object` of checkout session events, also returned when
/// retrieving a session. Only the fields we act on are kept.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeCheckoutSessionObject {
    pub id: String,     // Checkout Session ID (cs_...)
    pub object: String, // "checkout.session"
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_details: Option<StripeCustomerDetails>,
    pub metadata: Option<HashMap<String, String>>, // reservation_id / slot_id
    pub payment_intent: Option<String>,
    pub payment_status: Option<String>, // e.g., "paid", "unpaid", "no_payment_required"
    pub status: Option<String>,         // e.g., "open", "complete", "expired"
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeCustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

// --- Webhook Processing Logic ---

const TOLERANCE_SECONDS: i64 = 600; // 10 minutes

/// Verifies the signature of an incoming Stripe webhook request.
///
/// # Arguments
/// * `payload_bytes` - The raw request body bytes.
/// * `sig_header` - The value of the 'Stripe-Signature' header.
/// * `secret` - Your Stripe webhook signing secret (whsec_...).
///
/// Returns Ok(()) if the signature is valid and fresh, otherwise
/// StripeError::WebhookSignatureError.
pub fn verify_stripe_signature(
    payload_bytes: &[u8],
    sig_header: Option<&str>,
    secret: &str,
) -> Result<(), StripeError> {
    let sig_header_value = sig_header.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing Stripe-Signature header".to_string())
    })?;

    let mut timestamp_str: Option<&str> = None;
    let mut v1_signatures_hex: Vec<&str> = Vec::new();

    for item in sig_header_value.split(',') {
        let parts: Vec<&str> = item.trim().splitn(2, '=').collect();
        if parts.len() == 2 {
            match parts[0] {
                "t" => timestamp_str = Some(parts[1]),
                "v1" => v1_signatures_hex.push(parts[1]),
                _ => {} // Ignore other parts like v0
            }
        }
    }

    let timestamp_str = timestamp_str.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing timestamp 't' in Stripe-Signature".to_string())
    })?;
    let parsed_timestamp = timestamp_str.parse::<i64>().map_err(|_| {
        StripeError::WebhookSignatureError(
            "Invalid timestamp format in Stripe-Signature".to_string(),
        )
    })?;

    if v1_signatures_hex.is_empty() {
        return Err(StripeError::WebhookSignatureError(
            "Missing v1 signature in Stripe-Signature".to_string(),
        ));
    }

    // Reject replayed events outside the tolerance window.
    let current_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64;
    if (current_timestamp - parsed_timestamp).abs() > TOLERANCE_SECONDS {
        warn!(
            "Stripe webhook timestamp outside tolerance. Current: {}, Event: {}, Diff: {}",
            current_timestamp,
            parsed_timestamp,
            (current_timestamp - parsed_timestamp).abs()
        );
        return Err(StripeError::WebhookSignatureError(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    // Construct the signed payload string from the original header timestamp.
    let signed_payload_string = format!(
        "{}.{}",
        timestamp_str,
        String::from_utf8_lossy(payload_bytes)
    );

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        StripeError::WebhookSignatureError("Invalid webhook secret format for HMAC".to_string())
    })?;
    mac.update(signed_payload_string.as_bytes());
    let expected_signature_bytes = mac.finalize().into_bytes();
    let calculated_signature_hex = hex::encode(expected_signature_bytes);

    // Iterate through all provided v1 signatures and check for a match.
    for provided_sig_hex in v1_signatures_hex {
        if constant_time_eq(
            calculated_signature_hex.as_bytes(),
            provided_sig_hex.as_bytes(),
        ) {
            return Ok(());
        }
    }

    Err(StripeError::WebhookSignatureError(
        "Signature mismatch".to_string(),
    ))
}

/// Helper for constant-time string comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Builds the confirmed-payment hand-off from a paid checkout session.
///
/// Requires `reservation_id` and `slot_id` in the session metadata, which
/// `create_checkout_session` always sets.
pub fn confirmation_from_session(
    session: &StripeCheckoutSessionObject,
) -> Result<PaymentConfirmation, StripeError> {
    let metadata = session
        .metadata
        .as_ref()
        .ok_or(StripeError::MissingReservationMetadata)?;
    let reservation_id = metadata
        .get("reservation_id")
        .cloned()
        .ok_or(StripeError::MissingReservationMetadata)?;
    let slot_id = metadata
        .get("slot_id")
        .cloned()
        .ok_or(StripeError::MissingReservationMetadata)?;

    Ok(PaymentConfirmation {
        reservation_id,
        slot_id,
        checkout_session_id: session.id.clone(),
        customer_email: session
            .customer_details
            .as_ref()
            .and_then(|d| d.email.clone()),
    })
}

/// Processes a verified Stripe webhook event.
///
/// Only `checkout.session.completed` with `payment_status == "paid"` hands
/// off to fulfillment; every other event type is logged and acknowledged.
pub async fn process_webhook_event(
    event: StripeEvent,
    fulfillment: &dyn FulfillmentService<Error = BoxedError>,
) -> Result<(), StripeError> {
    info!("Processing Stripe event type: {}", event.event_type);

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: StripeCheckoutSessionObject = serde_json::from_value(event.data.object)
                .map_err(|e| {
                StripeError::WebhookProcessingError(format!(
                    "Failed to parse checkout session object: {}",
                    e
                ))
            })?;

            if session.payment_status.as_deref() == Some("paid") {
                let confirmation = confirmation_from_session(&session)?;
                info!(
                    "Checkout session {} paid, fulfilling reservation {}",
                    session.id, confirmation.reservation_id
                );
                fulfillment
                    .fulfill_paid_reservation(confirmation)
                    .await
                    .map_err(|e| StripeError::FulfillmentError(e.to_string()))?;
            } else {
                info!(
                    "Checkout session {} completed, but payment status is {:?}. No fulfillment action taken.",
                    session.id, session.payment_status
                );
            }
        }
        "checkout.session.expired" => {
            // Held slots are never auto-released; an expired session means the
            // customer abandoned checkout and an admin frees the slot manually.
            let session_id: Option<&str> = event.data.object.get("id").and_then(|v| v.as_str());
            info!(
                "Checkout session {:?} expired; reservation stays pending and the slot hold is kept.",
                session_id
            );
        }
        "payment_intent.succeeded" => {
            let payment_intent_id: Option<&str> =
                event.data.object.get("id").and_then(|v| v.as_str());
            info!("PaymentIntent succeeded: {:?}", payment_intent_id);
        }
        "payment_intent.payment_failed" => {
            let payment_intent_id: Option<&str> =
                event.data.object.get("id").and_then(|v| v.as_str());
            info!("PaymentIntent failed: {:?}", payment_intent_id);
        }
        _ => {
            info!("Received unhandled Stripe event type: {}", event.event_type);
        }
    }
    Ok(())
}

// --- Checkout Session Creation ---

/// Success URL handed to Stripe, with the session id placeholder appended
/// when the configured URL does not already carry one.
pub(crate) fn success_url_with_session_id(configured: &str) -> String {
    if configured.contains("{CHECKOUT_SESSION_ID}") {
        return configured.to_string();
    }
    let separator = if configured.contains('?') { '&' } else { '?' };
    format!("{}{}session_id={{CHECKOUT_SESSION_ID}}", configured, separator)
}

/// Form body for the Checkout Session create call. The reservation and slot
/// ids ride along in metadata so the webhook can route the payment back.
pub(crate) fn build_checkout_form(
    stripe_config: &StripeConfig,
    request: &CheckoutRequest,
) -> Vec<(String, String)> {
    let mut form_body: Vec<(String, String)> = vec![
        ("payment_method_types[]".to_string(), "card".to_string()),
        ("mode".to_string(), "payment".to_string()),
        (
            "success_url".to_string(),
            success_url_with_session_id(&stripe_config.success_url),
        ),
        ("cancel_url".to_string(), stripe_config.cancel_url.clone()),
        (
            "line_items[0][price_data][currency]".to_string(),
            request.currency.to_lowercase(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            request.amount.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "metadata[reservation_id]".to_string(),
            request.reservation_id.clone(),
        ),
        ("metadata[slot_id]".to_string(), request.slot_id.clone()),
    ];
    if let Some(email) = &request.customer_email {
        form_body.push(("customer_email".to_string(), email.clone()));
    }
    form_body
}

/// Creates a Stripe Checkout Session for a pending reservation.
pub async fn create_checkout_session(
    stripe_config: &StripeConfig,
    request: CheckoutRequest,
) -> Result<CheckoutSessionInfo, StripeError> {
    info!(
        "Creating Stripe Checkout Session for reservation {}",
        request.reservation_id
    );

    let stripe_secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| StripeError::ConfigError)?;

    let form_body = build_checkout_form(stripe_config, &request);

    let api_url = "https://api.stripe.com/v1/checkout/sessions";

    let response = HTTP_CLIENT
        .post(api_url)
        .basic_auth(stripe_secret_key, None::<&str>)
        .form(&form_body)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        let stripe_response: StripeCheckoutSessionApiResponse = serde_json::from_str(&body_text)?;
        if let Some(url) = stripe_response.url {
            info!(
                "Stripe Checkout Session {} created for reservation {}",
                stripe_response.id, request.reservation_id
            );
            Ok(CheckoutSessionInfo {
                session_id: stripe_response.id,
                url,
            })
        } else {
            error!("Stripe response missing checkout session URL: {}", body_text);
            Err(StripeError::InternalError(
                "Stripe response missing checkout URL".to_string(),
            ))
        }
    } else {
        let error_message = extract_stripe_error_message(&body_text);
        error!(
            "Stripe API request failed with HTTP status: {}. Message: {}",
            status, error_message
        );
        Err(StripeError::ApiError {
            status_code: status.as_u16(),
            message: error_message,
        })
    }
}

/// Retrieves a Stripe Checkout Session.
pub async fn get_checkout_session(
    session_id: &str,
) -> Result<StripeCheckoutSessionObject, StripeError> {
    info!("Retrieving Stripe Checkout Session {}", session_id);

    let stripe_secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| StripeError::ConfigError)?;

    let api_url = format!("https://api.stripe.com/v1/checkout/sessions/{}", session_id);

    let response = HTTP_CLIENT
        .get(&api_url)
        .basic_auth(stripe_secret_key, None::<&str>)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        let session: StripeCheckoutSessionObject = serde_json::from_str(&body_text)?;
        if session.payment_status.as_deref() != Some("paid") {
            info!(
                "Checkout session {} status is {:?}, payment_status is {:?}.",
                session_id, session.status, session.payment_status
            );
        }
        Ok(session)
    } else {
        let error_message = extract_stripe_error_message(&body_text);
        error!(
            "Failed to retrieve session {}: {} - {}",
            session_id, status, error_message
        );
        Err(StripeError::ApiError {
            status_code: status.as_u16(),
            message: error_message,
        })
    }
}

/// Pulls `error.message` out of a Stripe error body, falling back to the
/// raw text when the body is not the expected JSON shape.
fn extract_stripe_error_message(body_text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body_text) {
        Ok(json_body) => json_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body_text)
            .to_string(),
        Err(_) => body_text.to_string(),
    }
}
