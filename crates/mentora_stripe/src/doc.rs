// --- File: crates/mentora_stripe/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{VerifySessionRequest, VerifySessionResponse};
use crate::logic::{
    StripeCheckoutSessionObject, StripeCustomerDetails, StripeEvent, StripeEventData,
    StripeEventRequest,
};

#[utoipa::path(
    post,
    path = "/stripe/webhook", // Path relative to /api
    request_body = StripeEvent,
    responses(
        (status = 200, description = "Webhook received and acknowledged"),
        (status = 400, description = "Bad Request (e.g., invalid signature, bad payload)"),
        (status = 500, description = "Internal Server Error processing webhook")
    ),
    tag = "Stripe Webhooks"
)]
fn doc_stripe_webhook_handler() {}

#[utoipa::path(
    post,
    path = "/stripe/verify", // Path relative to /api
    request_body = VerifySessionRequest,
    responses(
        (status = 200, description = "Session state retrieved; paid sessions are fulfilled", body = VerifySessionResponse),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Stripe"
)]
fn doc_verify_session_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_stripe_webhook_handler, doc_verify_session_handler),
    components(
        schemas(
            StripeEvent,
            StripeEventData,
            StripeEventRequest,
            StripeCheckoutSessionObject,
            StripeCustomerDetails,
            VerifySessionRequest,
            VerifySessionResponse
        )
    ),
    tags(
        (name = "Stripe", description = "Stripe Payment Integration API"),
        (name = "Stripe Webhooks", description = "Stripe Server-to-Server Webhooks")
    )
)]
pub struct StripeApiDoc;
