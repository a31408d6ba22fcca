// --- File: crates/mentora_stripe/src/service.rs ---
use mentora_common::services::{
    BoxFuture, CheckoutRequest, CheckoutService, CheckoutSessionInfo, CheckoutStatus,
};
use mentora_config::AppConfig;
use std::sync::Arc;

use crate::error::StripeError;
use crate::logic::{create_checkout_session, get_checkout_session};

/// Stripe-backed implementation of the checkout seam.
pub struct StripeCheckoutService {
    config: Arc<AppConfig>,
}

impl StripeCheckoutService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

impl CheckoutService for StripeCheckoutService {
    type Error = StripeError;

    fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSessionInfo, Self::Error> {
        Box::pin(async move {
            let stripe_config = self.config.stripe.as_ref().ok_or(StripeError::ConfigError)?;
            create_checkout_session(stripe_config, request).await
        })
    }

    fn get_checkout(&self, session_id: &str) -> BoxFuture<'_, CheckoutStatus, Self::Error> {
        let session_id = session_id.to_string();
        Box::pin(async move {
            let session = get_checkout_session(&session_id).await?;
            let paid = session.payment_status.as_deref() == Some("paid");
            let reservation_id = session
                .metadata
                .as_ref()
                .and_then(|m| m.get("reservation_id").cloned());
            let slot_id = session
                .metadata
                .as_ref()
                .and_then(|m| m.get("slot_id").cloned());
            Ok(CheckoutStatus {
                session_id: session.id,
                paid,
                reservation_id,
                slot_id,
                customer_email: session.customer_details.and_then(|d| d.email),
            })
        })
    }
}
