#[cfg(test)]
mod tests {
    use crate::error::StripeError;
    use crate::logic::{
        build_checkout_form, confirmation_from_session, process_webhook_event,
        success_url_with_session_id, verify_stripe_signature, StripeCheckoutSessionObject,
        StripeEvent,
    };
    use chrono::Utc;
    use hmac::{Hmac, Mac};
    use mentora_common::internal_error;
    use mentora_common::services::{
        BoxFuture, BoxedError, CheckoutRequest, FulfillmentService, PaymentConfirmation,
    };
    use mentora_config::StripeConfig;
    use serde_json::json;
    use sha2::Sha256;
    use std::sync::Mutex;

    // Signs a payload the way Stripe does: HMAC-SHA256 over "{t}.{body}".
    fn sign(payload: &str, timestamp: i64, secret: &str) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, payload).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[derive(Default)]
    struct RecordingFulfillment {
        calls: Mutex<Vec<PaymentConfirmation>>,
        fail: bool,
    }

    impl FulfillmentService for RecordingFulfillment {
        type Error = BoxedError;

        fn fulfill_paid_reservation(
            &self,
            confirmation: PaymentConfirmation,
        ) -> BoxFuture<'_, (), Self::Error> {
            Box::pin(async move {
                if self.fail {
                    return Err(BoxedError(Box::new(internal_error("fulfillment down"))));
                }
                self.calls.lock().unwrap().push(confirmation);
                Ok(())
            })
        }
    }

    fn completed_event(payment_status: &str, metadata: serde_json::Value) -> StripeEvent {
        serde_json::from_value(json!({
            "id": "evt_test_1",
            "object": "event",
            "created": 1700000000,
            "livemode": false,
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_123",
                    "object": "checkout.session",
                    "amount_total": 5000,
                    "currency": "usd",
                    "customer_details": { "email": "kim@example.com", "name": "Kim", "phone": null },
                    "metadata": metadata,
                    "payment_intent": "pi_test_1",
                    "payment_status": payment_status,
                    "status": "complete"
                }
            }
        }))
        .expect("event should deserialize")
    }

    #[test]
    fn test_verify_signature_accepts_valid_header() {
        let secret = "whsec_test_secret";
        let payload = r#"{"id":"evt_1"}"#;
        let timestamp = Utc::now().timestamp();
        let signature = sign(payload, timestamp, secret);
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verify_stripe_signature(payload.as_bytes(), Some(&header), secret);
        assert!(result.is_ok(), "fresh, correctly signed payload must pass");
    }

    #[test]
    fn test_verify_signature_accepts_any_matching_v1() {
        // Stripe sends multiple v1 entries during secret rotation.
        let secret = "whsec_test_secret";
        let payload = r#"{"id":"evt_1"}"#;
        let timestamp = Utc::now().timestamp();
        let signature = sign(payload, timestamp, secret);
        let header = format!("t={},v1={},v1={}", timestamp, "00ff00ff", signature);

        let result = verify_stripe_signature(payload.as_bytes(), Some(&header), secret);
        assert!(result.is_ok(), "one matching v1 out of several must pass");
    }

    #[test]
    fn test_verify_signature_rejects_tampered_payload() {
        let secret = "whsec_test_secret";
        let timestamp = Utc::now().timestamp();
        let signature = sign(r#"{"id":"evt_1"}"#, timestamp, secret);
        let header = format!("t={},v1={}", timestamp, signature);

        let result =
            verify_stripe_signature(br#"{"id":"evt_2"}"#, Some(&header), secret);
        assert!(matches!(
            result,
            Err(StripeError::WebhookSignatureError(_))
        ));
    }

    #[test]
    fn test_verify_signature_rejects_missing_header() {
        let result = verify_stripe_signature(b"{}", None, "whsec_test_secret");
        assert!(matches!(
            result,
            Err(StripeError::WebhookSignatureError(_))
        ));
    }

    #[test]
    fn test_verify_signature_rejects_header_without_timestamp() {
        let result =
            verify_stripe_signature(b"{}", Some("v1=deadbeef"), "whsec_test_secret");
        let err = result.expect_err("header without t= must be rejected");
        assert!(err.to_string().contains("timestamp"), "got: {}", err);
    }

    #[test]
    fn test_verify_signature_rejects_stale_timestamp() {
        let secret = "whsec_test_secret";
        let payload = r#"{"id":"evt_1"}"#;
        // Correctly signed but 700s old, outside the 600s tolerance.
        let timestamp = Utc::now().timestamp() - 700;
        let signature = sign(payload, timestamp, secret);
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verify_stripe_signature(payload.as_bytes(), Some(&header), secret);
        let err = result.expect_err("stale timestamp must be rejected");
        assert!(err.to_string().contains("tolerance"), "got: {}", err);
    }

    #[test]
    fn test_checkout_form_carries_reservation_metadata() {
        let config = StripeConfig {
            success_url: "https://booking.example.com/thanks".to_string(),
            cancel_url: "https://booking.example.com/cancel".to_string(),
            default_currency: Some("usd".to_string()),
        };
        let request = CheckoutRequest {
            product_name: "Mentoring session (60 min)".to_string(),
            amount: 5000,
            currency: "USD".to_string(),
            customer_email: Some("kim@example.com".to_string()),
            reservation_id: "res_1".to_string(),
            slot_id: "slot_1".to_string(),
        };

        let form = build_checkout_form(&config, &request);
        let lookup = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(lookup("mode"), Some("payment"));
        assert_eq!(
            lookup("line_items[0][price_data][currency]"),
            Some("usd"),
            "currency is lowercased for Stripe"
        );
        assert_eq!(
            lookup("line_items[0][price_data][product_data][name]"),
            Some("Mentoring session (60 min)")
        );
        assert_eq!(lookup("line_items[0][price_data][unit_amount]"), Some("5000"));
        assert_eq!(lookup("line_items[0][quantity]"), Some("1"));
        assert_eq!(lookup("customer_email"), Some("kim@example.com"));
        assert_eq!(lookup("metadata[reservation_id]"), Some("res_1"));
        assert_eq!(lookup("metadata[slot_id]"), Some("slot_1"));
    }

    #[test]
    fn test_success_url_gets_session_id_placeholder() {
        assert_eq!(
            success_url_with_session_id("https://x.example/thanks"),
            "https://x.example/thanks?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            success_url_with_session_id("https://x.example/thanks?lang=de"),
            "https://x.example/thanks?lang=de&session_id={CHECKOUT_SESSION_ID}"
        );
        // Already parameterised URLs are left alone.
        let explicit = "https://x.example/thanks?session_id={CHECKOUT_SESSION_ID}";
        assert_eq!(success_url_with_session_id(explicit), explicit);
    }

    #[test]
    fn test_confirmation_from_session_requires_metadata() {
        let session: StripeCheckoutSessionObject = serde_json::from_value(json!({
            "id": "cs_test_123",
            "object": "checkout.session",
            "payment_status": "paid"
        }))
        .unwrap();

        let result = confirmation_from_session(&session);
        assert!(matches!(
            result,
            Err(StripeError::MissingReservationMetadata)
        ));
    }

    #[test]
    fn test_confirmation_from_session_extracts_ids_and_email() {
        let session: StripeCheckoutSessionObject = serde_json::from_value(json!({
            "id": "cs_test_123",
            "object": "checkout.session",
            "customer_details": { "email": "kim@example.com", "name": null, "phone": null },
            "metadata": { "reservation_id": "res_1", "slot_id": "slot_1" },
            "payment_status": "paid"
        }))
        .unwrap();

        let confirmation = confirmation_from_session(&session).unwrap();
        assert_eq!(confirmation.reservation_id, "res_1");
        assert_eq!(confirmation.slot_id, "slot_1");
        assert_eq!(confirmation.checkout_session_id, "cs_test_123");
        assert_eq!(confirmation.customer_email.as_deref(), Some("kim@example.com"));
    }

    #[tokio::test]
    async fn test_process_webhook_fulfills_paid_session() {
        let fulfillment = RecordingFulfillment::default();
        let event = completed_event(
            "paid",
            json!({ "reservation_id": "res_1", "slot_id": "slot_1" }),
        );

        process_webhook_event(event, &fulfillment)
            .await
            .expect("paid session with metadata must fulfill");

        let calls = fulfillment.calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "fulfillment runs exactly once per event");
        assert_eq!(calls[0].reservation_id, "res_1");
        assert_eq!(calls[0].slot_id, "slot_1");
        assert_eq!(calls[0].checkout_session_id, "cs_test_123");
    }

    #[tokio::test]
    async fn test_process_webhook_ignores_unpaid_session() {
        let fulfillment = RecordingFulfillment::default();
        let event = completed_event(
            "unpaid",
            json!({ "reservation_id": "res_1", "slot_id": "slot_1" }),
        );

        process_webhook_event(event, &fulfillment)
            .await
            .expect("unpaid session is acknowledged without action");

        assert!(
            fulfillment.calls.lock().unwrap().is_empty(),
            "unpaid sessions must not trigger fulfillment"
        );
    }

    #[tokio::test]
    async fn test_process_webhook_requires_metadata_on_paid_session() {
        let fulfillment = RecordingFulfillment::default();
        let event = completed_event("paid", json!({}));

        let result = process_webhook_event(event, &fulfillment).await;
        assert!(matches!(
            result,
            Err(StripeError::MissingReservationMetadata)
        ));
        assert!(fulfillment.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_webhook_acknowledges_unrelated_events() {
        let fulfillment = RecordingFulfillment::default();
        let event: StripeEvent = serde_json::from_value(json!({
            "id": "evt_test_2",
            "object": "event",
            "created": 1700000000,
            "livemode": false,
            "type": "charge.refunded",
            "data": { "object": { "id": "ch_test_1" } }
        }))
        .unwrap();

        process_webhook_event(event, &fulfillment)
            .await
            .expect("unhandled event types are acknowledged");
        assert!(fulfillment.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_webhook_propagates_fulfillment_error() {
        let fulfillment = RecordingFulfillment {
            fail: true,
            ..Default::default()
        };
        let event = completed_event(
            "paid",
            json!({ "reservation_id": "res_1", "slot_id": "slot_1" }),
        );

        let result = process_webhook_event(event, &fulfillment).await;
        assert!(
            matches!(result, Err(StripeError::FulfillmentError(_))),
            "fulfillment failures bubble up so the webhook returns 5xx"
        );
    }
}
