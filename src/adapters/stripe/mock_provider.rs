//! Deterministic in-process payment provider for tests and local
//! development.
//!
//! Sessions get sequential ids; webhook verification runs the same
//! HMAC-SHA256 scheme as the real adapter, so tests exercise genuine
//! signature checking rather than a stubbed "always valid".

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use subtle::ConstantTimeEq;

use crate::domain::payment::WebhookEvent;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

use super::webhook_types::{compute_signature, parse_event, sign_payload, SignatureHeader};

/// Mock payment provider.
pub struct MockPaymentProvider {
    webhook_secret: String,
    session_counter: AtomicU64,
    fail_checkout: AtomicBool,
}

impl MockPaymentProvider {
    /// Create a mock verifying webhooks against the given secret.
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            session_counter: AtomicU64::new(0),
            fail_checkout: AtomicBool::new(false),
        }
    }

    /// Make every checkout session creation fail with a provider error.
    pub fn failing_checkout(self) -> Self {
        self.fail_checkout.store(true, Ordering::SeqCst);
        self
    }

    /// Produce a valid `Stripe-Signature` header for a payload, stamped
    /// with the current time.
    pub fn sign(&self, payload: &[u8]) -> String {
        sign_payload(
            &self.webhook_secret,
            chrono::Utc::now().timestamp(),
            payload,
        )
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        _request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if self.fail_checkout.load(Ordering::SeqCst) {
            return Err(PaymentError::provider("Simulated provider outage"));
        }

        let n = self.session_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("cs_test_{}", n);
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.test/c/pay/{}", id),
            id,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        let header = SignatureHeader::parse(signature)
            .map_err(|e| PaymentError::invalid_webhook(e.to_string()))?;

        let expected = compute_signature(&self.webhook_secret, header.timestamp, payload);
        if expected.ct_eq(&header.v1_signature).unwrap_u8() != 1 {
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        parse_event(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EnrollmentId;
    use crate::domain::payment::WebhookEventKind;

    fn checkout_request() -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            enrollment_id: EnrollmentId::new(),
            amount_minor: 4999,
            currency: "usd".to_string(),
            product_name: "Course".to_string(),
            product_description: None,
            success_url: "https://app.test/success".to_string(),
            cancel_url: "https://app.test/cancel".to_string(),
        }
    }

    #[tokio::test]
    async fn sessions_get_sequential_ids() {
        let mock = MockPaymentProvider::new("whsec_x");

        let a = mock.create_checkout_session(checkout_request()).await.unwrap();
        let b = mock.create_checkout_session(checkout_request()).await.unwrap();

        assert_eq!(a.id, "cs_test_1");
        assert_eq!(b.id, "cs_test_2");
        assert!(a.url.ends_with(&a.id));
    }

    #[tokio::test]
    async fn failing_mock_returns_provider_error() {
        let mock = MockPaymentProvider::new("whsec_x").failing_checkout();

        let result = mock.create_checkout_session(checkout_request()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn sign_then_verify_roundtrips() {
        let mock = MockPaymentProvider::new("whsec_x");
        let body = serde_json::to_vec(&serde_json::json!({
            "id": "evt_m",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": { "object": { "id": "pi_m" } }
        }))
        .unwrap();

        let event = mock.verify_webhook(&body, &mock.sign(&body)).await.unwrap();

        assert_eq!(event.kind, WebhookEventKind::PaymentIntentSucceeded);
    }

    #[tokio::test]
    async fn wrong_secret_fails_verification() {
        let mock = MockPaymentProvider::new("whsec_x");
        let other = MockPaymentProvider::new("whsec_y");
        let body = b"{}".to_vec();

        let result = mock.verify_webhook(&body, &other.sign(&body)).await;

        assert!(result.is_err());
    }
}
