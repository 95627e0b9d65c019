//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe API: hosted
//! checkout session creation (one-time `payment` mode with inline price
//! data) and webhook verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::domain::payment::WebhookEvent;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

use super::webhook_types::{compute_signature, parse_event, SignatureHeader};

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

/// Checkout session fields read from the creation response.
#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
    url: Option<String>,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify the webhook signature over the raw payload.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), PaymentError> {
        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "Webhook event too old - possible replay"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                "Webhook event timestamp in future"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        // 2. Compute expected signature
        let expected = compute_signature(
            self.config.webhook_secret.expose_secret(),
            header.timestamp,
            payload,
        );

        // 3. Constant-time comparison
        if expected.ct_eq(&header.v1_signature).unwrap_u8() != 1 {
            tracing::warn!("Invalid webhook signature");
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let enrollment_id = request.enrollment_id.to_string();

        let mut params = vec![
            ("mode", "payment".to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", request.currency),
            (
                "line_items[0][price_data][unit_amount]",
                request.amount_minor.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.product_name,
            ),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("metadata[enrollment_id]", enrollment_id.clone()),
            ("client_reference_id", enrollment_id),
        ];

        if let Some(description) = request.product_description {
            params.push((
                "line_items[0][price_data][product_data][description]",
                description,
            ));
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe checkout session creation failed");
            return Err(PaymentError::provider(format!(
                "Stripe API error: {}",
                error_text
            )));
        }

        let session: CheckoutSessionResponse = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let url = session
            .url
            .unwrap_or_else(|| format!("https://checkout.stripe.com/c/pay/{}", session.id));

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        // 1. Parse signature header
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        // 2. Verify signature (includes timestamp validation)
        self.verify_signature(payload, &header)?;

        // 3. Parse and translate the event
        let event = parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            kind = ?event.kind,
            "Webhook signature verified"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::super::webhook_types::sign_payload;
    use super::*;
    use crate::domain::payment::WebhookEventKind;

    const SECRET: &str = "whsec_test_secret";

    fn adapter() -> StripePaymentAdapter {
        StripePaymentAdapter::new(StripeConfig::new("sk_test_key", SECRET))
    }

    fn payload() -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "id": "evt_test123",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": { "id": "cs_test", "metadata": {} } },
            "livemode": false
        }))
        .unwrap()
    }

    #[test]
    fn config_defaults_to_stripe_api() {
        let config = StripeConfig::new("sk", "whsec");
        assert_eq!(config.api_base_url, "https://api.stripe.com");
    }

    #[test]
    fn config_with_base_url_overrides() {
        let config = StripeConfig::new("sk", "whsec").with_base_url("http://localhost:12111");
        assert_eq!(config.api_base_url, "http://localhost:12111");
    }

    #[tokio::test]
    async fn verify_webhook_accepts_valid_signature() {
        let adapter = adapter();
        let body = payload();
        let now = chrono::Utc::now().timestamp();
        let signature = sign_payload(SECRET, now, &body);

        let event = adapter.verify_webhook(&body, &signature).await.unwrap();

        assert_eq!(event.id, "evt_test123");
        assert_eq!(event.kind, WebhookEventKind::CheckoutSessionCompleted);
    }

    #[tokio::test]
    async fn verify_webhook_rejects_wrong_secret() {
        let adapter = adapter();
        let body = payload();
        let now = chrono::Utc::now().timestamp();
        let signature = sign_payload("whsec_other", now, &body);

        let result = adapter.verify_webhook(&body, &signature).await;

        assert!(result.unwrap_err().is_webhook_rejection());
    }

    #[tokio::test]
    async fn verify_webhook_rejects_tampered_payload() {
        let adapter = adapter();
        let body = payload();
        let now = chrono::Utc::now().timestamp();
        let signature = sign_payload(SECRET, now, &body);

        let mut tampered = body.clone();
        tampered[10] ^= 0xff;

        let result = adapter.verify_webhook(&tampered, &signature).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn verify_webhook_rejects_stale_timestamp() {
        let adapter = adapter();
        let body = payload();
        let stale = chrono::Utc::now().timestamp() - 600;
        let signature = sign_payload(SECRET, stale, &body);

        let err = adapter.verify_webhook(&body, &signature).await.unwrap_err();

        assert!(err.message.contains("too old"));
    }

    #[tokio::test]
    async fn verify_webhook_rejects_far_future_timestamp() {
        let adapter = adapter();
        let body = payload();
        let future = chrono::Utc::now().timestamp() + 120;
        let signature = sign_payload(SECRET, future, &body);

        let err = adapter.verify_webhook(&body, &signature).await.unwrap_err();

        assert!(err.message.contains("future"));
    }

    #[tokio::test]
    async fn verify_webhook_tolerates_small_clock_skew() {
        let adapter = adapter();
        let body = payload();
        let slightly_ahead = chrono::Utc::now().timestamp() + 30;
        let signature = sign_payload(SECRET, slightly_ahead, &body);

        assert!(adapter.verify_webhook(&body, &signature).await.is_ok());
    }

    #[tokio::test]
    async fn verify_webhook_rejects_malformed_header() {
        let adapter = adapter();
        let body = payload();

        let result = adapter.verify_webhook(&body, "malformed").await;

        assert!(result.is_err());
    }
}
