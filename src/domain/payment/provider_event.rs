//! Provider-agnostic webhook event vocabulary.
//!
//! The payment provider adapter verifies the raw callback and translates
//! it into these types; the reconciler never sees provider-specific JSON.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::EnrollmentId;

/// Verified webhook event from the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event id from the provider (used for logging and tracing).
    pub id: String,

    /// Event kind.
    pub kind: WebhookEventKind,

    /// Event payload.
    pub data: WebhookEventData,

    /// When the event occurred (Unix timestamp).
    pub created_at: i64,
}

/// Kinds of webhook events this core understands.
///
/// Every other kind is carried as `Unknown` and acknowledged without
/// processing - new provider event types must never cause a failure
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventKind {
    /// Hosted checkout session completed successfully.
    CheckoutSessionCompleted,

    /// Payment intent succeeded.
    PaymentIntentSucceeded,

    /// Unrecognized event type (acknowledged, ignored).
    Unknown(String),
}

impl WebhookEventKind {
    /// Parse the provider's event type string.
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Webhook event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebhookEventData {
    /// Checkout session data.
    Checkout {
        /// Provider session id (the pending payment's reference).
        session_id: String,
        /// Finalized payment-intent id, when the provider reports one.
        payment_intent: Option<String>,
        /// Enrollment correlation id carried in session metadata.
        enrollment_id: Option<EnrollmentId>,
    },

    /// Payment intent data.
    PaymentIntent {
        /// Provider payment-intent id.
        intent_id: String,
    },

    /// Raw JSON for unrecognized event types.
    Raw { json: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(
            WebhookEventKind::parse("checkout.session.completed"),
            WebhookEventKind::CheckoutSessionCompleted
        );
        assert_eq!(
            WebhookEventKind::parse("payment_intent.succeeded"),
            WebhookEventKind::PaymentIntentSucceeded
        );
    }

    #[test]
    fn parse_unknown_kind_preserves_type_string() {
        let kind = WebhookEventKind::parse("charge.refunded");
        assert_eq!(kind, WebhookEventKind::Unknown("charge.refunded".to_string()));
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = WebhookEvent {
            id: "evt_1".to_string(),
            kind: WebhookEventKind::CheckoutSessionCompleted,
            data: WebhookEventData::Checkout {
                session_id: "cs_1".to_string(),
                payment_intent: Some("pi_1".to_string()),
                enrollment_id: Some(EnrollmentId::new()),
            },
            created_at: 1704067200,
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: WebhookEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "evt_1");
        assert_eq!(back.kind, WebhookEventKind::CheckoutSessionCompleted);
    }
}
