//! Stripe-specific types for webhook handling.
//!
//! These types represent Stripe API objects as they arrive in webhook
//! payloads, plus the `Stripe-Signature` header machinery shared by the
//! real adapter and the mock.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::foundation::EnrollmentId;
use crate::domain::payment::{WebhookEvent, WebhookEventData, WebhookEventKind};
use crate::ports::PaymentError;

type HmacSha256 = Hmac<Sha256>;

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    /// Header is empty or missing.
    MissingHeader,
    /// Missing timestamp component (t=...).
    MissingTimestamp,
    /// Missing v1 signature component.
    MissingV1Signature,
    /// Invalid timestamp format.
    InvalidTimestamp,
    /// Invalid signature format (not valid hex).
    InvalidSignatureFormat,
}

impl std::fmt::Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "Missing Stripe-Signature header"),
            Self::MissingTimestamp => write!(f, "Missing timestamp (t=) in signature"),
            Self::MissingV1Signature => write!(f, "Missing v1 signature in header"),
            Self::InvalidTimestamp => write!(f, "Invalid timestamp format"),
            Self::InvalidSignatureFormat => write!(f, "Invalid signature format (not valid hex)"),
        }
    }
}

impl std::error::Error for SignatureParseError {}

/// Parsed Stripe-Signature header components.
///
/// The header format is: `t=timestamp,v1=signature[,v0=legacy_signature]`
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureHeader {
    /// Unix timestamp when Stripe generated the event.
    pub timestamp: i64,

    /// Primary v1 signature (HMAC-SHA256, hex-encoded).
    pub v1_signature: Vec<u8>,

    /// Legacy v0 signature (deprecated, may be absent).
    pub v0_signature: Option<Vec<u8>>,
}

impl SignatureHeader {
    /// Parse a Stripe-Signature header into components.
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;
        let mut v0_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    v1_signature = Some(
                        hex_decode(value.trim())
                            .ok_or(SignatureParseError::InvalidSignatureFormat)?,
                    );
                }
                "v0" => {
                    v0_signature = Some(
                        hex_decode(value.trim())
                            .ok_or(SignatureParseError::InvalidSignatureFormat)?,
                    );
                }
                _ => {
                    // Ignore unknown fields for forward compatibility
                }
            }
        }

        Ok(Self {
            timestamp: timestamp.ok_or(SignatureParseError::MissingTimestamp)?,
            v1_signature: v1_signature.ok_or(SignatureParseError::MissingV1Signature)?,
            v0_signature,
        })
    }
}

/// Decode a hex string to bytes.
pub fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = u8::from_str_radix(&hex[i..i + 2], 16).ok()?;
        bytes.push(byte);
    }
    Some(bytes)
}

/// Encode bytes to hex string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Compute the HMAC-SHA256 signature Stripe expects over
/// `"{timestamp}.{payload}"`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(signed_payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Build a complete `Stripe-Signature` header value for a payload.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        hex_encode(&compute_signature(secret, timestamp, payload))
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Event Types
// ════════════════════════════════════════════════════════════════════════════════

/// Raw Stripe webhook event as received from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Event payload containing the affected object.
    pub data: StripeEventData,

    /// Whether this is a live or test event.
    #[serde(default)]
    pub livemode: bool,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,
}

/// Stripe Checkout Session object, reduced to the fields this core reads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Session id (cs_...).
    pub id: String,

    /// Finalized payment intent (pi_...), set once the session completes.
    #[serde(default)]
    pub payment_intent: Option<String>,

    /// Correlation metadata attached at session creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeCheckoutSession {
    /// Enrollment id carried in session metadata, if present and valid.
    pub fn enrollment_id(&self) -> Option<EnrollmentId> {
        self.metadata
            .get("enrollment_id")
            .and_then(|raw| raw.parse().ok())
    }
}

/// Stripe PaymentIntent object, reduced to the fields this core reads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    /// Payment intent id (pi_...).
    pub id: String,
}

/// Parse a raw webhook payload into the provider-agnostic event.
///
/// Unrecognized event types come back as `Unknown` with the raw object
/// attached; callers acknowledge those without processing.
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
    let raw: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| PaymentError::invalid_webhook(format!("Invalid JSON: {}", e)))?;

    let kind = WebhookEventKind::parse(&raw.event_type);
    let data = match &kind {
        WebhookEventKind::CheckoutSessionCompleted => {
            let session: StripeCheckoutSession = serde_json::from_value(raw.data.object.clone())
                .map_err(|e| {
                    PaymentError::invalid_webhook(format!("Invalid checkout session: {}", e))
                })?;
            WebhookEventData::Checkout {
                enrollment_id: session.enrollment_id(),
                session_id: session.id,
                payment_intent: session.payment_intent,
            }
        }
        WebhookEventKind::PaymentIntentSucceeded => {
            let intent: StripePaymentIntent = serde_json::from_value(raw.data.object.clone())
                .map_err(|e| {
                    PaymentError::invalid_webhook(format!("Invalid payment intent: {}", e))
                })?;
            WebhookEventData::PaymentIntent {
                intent_id: intent.id,
            }
        }
        WebhookEventKind::Unknown(_) => WebhookEventData::Raw {
            json: raw.data.object.to_string(),
        },
    };

    Ok(WebhookEvent {
        id: raw.id,
        kind,
        data,
        created_at: raw.created,
    })
}
