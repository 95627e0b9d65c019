//! Request/response DTOs for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::EnrollmentId;

use super::super::enrollment::EnrollmentResponse;

/// Body of `POST /api/payments/checkout-session`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    pub enrollment_id: EnrollmentId,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Response of `POST /api/payments/checkout-session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged, rename_all = "camelCase")]
pub enum CheckoutResponse {
    /// Paid path: complete payment on the hosted page.
    #[serde(rename_all = "camelCase")]
    Hosted { url: String, session_id: String },

    /// Free path: settled immediately.
    #[serde(rename_all = "camelCase")]
    Free {
        message: String,
        enrollment: EnrollmentResponse,
    },
}

/// Acknowledgement body for webhook deliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}
