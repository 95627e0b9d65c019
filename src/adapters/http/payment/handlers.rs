//! HTTP handlers for payment endpoints.

use axum::body::Bytes;
use axum::extract::{Extension, Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::checkout::{CheckoutOutcome, CreateCheckoutSessionCommand};
use crate::application::handlers::webhook::ProcessWebhookCommand;
use crate::domain::foundation::Actor;

use super::super::enrollment::EnrollmentResponse;
use super::super::{ApiError, AppState};
use super::dto::{CheckoutResponse, CreateCheckoutSessionRequest, WebhookAck};

/// `POST /api/payments/checkout-session`
pub async fn create_checkout_session(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Json(body): Json<CreateCheckoutSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = actor.map(|Extension(a)| a);

    let outcome = state
        .checkout_handler()
        .handle(
            CreateCheckoutSessionCommand {
                enrollment_id: body.enrollment_id,
                success_url: body.success_url,
                cancel_url: body.cancel_url,
            },
            actor.as_ref(),
        )
        .await?;

    let response = match outcome {
        CheckoutOutcome::Hosted { url, session_id } => CheckoutResponse::Hosted { url, session_id },
        CheckoutOutcome::Free { enrollment } => CheckoutResponse::Free {
            message: "Enrollment marked paid (free course)".to_string(),
            enrollment: EnrollmentResponse::from(enrollment),
        },
    };

    Ok(Json(response))
}

/// `POST /api/payments/webhook`
///
/// Takes the body as raw `Bytes`: signature verification must run over
/// the exact byte stream the provider signed.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let Some(signature) = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": { "code": "SIGNATURE_ERROR", "message": "Missing Stripe-Signature header" }
            })),
        )
            .into_response();
    };

    let result = state
        .webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await;

    match result {
        Ok(_) => Json(WebhookAck { received: true }).into_response(),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(error = %e, "Webhook processing failed");
            } else {
                tracing::warn!(error = %e, "Webhook rejected");
            }
            (
                status,
                Json(serde_json::json!({
                    "error": { "code": "WEBHOOK_ERROR", "message": e.to_string() }
                })),
            )
                .into_response()
        }
    }
}
