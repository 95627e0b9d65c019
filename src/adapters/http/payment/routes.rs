//! Axum router configuration for payment endpoints.

use axum::{routing::post, Router};

use super::super::AppState;
use super::handlers::{create_checkout_session, payment_webhook};

/// Routes mounted under `/api/payments`.
///
/// - `POST /checkout-session` - start checkout for an enrollment
/// - `POST /webhook` - provider callbacks (no user auth; the signature
///   is the authenticity check)
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout-session", post(create_checkout_session))
        .route("/webhook", post(payment_webhook))
}
