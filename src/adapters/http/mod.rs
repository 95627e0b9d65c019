//! HTTP adapters - axum routes, handlers, DTOs, and middleware.

mod error;
mod state;

pub mod enrollment;
pub mod middleware;
pub mod payment;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;

/// Build the complete API router.
///
/// Authenticated routes are nested under `/api`; the webhook route is
/// mounted separately because it carries no user auth (authenticity comes
/// from the provider signature).
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/courses", enrollment::course_routes())
        .nest("/api/enrollments", enrollment::enrollment_routes())
        .nest("/api/payments", payment::payment_routes())
}
