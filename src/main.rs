//! Courseloom server binary.
//!
//! Wires the PostgreSQL adapters and the Stripe provider into the HTTP
//! router and serves it.

use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use courseloom::adapters::http::middleware::{auth_middleware, AuthState};
use courseloom::adapters::http::{api_router, AppState};
use courseloom::adapters::postgres::{
    PostgresCourseStore, PostgresEnrollmentRepository, PostgresPaymentRepository,
};
use courseloom::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use courseloom::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    if config.payment.is_test_mode() {
        tracing::warn!("Stripe is running in test mode");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState {
        course_store: Arc::new(PostgresCourseStore::new(pool.clone())),
        enrollments: Arc::new(PostgresEnrollmentRepository::new(pool.clone())),
        payments: Arc::new(PostgresPaymentRepository::new(pool)),
        payment_provider: Arc::new(StripePaymentAdapter::new(StripeConfig::new(
            config.payment.stripe_api_key.clone(),
            config.payment.stripe_webhook_secret.clone(),
        ))),
        checkout_success_url: config.payment.checkout_success_url.clone(),
        checkout_cancel_url: config.payment.checkout_cancel_url.clone(),
        strict_lesson_scope: false,
    };

    let auth_state = AuthState::new(&config.auth.jwt_secret);

    let app = api_router()
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state);

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "Courseloom listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
