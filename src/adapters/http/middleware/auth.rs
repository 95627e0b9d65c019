//! Authentication middleware for axum.
//!
//! Validates a Bearer token and injects the resulting [`Actor`] into
//! request extensions. A missing token passes through without injecting,
//! so handlers can distinguish 401 (no actor) from 403 (wrong actor) via
//! the authorization guard.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Actor, AuthError, Role, UserId};

/// JWT claims this service reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// Role claim ("student" | "instructor" | "admin").
    pub role: String,
    /// Expiry (seconds since epoch), enforced by the decoder.
    pub exp: u64,
}

/// Auth middleware state - the shared token decoding key.
#[derive(Clone)]
pub struct AuthState {
    key: Arc<DecodingKey>,
}

impl AuthState {
    /// Build the state from the configured HS256 secret.
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    fn decode_actor(&self, token: &str) -> Result<Actor, AuthError> {
        let data = decode::<Claims>(token, &self.key, &Validation::default()).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;
        let role = Role::parse(&data.claims.role)
            .ok_or_else(|| AuthError::UnknownRole(data.claims.role.clone()))?;

        Ok(Actor::new(id, role))
    }
}

/// Middleware resolving `Authorization: Bearer <token>` into an [`Actor`].
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match auth.decode_actor(token) {
            Ok(actor) => {
                request.extensions_mut().insert(actor);
                next.run(request).await
            }
            Err(e) => {
                let message = match &e {
                    AuthError::TokenExpired => "Token expired",
                    AuthError::UnknownRole(_) => "Unknown role",
                    AuthError::InvalidToken => "Invalid token",
                };
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": { "code": "UNAUTHENTICATED", "message": message }
                    })),
                )
                    .into_response()
            }
        },
        None => {
            // No token - continue without an actor. The authorization
            // guard turns that into 401 on protected operations.
            next.run(request).await
        }
    }
}
