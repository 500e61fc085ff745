//! Authentication middleware for protected routes.
//!
//! Extracts the bearer token, validates it remotely against the identity
//! provider, and stashes the verified user and the token in request
//! extensions for the forwarding handler.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::errors::AgError;
use crate::models::ForwardToken;
use crate::routes::AppState;
use crate::services::auth_client::AuthClientError;
use common::jwt::bearer_token;

/// Require a valid bearer token before the request proceeds.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AgError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AgError::AuthenticationRequired("No token provided".to_string()))?;

    let token = bearer_token(header_value)
        .map_err(|e| AgError::AuthenticationRequired(e.to_string()))?
        .to_string();

    let user = state.auth_client.validate(&token).await.map_err(|e| match e {
        AuthClientError::Rejected => AgError::TokenRejected,
        AuthClientError::Unreachable(detail) => AgError::AuthServiceUnavailable(detail),
    })?;

    tracing::debug!(
        target: "ag.auth",
        user_id = %user.id,
        path = %request.uri().path(),
        "Request authenticated"
    );

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(ForwardToken(token));

    Ok(next.run(request).await)
}
