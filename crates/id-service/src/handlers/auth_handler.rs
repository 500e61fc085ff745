//! HTTP handlers for token issuance and validation.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::errors::IdError;
use crate::models::{
    DemoUser, DemoUsersResponse, LoginRequest, LoginResponse, ServiceTokenRequest,
    ServiceTokenResponse, ValidatedUser, ValidationResponse,
};
use crate::routes::AppState;
use crate::services::token_service;
use crate::store::DEMO_PASSWORD;
use common::jwt::bearer_token;

/// POST /oauth2/v2.0/token
///
/// OAuth 2.0 client credentials flow for service-to-service tokens.
pub async fn service_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ServiceTokenRequest>,
) -> Result<Json<ServiceTokenResponse>, IdError> {
    tracing::debug!(
        target: "id.oauth",
        client_id = %request.client_id,
        grant_type = %request.grant_type,
        "Service token requested"
    );

    let response = token_service::issue_service_token(
        &state.config,
        &request.grant_type,
        &request.client_id,
        request.scope.as_deref(),
    )?;

    tracing::info!(
        target: "id.oauth",
        client_id = %request.client_id,
        scope = %response.scope,
        "Service token issued"
    );

    Ok(Json(response))
}

/// POST /auth/login
///
/// User credential login. Failures never reveal whether the email exists.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, IdError> {
    let response =
        token_service::issue_user_token(&state.config, &state.store, &request.email, &request.password)
            .inspect_err(|_| {
                tracing::warn!(target: "id.login", "Login attempt failed");
            })?;

    tracing::info!(
        target: "id.login",
        user_id = %response.user.id,
        "User authenticated"
    );

    Ok(Json(response))
}

/// POST /auth/validate
///
/// Verifies the bearer token from the Authorization header. The failure
/// shape is `{valid: false, error}` with 401 rather than the standard
/// error envelope, so callers can branch on `valid` alone.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ValidationResponse>, (StatusCode, Json<ValidationResponse>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| validation_failure("No token provided"))
        .and_then(|value| bearer_token(value).map_err(|e| validation_failure(&e.to_string())))?;

    let claims = token_service::validate_token(&state.config, token)
        .map_err(|_| validation_failure("Invalid or expired token"))?;

    tracing::debug!(target: "id.validate", claims = ?claims, "Token validated");

    Ok(Json(ValidationResponse {
        valid: true,
        user: Some(ValidatedUser {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            roles: claims.roles.clone().unwrap_or_default(),
            department: claims.department.clone(),
            expires_at: claims.expires_at().unwrap_or_default(),
        }),
        error: None,
    }))
}

fn validation_failure(message: &str) -> (StatusCode, Json<ValidationResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ValidationResponse {
            valid: false,
            user: None,
            error: Some(message.to_string()),
        }),
    )
}

/// GET /auth/demo-users
///
/// Lists the seeded demo identities with their shared demo password.
/// Never exposes password hashes.
pub async fn demo_users(State(state): State<Arc<AppState>>) -> Json<DemoUsersResponse> {
    let users = state
        .store
        .identities()
        .iter()
        .map(|identity| DemoUser {
            email: identity.email.clone(),
            name: identity.name.clone(),
            roles: identity.roles.clone(),
            department: identity.department.clone(),
            demo_password: DEMO_PASSWORD.to_string(),
        })
        .collect();

    Json(DemoUsersResponse {
        message: "Demo users for testing".to_string(),
        users,
    })
}
