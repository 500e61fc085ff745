//! Gateway error types.
//!
//! Authentication failures are 401 even when the identity provider itself
//! is down; 502 is reserved for backend failures after authentication
//! succeeded.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

/// Gateway error type.
///
/// Maps to HTTP status codes:
/// - AuthenticationRequired, TokenRejected, AuthServiceUnavailable: 401
/// - BadGateway: 502
/// - Internal: 500
#[derive(Debug, Error)]
pub enum AgError {
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Token rejected")]
    TokenRejected,

    #[error("Authentication service unavailable: {0}")]
    AuthServiceUnavailable(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal server error")]
    Internal,
}

impl AgError {
    pub fn status_code(&self) -> u16 {
        match self {
            AgError::AuthenticationRequired(_)
            | AgError::TokenRejected
            | AgError::AuthServiceUnavailable(_) => 401,
            AgError::BadGateway(_) => 502,
            AgError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
    timestamp: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AgError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AgError::AuthenticationRequired(reason) => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_REQUIRED",
                reason.clone(),
            ),
            AgError::TokenRejected => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_REJECTED",
                "The access token was rejected".to_string(),
            ),
            AgError::AuthServiceUnavailable(err) => {
                // Log the transport detail server-side, keep the client generic
                tracing::warn!(target: "ag.auth", error = %err, "Identity provider unreachable");
                (
                    StatusCode::UNAUTHORIZED,
                    "AUTH_SERVICE_UNAVAILABLE",
                    "Authentication could not be completed".to_string(),
                )
            }
            AgError::BadGateway(err) => {
                tracing::error!(target: "ag.proxy", error = %err, "Backend request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_GATEWAY",
                    "The backend service did not respond".to_string(),
                )
            }
            AgError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
            timestamp: Utc::now().to_rfc3339(),
        };

        let mut response = (status, Json(error_response)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"app-gateway\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AgError::AuthenticationRequired("x".to_string()).status_code(),
            401
        );
        assert_eq!(AgError::TokenRejected.status_code(), 401);
        assert_eq!(
            AgError::AuthServiceUnavailable("x".to_string()).status_code(),
            401
        );
        assert_eq!(AgError::BadGateway("x".to_string()).status_code(), 502);
        assert_eq!(AgError::Internal.status_code(), 500);
    }

    #[tokio::test]
    async fn test_auth_unavailable_is_401_not_502() {
        let response = AgError::AuthServiceUnavailable("connection refused".to_string())
            .into_response();

        // An unreachable identity provider is an authentication failure,
        // not a backend failure
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "AUTH_SERVICE_UNAVAILABLE");
        // Transport detail stays server-side
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn test_401_carries_www_authenticate() {
        let response = AgError::TokenRejected.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("WWW-Authenticate").is_some());
    }

    #[tokio::test]
    async fn test_bad_gateway_body() {
        let response = AgError::BadGateway("tcp reset".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "BAD_GATEWAY");
        assert!(body["timestamp"].is_string());
    }
}
