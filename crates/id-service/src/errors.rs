//! Identity provider error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Client
//! responses carry a stable error code and a timestamp; messages never echo
//! signing material or reveal whether an email is registered.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

/// Identity provider error type.
///
/// Maps to HTTP status codes:
/// - InvalidRequest, UnsupportedGrant: 400 Bad Request
/// - InvalidClient, InvalidCredentials, InvalidToken: 401 Unauthorized
/// - Crypto, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum IdError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported grant type")]
    UnsupportedGrant,

    #[error("Invalid client credentials")]
    InvalidClient,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

impl IdError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            IdError::InvalidRequest(_) | IdError::UnsupportedGrant => 400,
            IdError::InvalidClient | IdError::InvalidCredentials | IdError::InvalidToken => 401,
            IdError::Crypto(_) | IdError::Internal => 500,
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

impl IntoResponse for IdError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            IdError::InvalidRequest(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", reason.clone())
            }
            IdError::UnsupportedGrant => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_GRANT_TYPE",
                "Only the client_credentials grant type is supported".to_string(),
            ),
            IdError::InvalidClient => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CLIENT",
                "Invalid client credentials".to_string(),
            ),
            IdError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            IdError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "The access token is invalid or expired".to_string(),
            ),
            IdError::Crypto(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "id.crypto", error = %err, "Cryptographic operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            IdError::Internal => (
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

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"identity-provider\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}
