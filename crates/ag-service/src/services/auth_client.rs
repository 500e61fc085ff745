//! HTTP client for the identity provider's validation endpoint.
//!
//! Every protected request triggers a fresh validation call; results are
//! never cached, so revocation at the identity provider takes effect on
//! the next request.

use thiserror::Error;

use crate::config::Config;
use crate::models::{ValidationReply, VerifiedUser};

/// Errors from a validation attempt.
#[derive(Debug, Error)]
pub enum AuthClientError {
    /// The identity provider could not be reached or answered abnormally.
    #[error("Identity provider unreachable: {0}")]
    Unreachable(String),

    /// The identity provider answered and rejected the token.
    #[error("Token rejected by identity provider")]
    Rejected,
}

/// Client for the identity provider validation endpoint.
pub struct AuthClient {
    validate_url: String,
    http: reqwest::Client,
}

impl AuthClient {
    /// Build a client from gateway configuration.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.auth_timeout)
            .build()?;

        Ok(Self {
            validate_url: config.validate_url(),
            http,
        })
    }

    /// Validate a bearer token against the identity provider.
    ///
    /// A 2xx reply with `valid: true` yields the verified user. A 4xx
    /// reply means the token was examined and rejected. Transport errors
    /// and 5xx replies are `Unreachable`.
    pub async fn validate(&self, token: &str) -> Result<VerifiedUser, AuthClientError> {
        let response = self
            .http
            .post(&self.validate_url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| AuthClientError::Unreachable(e.to_string()))?;

        let status = response.status();

        if status.is_client_error() {
            tracing::debug!(target: "ag.auth", status = %status, "Token rejected");
            return Err(AuthClientError::Rejected);
        }

        if !status.is_success() {
            return Err(AuthClientError::Unreachable(format!(
                "validation endpoint returned {status}"
            )));
        }

        let reply: ValidationReply = response
            .json()
            .await
            .map_err(|e| AuthClientError::Unreachable(e.to_string()))?;

        match reply {
            ValidationReply {
                valid: true,
                user: Some(user),
                ..
            } => Ok(user),
            _ => {
                // A 200 with valid:false should not happen, treat as rejection
                Err(AuthClientError::Rejected)
            }
        }
    }
}
