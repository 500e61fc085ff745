//! Identity provider configuration.
//!
//! Configuration is loaded from environment variables. The signing secret
//! is redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default shared signing secret for local/demo use.
///
/// Production deployments must override this via `JWT_SECRET`.
pub const DEFAULT_JWT_SECRET: &str = "demo-jwt-secret-key";

/// Default token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_EXPIRY_SECONDS: i64 = 3600;

/// Default tenant identifier.
pub const DEFAULT_TENANT_ID: &str = "demo-tenant-id";

/// Default registered service client identifier.
pub const DEFAULT_CLIENT_ID: &str = "demo-client-id";

/// Default issuer base URL. The token `iss` claim is
/// `{base}/{tenant_id}/v2.0`.
pub const DEFAULT_ISSUER_BASE_URL: &str = "https://login.demo-identity.local";

/// Identity provider configuration.
///
/// Loaded from environment variables with demo-friendly defaults.
/// The signing secret is redacted in Debug output to prevent leakage.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8081").
    pub bind_address: String,

    /// Shared symmetric signing secret for issued tokens.
    pub jwt_secret: String,

    /// Token lifetime in seconds. Expiry is always issued-at + this value.
    pub token_expiry_seconds: i64,

    /// Tenant identifier embedded in every token.
    pub tenant_id: String,

    /// The single registered service client id.
    pub client_id: String,

    /// Issuer base URL used to derive the `iss` claim.
    pub issuer_base_url: String,

    /// Origins allowed for cross-origin calls.
    pub allowed_origins: Vec<String>,
}

/// Custom Debug implementation that redacts the signing secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_expiry_seconds", &self.token_expiry_seconds)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("issuer_base_url", &self.issuer_base_url)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid token expiry configuration: {0}")]
    InvalidTokenExpiry(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8081".to_string());

        let jwt_secret = vars
            .get("JWT_SECRET")
            .cloned()
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        // Parse token lifetime with validation
        let token_expiry_seconds = if let Some(value_str) = vars.get("TOKEN_EXPIRY") {
            let value: i64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTokenExpiry(format!(
                    "TOKEN_EXPIRY must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value <= 0 {
                return Err(ConfigError::InvalidTokenExpiry(format!(
                    "TOKEN_EXPIRY must be positive, got {}",
                    value
                )));
            }

            value
        } else {
            DEFAULT_TOKEN_EXPIRY_SECONDS
        };

        let tenant_id = vars
            .get("TENANT_ID")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TENANT_ID.to_string());

        let client_id = vars
            .get("CLIENT_ID")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());

        let issuer_base_url = vars
            .get("ISSUER_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_ISSUER_BASE_URL.to_string());

        let allowed_origins = vars
            .get("ALLOWED_ORIGINS")
            .cloned()
            .unwrap_or_else(|| "http://localhost:3002".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            bind_address,
            jwt_secret,
            token_expiry_seconds,
            tenant_id,
            client_id,
            issuer_base_url,
            allowed_origins,
        })
    }

    /// The issuer identifier embedded in every token's `iss` claim.
    pub fn issuer(&self) -> String {
        format!("{}/{}/v2.0", self.issuer_base_url, self.tenant_id)
    }

    /// Whether the demo fallback secret is in use.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
