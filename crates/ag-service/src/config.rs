//! Application gateway configuration.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default timeout for token validation calls to the identity provider.
pub const DEFAULT_AUTH_TIMEOUT_SECONDS: u64 = 5;

/// Default timeout for forwarded backend requests.
pub const DEFAULT_FORWARD_TIMEOUT_SECONDS: u64 = 30;

/// Application gateway configuration.
///
/// Loaded from environment variables with local-development defaults.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the protected backend service.
    pub backend_url: String,

    /// Base URL of the identity provider used for token validation.
    pub auth_service_url: String,

    /// Origins allowed for cross-origin calls.
    pub allowed_origins: Vec<String>,

    /// Timeout for validation calls to the identity provider.
    pub auth_timeout: Duration,

    /// Timeout for forwarded backend requests.
    pub forward_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("backend_url", &self.backend_url)
            .field("auth_service_url", &self.auth_service_url)
            .field("allowed_origins", &self.allowed_origins)
            .field("auth_timeout", &self.auth_timeout)
            .field("forward_timeout", &self.forward_timeout)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),
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
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let backend_url = vars
            .get("BACKEND_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "http://localhost:3001".to_string());

        let auth_service_url = vars
            .get("AUTH_SERVICE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "http://localhost:8081".to_string());

        let allowed_origins = vars
            .get("ALLOWED_ORIGINS")
            .cloned()
            .unwrap_or_else(|| "http://localhost:3002".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let auth_timeout = parse_timeout(vars, "AUTH_TIMEOUT_SECONDS", DEFAULT_AUTH_TIMEOUT_SECONDS)?;
        let forward_timeout = parse_timeout(
            vars,
            "FORWARD_TIMEOUT_SECONDS",
            DEFAULT_FORWARD_TIMEOUT_SECONDS,
        )?;

        Ok(Config {
            bind_address,
            backend_url,
            auth_service_url,
            allowed_origins,
            auth_timeout,
            forward_timeout,
        })
    }

    /// The identity provider endpoint used to validate bearer tokens.
    pub fn validate_url(&self) -> String {
        format!("{}/auth/validate", self.auth_service_url)
    }
}

fn parse_timeout(
    vars: &HashMap<String, String>,
    key: &str,
    default_seconds: u64,
) -> Result<Duration, ConfigError> {
    let seconds = match vars.get(key) {
        Some(value_str) => {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTimeout(format!(
                    "{} must be a valid integer, got '{}': {}",
                    key, value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidTimeout(format!(
                    "{} must be positive",
                    key
                )));
            }

            value
        }
        None => default_seconds,
    };

    Ok(Duration::from_secs(seconds))
}
