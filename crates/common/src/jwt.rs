//! JWT utilities shared between the identity provider and the gateway.
//!
//! This module provides:
//! - The claims structure carried by issued tokens
//! - Bearer-credential extraction from `Authorization` header values
//! - A size limit applied before any parsing
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - The `sub` field in claims is redacted in Debug output
//! - Error messages are generic and never echo token material

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Typical tokens issued here are 300-700 bytes. Oversized credentials are
/// rejected before base64 decoding or signature verification.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Errors from bearer-credential extraction.
///
/// Messages are intentionally generic; details are logged at debug level
/// by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BearerError {
    /// No `Authorization` header was present.
    #[error("No token provided")]
    Missing,

    /// The header did not use the `Bearer <token>` scheme.
    #[error("Invalid authorization format")]
    Malformed,

    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("Invalid authorization format")]
    TokenTooLarge,
}

/// Extract the bearer credential from an `Authorization` header value.
///
/// Accepts only the `Bearer <token>` scheme and enforces the token size
/// limit before the token is handed to any parser.
pub fn bearer_token(header_value: &str) -> Result<&str, BearerError> {
    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(BearerError::Malformed)?;

    if token.is_empty() {
        return Err(BearerError::Malformed);
    }

    if token.len() > MAX_JWT_SIZE_BYTES {
        return Err(BearerError::TokenTooLarge);
    }

    Ok(token)
}

/// Claims carried by tokens minted by the identity provider.
///
/// Service tokens populate `scope`/`appid` and leave the user fields unset;
/// user tokens populate `email`/`name`/`roles`/`department`. Both variants
/// always carry `sub`, `iss`, `aud`, `iat`, `exp` and `tenant_id`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id or client id) - redacted in Debug output.
    pub sub: String,

    /// Issuer identifier.
    pub iss: String,

    /// Audience (the registered client id).
    pub aud: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds). Always `iat + lifetime`.
    pub exp: i64,

    /// Tenant identifier.
    pub tenant_id: String,

    /// Space-separated scopes (service tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Application id (service tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,

    /// User email (user tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// User display name (user tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// User role set (user tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Organizational unit (user tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Custom Debug implementation that redacts subject and email.
///
/// These fields identify principals and must not leak into logs.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("tenant_id", &self.tenant_id)
            .field("scope", &self.scope)
            .field("appid", &self.appid)
            .field("email", &self.email.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .field("roles", &self.roles)
            .field("department", &self.department)
            .finish()
    }
}

impl Claims {
    /// Check whether the token carries a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles
            .as_ref()
            .is_some_and(|roles| roles.iter().any(|r| r == role))
    }

    /// Expiry as an RFC 3339 timestamp, or `None` if out of range.
    pub fn expires_at(&self) -> Option<String> {
        chrono::DateTime::from_timestamp(self.exp, 0).map(|dt| dt.to_rfc3339())
    }
}
