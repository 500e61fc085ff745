//! Wire-format request and response types for the identity provider.

use crate::store::Identity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// OAuth 2.0 service token request (client credentials flow).
#[derive(Debug, Deserialize)]
pub struct ServiceTokenRequest {
    pub grant_type: String,
    pub client_id: String,
    #[allow(dead_code)] // Stub boundary: the secret proof is not deeply validated
    pub client_secret: Option<String>,
    pub scope: Option<String>,
}

/// OAuth 2.0 token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTokenResponse {
    pub token_type: String,
    pub expires_in: i64,
    pub access_token: String,
    pub scope: String,
}

/// User login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Non-secret projection of a registered identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub department: String,
}

impl From<&Identity> for UserProfile {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            name: identity.name.clone(),
            roles: identity.roles.clone(),
            department: identity.department.clone(),
        }
    }
}

/// Token validation response.
///
/// Success carries `valid: true` and the resolved user claims; failure
/// carries `valid: false` and a generic error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ValidatedUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolved claims returned by a successful validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub expires_at: String,
}

/// Demo identity listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoUsersResponse {
    pub message: String,
    pub users: Vec<DemoUser>,
}

/// Demo identity projection (never includes the password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoUser {
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub department: String,
    pub demo_password: String,
}

/// JWKS response (stub: no real key material is published).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<JsonWebKey>,
}

/// JSON Web Key descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kid: String,
    #[serde(rename = "use")]
    pub use_: String,
    pub alg: String,
    pub kty: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
    pub tenant_id: String,
    pub client_id: String,
}
