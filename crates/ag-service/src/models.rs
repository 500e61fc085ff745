//! Wire-format types for the gateway's own endpoints and for the identity
//! provider's validation reply.

use serde::{Deserialize, Serialize};

/// Identity provider validation reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationReply {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<VerifiedUser>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A user identity confirmed by the identity provider.
///
/// Inserted into request extensions by the authentication middleware and
/// read by the forwarding handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// The validated bearer token, kept for forwarding to the backend.
#[derive(Debug, Clone)]
pub struct ForwardToken(pub String);

/// Gateway health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Composite health response covering the gateway and its backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalHealthResponse {
    pub gateway: HealthResponse,
    pub backend: BackendHealth,
}

/// Backend reachability as seen from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Gateway deployment description served at /proxy-info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyInfo {
    pub service: String,
    pub backend_url: String,
    pub auth_service_url: String,
    pub protected_prefix: String,
    pub authentication: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_reply_success_parses() {
        let json = r#"{
            "valid": true,
            "user": {
                "id": "abc-123",
                "email": "demo@example.test",
                "name": "John Doe",
                "roles": ["user", "api-access"],
                "department": "Engineering",
                "expires_at": "2026-01-01T00:00:00+00:00"
            }
        }"#;

        let reply: ValidationReply = serde_json::from_str(json).unwrap();
        assert!(reply.valid);

        let user = reply.user.unwrap();
        assert_eq!(user.id, "abc-123");
        assert_eq!(user.email.as_deref(), Some("demo@example.test"));
        assert_eq!(user.roles.len(), 2);
    }

    #[test]
    fn test_validation_reply_failure_parses() {
        let json = r#"{"valid": false, "error": "Invalid or expired token"}"#;

        let reply: ValidationReply = serde_json::from_str(json).unwrap();
        assert!(!reply.valid);
        assert!(reply.user.is_none());
        assert_eq!(reply.error.as_deref(), Some("Invalid or expired token"));
    }

    #[test]
    fn test_verified_user_tolerates_sparse_claims() {
        // Service tokens carry no user profile fields
        let json = r#"{"id": "demo-client-id", "expires_at": "2026-01-01T00:00:00+00:00"}"#;

        let user: VerifiedUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "demo-client-id");
        assert!(user.email.is_none());
        assert!(user.roles.is_empty());
    }
}
