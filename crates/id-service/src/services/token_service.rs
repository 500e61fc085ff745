//! Token issuance and validation.
//!
//! Tokens are signed HS256 with the shared secret from configuration.
//! Expiry is always issued-at + configured lifetime in whole seconds, and
//! validation enforces signature, expiry (zero leeway), issuer and audience.

use crate::config::Config;
use crate::errors::IdError;
use crate::models::{LoginResponse, ServiceTokenResponse, UserProfile};
use crate::store::CredentialStore;
use chrono::Utc;
use common::jwt::{Claims, MAX_JWT_SIZE_BYTES};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Default scope granted when a service token request names none.
pub const DEFAULT_SERVICE_SCOPE: &str = "api://default";

/// Dummy bcrypt hash verified when no identity matches the email.
///
/// Keeps the unknown-email and wrong-password paths doing the same work so
/// the response does not reveal whether an email is registered.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Issue a service token (OAuth 2.0 client credentials flow).
///
/// The grant type must be `client_credentials` and the client id must match
/// the single registered service client. The secret proof is accepted as-is
/// (stub boundary).
pub fn issue_service_token(
    config: &Config,
    grant_type: &str,
    client_id: &str,
    requested_scope: Option<&str>,
) -> Result<ServiceTokenResponse, IdError> {
    if grant_type != "client_credentials" {
        return Err(IdError::UnsupportedGrant);
    }

    if client_id != config.client_id {
        return Err(IdError::InvalidClient);
    }

    let scope = requested_scope
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SERVICE_SCOPE)
        .to_string();

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: client_id.to_string(),
        iss: config.issuer(),
        aud: config.client_id.clone(),
        iat: now,
        exp: now + config.token_expiry_seconds,
        tenant_id: config.tenant_id.clone(),
        scope: Some(scope.clone()),
        appid: Some(client_id.to_string()),
        email: None,
        name: None,
        roles: None,
        department: None,
    };

    let access_token = sign(config, &claims)?;

    Ok(ServiceTokenResponse {
        token_type: "Bearer".to_string(),
        expires_in: config.token_expiry_seconds,
        access_token,
        scope,
    })
}

/// Issue a user token after verifying login credentials.
///
/// Unknown email and wrong password both return `InvalidCredentials`; the
/// dummy-hash verification keeps both paths comparable in cost.
pub fn issue_user_token(
    config: &Config,
    store: &CredentialStore,
    email: &str,
    password: &str,
) -> Result<LoginResponse, IdError> {
    if email.is_empty() || password.is_empty() {
        return Err(IdError::InvalidRequest(
            "Email and password are required".to_string(),
        ));
    }

    let identity = store.find_by_email(email);

    let hash_to_verify = match identity {
        Some(i) => i.password_hash.as_str(),
        None => DUMMY_PASSWORD_HASH,
    };

    let is_valid = bcrypt::verify(password, hash_to_verify)
        .map_err(|e| IdError::Crypto(e.to_string()))?;

    let identity = identity.ok_or(IdError::InvalidCredentials)?;
    if !is_valid {
        return Err(IdError::InvalidCredentials);
    }

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: identity.id.to_string(),
        iss: config.issuer(),
        aud: config.client_id.clone(),
        iat: now,
        exp: now + config.token_expiry_seconds,
        tenant_id: config.tenant_id.clone(),
        scope: None,
        appid: None,
        email: Some(identity.email.clone()),
        name: Some(identity.name.clone()),
        roles: Some(identity.roles.clone()),
        department: Some(identity.department.clone()),
    };

    let access_token = sign(config, &claims)?;

    Ok(LoginResponse {
        message: "Authentication successful".to_string(),
        token_type: "Bearer".to_string(),
        access_token,
        expires_in: config.token_expiry_seconds,
        user: UserProfile::from(identity),
    })
}

/// Verify a token's signature, expiry, issuer and audience.
///
/// All failures collapse to `InvalidToken`; details are logged at debug
/// level and never reach the client.
pub fn validate_token(config: &Config, token: &str) -> Result<Claims, IdError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(target: "id.token", "Token rejected: exceeds size limit");
        return Err(IdError::InvalidToken);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // Expiry is exact: issued-at + lifetime, no grace window
    validation.leeway = 0;
    validation.set_issuer(&[config.issuer()]);
    validation.set_audience(&[&config.client_id]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(target: "id.token", error = %e, "Token verification failed");
        IdError::InvalidToken
    })?;

    Ok(token_data.claims)
}

fn sign(config: &Config, claims: &Claims) -> Result<String, IdError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| IdError::Crypto(e.to_string()))
}
