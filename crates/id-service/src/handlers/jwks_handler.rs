//! JWKS discovery endpoint.
//!
//! Tokens are signed with a symmetric secret, so no public key material
//! exists to publish. The endpoint serves a descriptor-only stub so
//! discovery-shaped clients get a well-formed document.

use axum::{http::header, response::IntoResponse, Json};

use crate::models::{JsonWebKey, Jwks};

/// Key id advertised in the stub JWKS document.
pub const DEMO_KEY_ID: &str = "demo-key-id";

/// GET /.well-known/jwks.json
pub async fn jwks() -> impl IntoResponse {
    let document = Jwks {
        keys: vec![JsonWebKey {
            kid: DEMO_KEY_ID.to_string(),
            use_: "sig".to_string(),
            alg: "HS256".to_string(),
            kty: "oct".to_string(),
        }],
    };

    ([(header::CACHE_CONTROL, "public, max-age=3600")], Json(document))
}
