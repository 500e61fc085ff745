//! Route table and shared application state.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers::{auth_handler, health, jwks_handler};
use crate::store::CredentialStore;

/// Shared state for all request handlers.
pub struct AppState {
    pub config: Config,
    pub store: CredentialStore,
}

/// Build the identity provider route table.
pub fn build_routes(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/oauth2/v2.0/token", post(auth_handler::service_token))
        .route("/auth/login", post(auth_handler::login))
        .route("/auth/validate", post(auth_handler::validate))
        .route("/auth/demo-users", get(auth_handler::demo_users))
        .route("/.well-known/jwks.json", get(jwks_handler::jwks))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
