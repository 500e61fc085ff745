//! Route table and shared application state.

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers::{health, proxy};
use crate::middleware::auth::require_auth;
use crate::services::auth_client::AuthClient;

/// Shared state for all request handlers.
pub struct AppState {
    pub config: Config,
    pub auth_client: AuthClient,
    /// Client for forwarded backend requests; carries the forward timeout.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let auth_client = AuthClient::new(&config)?;
        let http = reqwest::Client::builder()
            .timeout(config.forward_timeout)
            .build()?;

        Ok(Self {
            config,
            auth_client,
            http,
        })
    }
}

/// Build the gateway route table.
///
/// Everything under /api requires a validated bearer token; the health
/// and info endpoints are public.
pub fn build_routes(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    let protected = Router::new()
        .route("/api/*path", any(proxy::forward))
        .route("/api", any(proxy::forward))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_auth,
        ));

    Router::new()
        .merge(protected)
        .route("/health", get(health::health))
        .route("/internal-health", get(health::internal_health))
        .route("/proxy-info", get(health::proxy_info))
        .layer(TraceLayer::new_for_http())
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
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
