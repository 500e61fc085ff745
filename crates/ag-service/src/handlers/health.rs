//! Gateway health and deployment-info handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::models::{BackendHealth, HealthResponse, InternalHealthResponse, ProxyInfo};
use crate::routes::AppState;

fn gateway_health() -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        service: "app-gateway".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// GET /health
///
/// Liveness only; does not touch the backend.
pub async fn health() -> Json<HealthResponse> {
    Json(gateway_health())
}

/// GET /internal-health
///
/// Probes the backend's health endpoint as well. A down backend yields
/// 502 with the probe detail.
pub async fn internal_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let probe_url = format!("{}/health", state.config.backend_url);

    let backend = match state.http.get(&probe_url).send().await {
        Ok(response) => BackendHealth {
            reachable: true,
            status: Some(response.status().as_u16()),
            error: None,
        },
        Err(e) => {
            tracing::warn!(target: "ag.health", error = %e, "Backend health probe failed");
            BackendHealth {
                reachable: false,
                status: None,
                error: Some("Backend unreachable".to_string()),
            }
        }
    };

    let status = if backend.reachable {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    (
        status,
        Json(InternalHealthResponse {
            gateway: gateway_health(),
            backend,
        }),
    )
}

/// GET /proxy-info
pub async fn proxy_info(State(state): State<Arc<AppState>>) -> Json<ProxyInfo> {
    Json(ProxyInfo {
        service: "app-gateway".to_string(),
        backend_url: state.config.backend_url.clone(),
        auth_service_url: state.config.auth_service_url.clone(),
        protected_prefix: "/api".to_string(),
        authentication: "bearer".to_string(),
    })
}
