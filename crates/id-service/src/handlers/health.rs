//! Health check handler.

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::models::HealthResponse;
use crate::routes::AppState;

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "identity-provider".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        tenant_id: state.config.tenant_id.clone(),
        client_id: state.config.client_id.clone(),
    })
}
