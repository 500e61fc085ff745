//! Authenticated request forwarding.
//!
//! Requests that survive the authentication middleware are replayed
//! against the backend with provenance headers attached. The backend's
//! reply is relayed back with gateway trailer headers appended.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::errors::AgError;
use crate::models::{ForwardToken, VerifiedUser};
use crate::routes::AppState;

/// Largest request body the gateway will buffer for forwarding.
const MAX_FORWARD_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Hop-by-hop headers that must not be forwarded in either direction.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Forward an authenticated request to the backend.
pub async fn forward(
    State(state): State<Arc<AppState>>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Result<Response, AgError> {
    let user = request
        .extensions()
        .get::<VerifiedUser>()
        .cloned()
        .ok_or(AgError::Internal)?;
    let token = request
        .extensions()
        .get::<ForwardToken>()
        .cloned()
        .ok_or(AgError::Internal)?;

    let method = request.method().clone();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), ToString::to_string);
    let target = format!("{}{}", state.config.backend_url, path_and_query);

    let incoming_headers = request.headers().clone();
    let host = incoming_headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let body_bytes = axum::body::to_bytes(request.into_body(), MAX_FORWARD_BODY_BYTES)
        .await
        .map_err(|_| AgError::Internal)?;

    tracing::info!(
        target: "ag.proxy",
        method = %method,
        path = %path_and_query,
        user_id = %user.id,
        "Forwarding request"
    );

    let mut outbound = state
        .http
        .request(
            reqwest::Method::from_bytes(method.as_str().as_bytes())
                .map_err(|_| AgError::Internal)?,
            &target,
        )
        .headers(forwardable_headers(&incoming_headers));

    outbound = outbound
        .header("Authorization", format!("Bearer {}", token.0))
        .header("X-Forwarded-Proto", "http")
        .header("X-Forwarded-Host", host)
        .header("X-Forwarded-For", client_addr.ip().to_string())
        .header("X-App-Gateway", "true");

    if let Some(email) = &user.email {
        if let Ok(value) = HeaderValue::from_str(email) {
            outbound = outbound.header("X-Gateway-User", value);
        }
    }

    if method != Method::GET && method != Method::HEAD {
        outbound = outbound.body(body_bytes);
    }

    let backend_response = outbound
        .send()
        .await
        .map_err(|e| AgError::BadGateway(e.to_string()))?;

    relay(backend_response).await
}

/// Rebuild an axum response from the backend reply.
async fn relay(backend_response: reqwest::Response) -> Result<Response, AgError> {
    let status = StatusCode::from_u16(backend_response.status().as_u16())
        .map_err(|_| AgError::Internal)?;

    let mut headers = HeaderMap::new();
    for (name, value) in backend_response.headers() {
        if is_hop_by_hop(name.as_str()) || name == reqwest::header::CONTENT_LENGTH {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.insert(name, value);
        }
    }

    let bytes = backend_response
        .bytes()
        .await
        .map_err(|e| AgError::BadGateway(e.to_string()))?;

    let mut response = (status, headers, bytes).into_response();

    // Gateway provenance trailers on every relayed response
    if let Ok(value) = HeaderValue::from_str("app-gateway") {
        response.headers_mut().insert("X-Gateway-Service", value);
    }
    if let Ok(value) = HeaderValue::from_str(&Utc::now().to_rfc3339()) {
        response.headers_mut().insert("X-Gateway-Timestamp", value);
    }

    Ok(response)
}

fn forwardable_headers(incoming: &HeaderMap) -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();

    for (name, value) in incoming {
        let name_str = name.as_str();
        // Authorization is re-added from the validated token; host and
        // content-length are set by the client
        if is_hop_by_hop(name_str)
            || name_str == "host"
            || name_str == "content-length"
            || name_str == "authorization"
        {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name_str.as_bytes()),
            reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.insert(name, value);
        }
    }

    headers
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}
