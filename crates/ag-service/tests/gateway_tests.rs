//! Gateway integration tests.
//!
//! The identity provider and the backend are wiremock servers; the
//! gateway itself runs in-process on an ephemeral port.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use ag_service::config::Config;
use ag_service::routes::{build_routes, AppState};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestGateway {
    base_url: String,
    client: reqwest::Client,
}

impl TestGateway {
    async fn spawn(auth_url: &str, backend_url: &str) -> anyhow::Result<Self> {
        let vars = HashMap::from([
            ("AUTH_SERVICE_URL".to_string(), auth_url.to_string()),
            ("BACKEND_URL".to_string(), backend_url.to_string()),
            // Short auth timeout keeps the unreachable-issuer test fast
            ("AUTH_TIMEOUT_SECONDS".to_string(), "2".to_string()),
        ]);
        let config = Config::from_vars(&vars)?;

        let state = Arc::new(AppState::new(config)?);
        let app = build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        })
    }

    fn url(&self, p: &str) -> String {
        format!("{}{p}", self.base_url)
    }
}

fn valid_validation_body() -> Value {
    json!({
        "valid": true,
        "user": {
            "id": "user-1",
            "email": "demo@example.test",
            "name": "John Doe",
            "roles": ["user", "api-access"],
            "department": "Engineering",
            "expires_at": "2030-01-01T00:00:00+00:00"
        }
    })
}

async fn mock_issuer_accepting() -> MockServer {
    let issuer = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_validation_body()))
        .mount(&issuer)
        .await;
    issuer
}

#[tokio::test]
async fn test_missing_token_rejected_without_calling_issuer() -> anyhow::Result<()> {
    let issuer = MockServer::start().await;
    let backend = MockServer::start().await;

    // The issuer must not be consulted when no token is present
    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_validation_body()))
        .expect(0)
        .mount(&issuer)
        .await;

    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway.client.get(gateway.url("/api/data")).send().await?;

    assert_eq!(response.status(), 401);
    assert!(response.headers().get("WWW-Authenticate").is_some());

    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "AUTHENTICATION_REQUIRED");

    Ok(())
}

#[tokio::test]
async fn test_rejected_token_never_reaches_backend() -> anyhow::Result<()> {
    let issuer = MockServer::start().await;
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "valid": false,
            "error": "Invalid or expired token"
        })))
        .mount(&issuer)
        .await;

    // Backend must see zero requests
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway
        .client
        .get(gateway.url("/api/data"))
        .header("Authorization", "Bearer bad-token")
        .send()
        .await?;

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "TOKEN_REJECTED");

    Ok(())
}

#[tokio::test]
async fn test_unreachable_issuer_is_401_not_502() -> anyhow::Result<()> {
    let backend = MockServer::start().await;

    // Nothing listens on this address
    let gateway = TestGateway::spawn("http://127.0.0.1:1", &backend.uri()).await?;

    let response = gateway
        .client
        .get(gateway.url("/api/data"))
        .header("Authorization", "Bearer some-token")
        .send()
        .await?;

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "AUTH_SERVICE_UNAVAILABLE");

    Ok(())
}

#[tokio::test]
async fn test_backend_failure_is_502_after_auth() -> anyhow::Result<()> {
    let issuer = mock_issuer_accepting().await;

    let gateway = TestGateway::spawn(&issuer.uri(), "http://127.0.0.1:1").await?;

    let response = gateway
        .client
        .get(gateway.url("/api/data"))
        .header("Authorization", "Bearer good-token")
        .send()
        .await?;

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "BAD_GATEWAY");

    Ok(())
}

#[tokio::test]
async fn test_forwarding_adds_provenance_headers() -> anyhow::Result<()> {
    let issuer = mock_issuer_accepting().await;
    let backend = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(header("X-App-Gateway", "true"))
        .and(header("X-Gateway-User", "demo@example.test"))
        .and(header("Authorization", "Bearer good-token"))
        .and(header("X-Forwarded-Proto", "http"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Backend", "test")
                .set_body_json(json!({"items": [1, 2, 3]})),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway
        .client
        .get(gateway.url("/api/data"))
        .header("Authorization", "Bearer good-token")
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    // Backend headers relay through, gateway trailers are appended
    assert_eq!(response.headers().get("X-Backend").unwrap(), "test");
    assert_eq!(
        response.headers().get("X-Gateway-Service").unwrap(),
        "app-gateway"
    );
    assert!(response.headers().get("X-Gateway-Timestamp").is_some());

    let body: Value = response.json().await?;
    assert_eq!(body["items"], json!([1, 2, 3]));

    Ok(())
}

#[tokio::test]
async fn test_post_body_and_status_relay() -> anyhow::Result<()> {
    let issuer = mock_issuer_accepting().await;
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(wiremock::matchers::body_json(json!({"name": "widget"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&backend)
        .await;

    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway
        .client
        .post(gateway.url("/api/items"))
        .header("Authorization", "Bearer good-token")
        .json(&json!({"name": "widget"}))
        .send()
        .await?;

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await?;
    assert_eq!(body["id"], 42);

    Ok(())
}

#[tokio::test]
async fn test_query_string_is_preserved() -> anyhow::Result<()> {
    let issuer = mock_issuer_accepting().await;
    let backend = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(wiremock::matchers::query_param("q", "gateway"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": 1})))
        .expect(1)
        .mount(&backend)
        .await;

    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway
        .client
        .get(gateway.url("/api/search?q=gateway"))
        .header("Authorization", "Bearer good-token")
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    Ok(())
}

#[tokio::test]
async fn test_health_is_public() -> anyhow::Result<()> {
    let issuer = MockServer::start().await;
    let backend = MockServer::start().await;
    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway.client.get(gateway.url("/health")).send().await?;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "app-gateway");

    Ok(())
}

#[tokio::test]
async fn test_internal_health_reports_backend() -> anyhow::Result<()> {
    let issuer = MockServer::start().await;
    let backend = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&backend)
        .await;

    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway
        .client
        .get(gateway.url("/internal-health"))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["gateway"]["status"], "healthy");
    assert_eq!(body["backend"]["reachable"], true);
    assert_eq!(body["backend"]["status"], 200);

    Ok(())
}

#[tokio::test]
async fn test_internal_health_backend_down_is_502() -> anyhow::Result<()> {
    let issuer = MockServer::start().await;

    let gateway = TestGateway::spawn(&issuer.uri(), "http://127.0.0.1:1").await?;

    let response = gateway
        .client
        .get(gateway.url("/internal-health"))
        .send()
        .await?;

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await?;
    assert_eq!(body["backend"]["reachable"], false);

    Ok(())
}

#[tokio::test]
async fn test_proxy_info() -> anyhow::Result<()> {
    let issuer = MockServer::start().await;
    let backend = MockServer::start().await;
    let gateway = TestGateway::spawn(&issuer.uri(), &backend.uri()).await?;

    let response = gateway
        .client
        .get(gateway.url("/proxy-info"))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["service"], "app-gateway");
    assert_eq!(body["protected_prefix"], "/api");
    assert_eq!(body["backend_url"], backend.uri());

    Ok(())
}
