//! Identity provider binary.

use std::net::SocketAddr;
use std::sync::Arc;

use id_service::config::Config;
use id_service::routes::{build_routes, AppState};
use id_service::store::CredentialStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "id_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(config = ?config, "Configuration loaded");

    if config.uses_default_secret() {
        tracing::warn!("Using the default demo signing secret; set JWT_SECRET in production");
    }

    let store = CredentialStore::demo()?;
    for identity in store.identities() {
        tracing::info!(email = %identity.email, "Demo identity registered");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
    });

    let app = build_routes(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %config.bind_address, "Identity provider listening");
    tracing::info!("Endpoints: POST /oauth2/v2.0/token, POST /auth/login, POST /auth/validate, GET /auth/demo-users, GET /.well-known/jwks.json, GET /health");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
