//! Creditpack Service - credit packs sold through Polar
//!
//! This is the main entry point for the creditpack service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use creditpack_service::{create_router, AppState, ServiceConfig};
use creditpack_store::{MemoryStore, PgStore, UserCreditStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,creditpack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Creditpack Service");
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        database_configured = %config.database_url.is_some(),
        polar_server = ?config.polar_server,
        polar_configured = %config.polar_access_token.is_some(),
        webhook_secret_configured = %config.polar_webhook_secret.is_some(),
        products_configured = config.catalog.products().count(),
        "Service configuration loaded"
    );

    let store: Arc<dyn UserCreditStore> = if let Some(url) = &config.database_url {
        tracing::info!("Connecting to PostgreSQL");
        let store = PgStore::connect(url).await?;
        store.migrate().await?;
        Arc::new(store)
    } else {
        tracing::warn!("DATABASE_URL not set - using in-memory store, balances will not persist");
        Arc::new(MemoryStore::new())
    };

    let state = AppState::new(store, config.clone());

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
