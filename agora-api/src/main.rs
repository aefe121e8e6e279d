//! # Agora API Server
//!
//! HTTP server for the Agora board application: user accounts with
//! token-based sessions, board posts, comments, and reports.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p agora-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agora_api::app::{build_router, AppState};
use agora_api::config::Config;
use agora_shared::db::{migrations::run_migrations, pool};
use agora_shared::redis::{RedisClient, RedisConfig, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Agora API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Database pool + migrations
    let db_config = pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let db = pool::create_pool(db_config).await?;
    run_migrations(&db).await?;

    // Session cache
    let redis_config = RedisConfig::from_env()?;
    let redis = RedisClient::new(redis_config).await?;
    let sessions = SessionStore::new(redis);

    let bind_address = config.bind_address();
    let state = AppState::new(db, sessions, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, draining connections...");
}
