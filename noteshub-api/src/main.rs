//! # NotesHub API Server
//!
//! Multi-tenant notes API: users register and log in under a tenant derived
//! from their email domain, manage text notes scoped to that tenant, and
//! tenant admins can upgrade from the free (3-note) plan to unlimited pro.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p noteshub-api
//! ```

use noteshub_api::{
    app::{build_router, AppState},
    config::Config,
};
use noteshub_shared::db::pool::{create_lazy_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noteshub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "NotesHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Lazy pool: the server starts even if the database is down, and the
    // health endpoint reports "disconnected" until it comes back.
    let pool = create_lazy_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })?;

    match sqlx::migrate!("../migrations").run(&pool).await {
        Ok(()) => tracing::info!("Database migrations applied"),
        Err(err) => tracing::warn!(
            "Skipping migrations, database not reachable yet: {}",
            err
        ),
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
