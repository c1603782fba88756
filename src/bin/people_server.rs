//! People directory server binary
//!
//! Wires the dependency graph together: configuration from the environment,
//! a Postgres pool with the schema ensured, the enrichment service, and the
//! axum router. Serves until ctrl-c.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use people_directory::api::{create_router, AppState};
use people_directory::database::{DatabaseConfig, DatabaseManager};
use people_directory::enrich::{EnrichmentConfig, EnrichmentService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "people_directory=info,tower_http=info".to_string()),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Database connection and schema
    let db = DatabaseManager::new(DatabaseConfig::default())
        .await
        .context("failed to connect to the database")?;
    db.test_connection()
        .await
        .context("database connectivity check failed")?;
    db.run_migrations()
        .await
        .context("failed to ensure the database schema")?;

    // Enrichment service over the three classification APIs
    let enricher = EnrichmentService::new(EnrichmentConfig::default())
        .context("failed to create the enrichment service")?;

    // Application state and routes
    let state = AppState::new(Arc::new(db.person_repository()), Arc::new(enricher));
    let app = create_router(state);

    // Determine port
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("Shutdown signal received");
}
