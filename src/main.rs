use anyhow::Result;

use costwise_backend::services::{HttpCatalogClient, HttpWorkExtractor};
use costwise_backend::{app, config, db, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting costwise backend"
    );

    // Create database pool
    let pool = db::create_pool(&settings).await?;

    // Create collaborator clients
    let extractor = HttpWorkExtractor::new(
        &settings.extractor_service_url,
        &settings.extractor_service_token,
        settings.extractor_timeout_seconds,
    )?;
    let catalog = HttpCatalogClient::new(
        &settings.catalog_service_url,
        &settings.catalog_service_token,
        settings.catalog_timeout_seconds,
    )?;

    // Optionally check collaborator health (non-blocking)
    tokio::spawn({
        let extractor = extractor.clone();
        let catalog = catalog.clone();
        async move {
            match extractor.health_check().await {
                Ok(()) => tracing::info!("Extractor service is healthy"),
                Err(e) => tracing::warn!(error = %e, "Extractor service health check failed - will retry on first request"),
            }
            match catalog.health_check().await {
                Ok(()) => tracing::info!("Catalog service is healthy"),
                Err(e) => tracing::warn!(error = %e, "Catalog service health check failed - will retry on first request"),
            }
        }
    });

    // Create application state
    let state = app::AppState::new(pool, settings.clone(), extractor, catalog);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
