use std::time::Duration;

use movie_discovery_backend::{api, config::AppConfig, external};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();

    // Initialize external API client
    let external_client = external::ExternalApiClient::from_config(&config)?;

    // Start cache maintenance task
    let maintenance_interval = Duration::from_secs(config.cache.maintenance_secs.max(1));
    let maintenance_task = external::CacheMaintenanceTask::new(
        external_client.cache.clone(),
        maintenance_interval,
    );
    tokio::spawn(maintenance_task.start());

    let addr = config.bind_address();
    let app = api::router(api::AppState::new(external_client, config));

    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!("📊 Cache maintenance task started (interval: {:?})", maintenance_interval);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
