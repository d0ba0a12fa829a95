pub mod app;
pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::MockConfig;
use crate::store::MockStore;
use crate::transport::MockTransport;

pub async fn start_server(port: u16, config: MockConfig, cors_origin: Option<&str>) -> Result<()> {
    let store = MockStore::seeded()?.into_shared();
    info!(
        "Mock store seeded (delay {}ms, simulated errors {})",
        config.mock_delay,
        if config.error_config.enabled { "on" } else { "off" }
    );

    let transport = Arc::new(MockTransport::new(store, config));
    let app = app::create_app(transport, cors_origin)?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /graphql                    - GraphQL API (POST) & Playground (GET)");
}
