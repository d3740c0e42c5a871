//! devicewatch - device telemetry status service.

use devicewatch::build_source;
use devicewatch::config::ServerConfig;
use devicewatch::web::Server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("devicewatch=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting devicewatch on port {}...", cfg.http_port);

    let source = build_source(&cfg);
    tracing::info!("Using telemetry source {}", source.describe());

    // Read the source once so misconfiguration shows up in the startup log
    match source.read_records() {
        Ok(loaded) => tracing::info!("Source reachable, {} device records", loaded.len()),
        Err(e) => tracing::warn!("Source not readable at startup: {}", e),
    }

    // Start web server
    let server = Server::new(cfg, source);
    server.start().await?;

    Ok(())
}
